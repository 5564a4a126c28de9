//! The semantic store boundary.
//!
//! The engine consumes an external store through the [`Store`] trait. Query
//! execution, wire formats and the store's own data model are the
//! implementor's business; the engine only sees the record shapes defined
//! here. Every query yields a (possibly empty) sequence, so callers never
//! branch on "one value or many".
//!
//! Stores signal mutations through a [`ChangeSignal`]: one untyped "changed"
//! notification per mutation, with no diff payload. Each pending
//! notification leads to a full rebuild of the entity graph.
//!
//! [`MemoryStore`] is an in-memory implementation used by the CLI and the
//! test suites.

mod memory;

pub use memory::{MemoryStore, StoreSnapshot};

use std::{cell::Cell, rc::Rc};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StoreError;

/// A class-defining resource or an individual instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl ResourceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One declared property of a resource, kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyRecord {
    pub predicate: String,
    pub value: String,
}

/// A relationship definition with its declared domains and ranges.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelationshipRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub ranges: Vec<String>,
}

/// A method parameter as declared in the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A method of an interface definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
}

/// An interface definition.
///
/// `owners` holds every class reached through the inverse ownership edge.
/// Exactly one owner is required; the extractor skips the definition
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterfaceRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
}

/// Read access to an external semantic store.
///
/// Queries are asynchronous and may suspend. The engine awaits each one to
/// completion before it builds anything from the results.
#[async_trait(?Send)]
pub trait Store {
    /// All class-defining resources.
    async fn list_classes(&self) -> Result<Vec<ResourceRecord>, StoreError>;

    /// Individuals typed by `class_id`.
    async fn list_instances_of(&self, class_id: &str) -> Result<Vec<ResourceRecord>, StoreError>;

    /// Direct subclasses of `class_id`.
    async fn list_subclasses(&self, class_id: &str) -> Result<Vec<String>, StoreError>;

    /// Declared properties of the resource `id`.
    async fn list_properties(&self, id: &str) -> Result<Vec<PropertyRecord>, StoreError>;

    async fn list_relationship_definitions(&self) -> Result<Vec<RelationshipRecord>, StoreError>;

    async fn list_interface_definitions(&self) -> Result<Vec<InterfaceRecord>, StoreError>;
}

/// Single-threaded "store changed" flag shared between a store and its
/// session.
///
/// Any number of [`notify`](ChangeSignal::notify) calls before the next
/// [`take`](ChangeSignal::take) collapse into one pending rebuild.
///
/// # Examples
///
/// ```
/// # use ontoscope::store::ChangeSignal;
/// let signal = ChangeSignal::new();
/// let store_side = signal.clone();
///
/// store_side.notify();
/// store_side.notify();
/// assert!(signal.take());
/// assert!(!signal.take());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeSignal {
    pending: Rc<Cell<bool>>,
    notifications: Rc<Cell<u64>>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a store mutation.
    pub fn notify(&self) {
        self.pending.set(true);
        self.notifications.set(self.notifications.get() + 1);
    }

    /// Clears and returns the pending flag.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Total notifications received, coalesced or not.
    pub fn notifications(&self) -> u64 {
        self.notifications.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_signal_coalesces() {
        let signal = ChangeSignal::new();
        assert!(!signal.is_pending());

        signal.notify();
        signal.notify();
        signal.notify();

        assert!(signal.is_pending());
        assert_eq!(signal.notifications(), 3);
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn test_change_signal_clones_share_state() {
        let signal = ChangeSignal::new();
        let other = signal.clone();

        other.notify();
        assert!(signal.is_pending());
    }
}
