//! Error types for Ontoscope operations.
//!
//! Nothing in the synchronization engine is fatal. Most of these types are
//! *reported* rather than propagated: extraction collects [`ResourceError`]s,
//! scene synchronization collects [`UnresolvedReference`]s, and the session
//! logs [`NavigationError`]s and carries on. [`OntoscopeError`] is only
//! returned from setup paths: loading a snapshot, reading configuration and
//! parsing scripted commands.

use std::io;

use thiserror::Error;

use ontoscope_core::{entity::EntityKind, identifier::Id};

/// The main error type for fallible Ontoscope setup operations.
#[derive(Debug, Error)]
pub enum OntoscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid command: {0}")]
    Command(String),
}

/// A failure reported by a [`Store`](crate::store::Store) implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("query `{query}` failed: {reason}")]
    Query { query: String, reason: String },

    #[error("invalid store snapshot: {0}")]
    Snapshot(String),
}

impl StoreError {
    /// Create a `Query` error for the named query.
    pub fn query(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

/// One malformed store resource, skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resource `{resource}` skipped: {reason}")]
pub struct ResourceError {
    resource: String,
    reason: String,
}

impl ResourceError {
    pub fn new(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// The raw store identifier of the skipped resource.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A relationship endpoint or interface owner that is not a visible class.
///
/// The entity is left out of the current scene only; the next pass tries
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} `{entity}` references `{reference}`, which is not a visible class")]
pub struct UnresolvedReference {
    kind: EntityKind,
    entity: Id,
    reference: Id,
}

impl UnresolvedReference {
    pub fn new(kind: EntityKind, entity: Id, reference: Id) -> Self {
        Self {
            kind,
            entity,
            reference,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn entity(&self) -> Id {
        self.entity
    }

    pub fn reference(&self) -> Id {
        self.reference
    }
}

/// Rejected navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("cannot enter `{0}`: not a known, visible class")]
    UnknownScopeTarget(Id),

    #[error("cannot exit: already at the top level")]
    EmptyStack,
}
