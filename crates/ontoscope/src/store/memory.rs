//! In-memory [`Store`] implementation.

use std::{cell::RefCell, rc::Rc};

use async_trait::async_trait;
use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;

use super::{
    ChangeSignal, InterfaceRecord, PropertyRecord, RelationshipRecord, ResourceRecord, Store,
};
use crate::error::StoreError;

/// Serializable description of a whole store, used to seed a [`MemoryStore`].
///
/// # Examples
///
/// ```
/// # use ontoscope::store::StoreSnapshot;
/// let snapshot: StoreSnapshot = toml::from_str(r#"
///     [[classes]]
///     id = "ex:Person"
///     instances = [{ id = "ex:alice", label = "Alice" }]
///
///     [[relationships]]
///     id = "ex:knows"
///     domains = ["ex:Person"]
///     ranges = ["ex:Person"]
/// "#).unwrap();
/// assert_eq!(snapshot.classes.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub classes: Vec<ClassSnapshot>,
    pub relationships: Vec<RelationshipRecord>,
    pub interfaces: Vec<InterfaceRecord>,
}

/// One class of a [`StoreSnapshot`] with everything hanging off it.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassSnapshot {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub subclasses: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub instances: Vec<InstanceSnapshot>,
}

/// One individual of a [`ClassSnapshot`].
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceSnapshot {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
}

#[derive(Debug, Default)]
struct MemoryData {
    classes: IndexMap<String, ResourceRecord>,
    instances: IndexMap<String, Vec<ResourceRecord>>,
    subclasses: IndexMap<String, Vec<String>>,
    properties: IndexMap<String, Vec<PropertyRecord>>,
    relationships: Vec<RelationshipRecord>,
    interfaces: Vec<InterfaceRecord>,
}

/// A store held entirely in memory.
///
/// Clones share the same data, so a test or host can keep one handle for
/// mutation while a session owns another. Every mutator raises the
/// attached [`ChangeSignal`], if any.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<MemoryData>>,
    signal: Rc<RefCell<Option<ChangeSignal>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the contents of `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Snapshot`] if two classes share an identifier.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StoreError> {
        let store = Self::new();
        {
            let mut data = store.data.borrow_mut();
            for class in snapshot.classes {
                if data.classes.contains_key(&class.id) {
                    return Err(StoreError::Snapshot(format!(
                        "class `{}` is defined twice",
                        class.id
                    )));
                }
                let record = ResourceRecord {
                    id: class.id.clone(),
                    label: class.label,
                };
                data.classes.insert(class.id.clone(), record);
                data.subclasses
                    .entry(class.id.clone())
                    .or_default()
                    .extend(class.subclasses);
                data.properties
                    .entry(class.id.clone())
                    .or_default()
                    .extend(class.properties);
                for instance in class.instances {
                    data.properties
                        .entry(instance.id.clone())
                        .or_default()
                        .extend(instance.properties);
                    data.instances
                        .entry(class.id.clone())
                        .or_default()
                        .push(ResourceRecord {
                            id: instance.id,
                            label: instance.label,
                        });
                }
            }
            data.relationships = snapshot.relationships;
            data.interfaces = snapshot.interfaces;
        }
        Ok(store)
    }

    /// Attaches the signal raised by every subsequent mutation.
    pub fn attach_signal(&self, signal: ChangeSignal) {
        *self.signal.borrow_mut() = Some(signal);
    }

    fn changed(&self) {
        if let Some(signal) = self.signal.borrow().as_ref() {
            signal.notify();
        }
    }

    pub fn add_class(&self, record: ResourceRecord) {
        trace!(id = record.id.as_str(); "Store: add class");
        self.data
            .borrow_mut()
            .classes
            .insert(record.id.clone(), record);
        self.changed();
    }

    pub fn add_instance(&self, class_id: &str, record: ResourceRecord) {
        trace!(class = class_id, id = record.id.as_str(); "Store: add instance");
        self.data
            .borrow_mut()
            .instances
            .entry(class_id.to_owned())
            .or_default()
            .push(record);
        self.changed();
    }

    pub fn add_subclass(&self, class_id: &str, subclass_id: &str) {
        self.data
            .borrow_mut()
            .subclasses
            .entry(class_id.to_owned())
            .or_default()
            .push(subclass_id.to_owned());
        self.changed();
    }

    pub fn add_property(&self, id: &str, predicate: &str, value: &str) {
        self.data
            .borrow_mut()
            .properties
            .entry(id.to_owned())
            .or_default()
            .push(PropertyRecord {
                predicate: predicate.to_owned(),
                value: value.to_owned(),
            });
        self.changed();
    }

    pub fn add_relationship(&self, record: RelationshipRecord) {
        self.data.borrow_mut().relationships.push(record);
        self.changed();
    }

    pub fn add_interface(&self, record: InterfaceRecord) {
        self.data.borrow_mut().interfaces.push(record);
        self.changed();
    }

    /// Removes every trace of `id`: as a class, an instance, a subclass
    /// target, a relationship or an interface definition.
    pub fn remove_resource(&self, id: &str) {
        {
            let mut data = self.data.borrow_mut();
            data.classes.shift_remove(id);
            data.instances.shift_remove(id);
            data.subclasses.shift_remove(id);
            data.properties.shift_remove(id);
            for instances in data.instances.values_mut() {
                instances.retain(|record| record.id != id);
            }
            for subclasses in data.subclasses.values_mut() {
                subclasses.retain(|subclass| subclass != id);
            }
            data.relationships.retain(|record| record.id != id);
            data.interfaces.retain(|record| record.id != id);
        }
        self.changed();
    }
}

#[async_trait(?Send)]
impl Store for MemoryStore {
    async fn list_classes(&self) -> Result<Vec<ResourceRecord>, StoreError> {
        Ok(self.data.borrow().classes.values().cloned().collect())
    }

    async fn list_instances_of(&self, class_id: &str) -> Result<Vec<ResourceRecord>, StoreError> {
        Ok(self
            .data
            .borrow()
            .instances
            .get(class_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_subclasses(&self, class_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .data
            .borrow()
            .subclasses
            .get(class_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_properties(&self, id: &str) -> Result<Vec<PropertyRecord>, StoreError> {
        Ok(self
            .data
            .borrow()
            .properties
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_relationship_definitions(&self) -> Result<Vec<RelationshipRecord>, StoreError> {
        Ok(self.data.borrow().relationships.clone())
    }

    async fn list_interface_definitions(&self) -> Result<Vec<InterfaceRecord>, StoreError> {
        Ok(self.data.borrow().interfaces.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            classes: vec![ClassSnapshot {
                id: "ex:Animal".to_owned(),
                label: Some("Animal".to_owned()),
                subclasses: vec!["ex:Cat".to_owned()],
                properties: vec![PropertyRecord {
                    predicate: "rdfs:comment".to_owned(),
                    value: "living thing".to_owned(),
                }],
                instances: vec![InstanceSnapshot {
                    id: "ex:felix".to_owned(),
                    label: None,
                    properties: Vec::new(),
                }],
            }],
            relationships: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_from_snapshot() {
        let store = MemoryStore::from_snapshot(snapshot()).expect("valid snapshot");

        let classes = store.list_classes().await.expect("classes");
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].label.as_deref(), Some("Animal"));

        let instances = store.list_instances_of("ex:Animal").await.expect("instances");
        assert_eq!(instances, vec![ResourceRecord::new("ex:felix")]);

        let subclasses = store.list_subclasses("ex:Animal").await.expect("subclasses");
        assert_eq!(subclasses, vec!["ex:Cat".to_owned()]);

        let properties = store.list_properties("ex:Animal").await.expect("properties");
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_from_snapshot_rejects_duplicate_class() {
        let mut snapshot = snapshot();
        snapshot.classes.push(snapshot.classes[0].clone());

        let result = MemoryStore::from_snapshot(snapshot);
        assert!(matches!(result, Err(StoreError::Snapshot(_))));
    }

    #[tokio::test]
    async fn test_unknown_ids_yield_empty_sequences() {
        let store = MemoryStore::new();

        assert!(store.list_instances_of("ex:None").await.expect("ok").is_empty());
        assert!(store.list_subclasses("ex:None").await.expect("ok").is_empty());
        assert!(store.list_properties("ex:None").await.expect("ok").is_empty());
    }

    #[test]
    fn test_mutations_raise_signal() {
        let store = MemoryStore::new();
        let signal = ChangeSignal::new();
        store.attach_signal(signal.clone());

        store.add_class(ResourceRecord::new("ex:A"));
        store.add_instance("ex:A", ResourceRecord::new("ex:a1"));
        store.remove_resource("ex:a1");

        assert_eq!(signal.notifications(), 3);
        assert!(signal.take());
    }

    #[tokio::test]
    async fn test_remove_resource_everywhere() {
        let store = MemoryStore::from_snapshot(snapshot()).expect("valid snapshot");
        store.remove_resource("ex:felix");
        store.remove_resource("ex:Cat");

        assert!(store.list_instances_of("ex:Animal").await.expect("ok").is_empty());
        assert!(store.list_subclasses("ex:Animal").await.expect("ok").is_empty());
    }

    #[test]
    fn test_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.add_class(ResourceRecord::new("ex:Shared"));

        assert_eq!(store.data.borrow().classes.len(), 1);
    }
}
