//! The entity graph: three identifier-keyed maps of entities.
//!
//! An [`EntityGraph`] is built in one go by the extractor and then handed
//! over whole. Consumers never observe a half-built graph: the owner swaps
//! its current graph for a completed one in a single assignment.
//!
//! Maps are [`IndexMap`]s, so iteration follows insertion (discovery) order
//! and is stable for a given extraction pass. Layout relies on this.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    entity::{ClassEntity, EntityKey, EntityKind, InterfaceEntity, RelationshipEntity},
    identifier::Id,
};

/// Typed maps of every entity discovered in one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    classes: IndexMap<Id, ClassEntity>,
    relationships: IndexMap<Id, RelationshipEntity>,
    interfaces: IndexMap<Id, InterfaceEntity>,
}

impl EntityGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &IndexMap<Id, ClassEntity> {
        &self.classes
    }

    pub fn relationships(&self) -> &IndexMap<Id, RelationshipEntity> {
        &self.relationships
    }

    pub fn interfaces(&self) -> &IndexMap<Id, InterfaceEntity> {
        &self.interfaces
    }

    pub fn class(&self, id: Id) -> Option<&ClassEntity> {
        self.classes.get(&id)
    }

    pub fn class_mut(&mut self, id: Id) -> Option<&mut ClassEntity> {
        self.classes.get_mut(&id)
    }

    pub fn relationship(&self, id: Id) -> Option<&RelationshipEntity> {
        self.relationships.get(&id)
    }

    pub fn interface(&self, id: Id) -> Option<&InterfaceEntity> {
        self.interfaces.get(&id)
    }

    pub fn contains_class(&self, id: Id) -> bool {
        self.classes.contains_key(&id)
    }

    /// Returns `true` if the entity addressed by `key` exists.
    pub fn contains(&self, key: EntityKey) -> bool {
        match key.kind() {
            EntityKind::Class => self.classes.contains_key(&key.id()),
            EntityKind::Relationship => self.relationships.contains_key(&key.id()),
            EntityKind::Interface => self.interfaces.contains_key(&key.id()),
        }
    }

    /// Inserts a class unless one with the same id exists.
    ///
    /// Returns `false` and leaves the existing entity untouched on a
    /// duplicate, so the first discovery of an identifier wins.
    pub fn insert_class(&mut self, class: ClassEntity) -> bool {
        if self.classes.contains_key(&class.id()) {
            debug!(id:% = class.id(), label = class.label(); "Dropping duplicate class, first discovery wins");
            return false;
        }
        self.classes.insert(class.id(), class);
        true
    }

    /// Inserts a relationship, replacing any with the same id.
    pub fn insert_relationship(&mut self, relationship: RelationshipEntity) {
        if let Some(previous) = self.relationships.insert(relationship.id(), relationship) {
            trace!(id:% = previous.id(); "Replaced relationship");
        }
    }

    /// Inserts an interface, replacing any with the same id.
    pub fn insert_interface(&mut self, interface: InterfaceEntity) {
        self.interfaces.insert(interface.id(), interface);
    }

    /// Reads the selected flag of the addressed entity.
    pub fn is_selected(&self, key: EntityKey) -> Option<bool> {
        match key.kind() {
            EntityKind::Class => self.classes.get(&key.id()).map(ClassEntity::is_selected),
            EntityKind::Relationship => self
                .relationships
                .get(&key.id())
                .map(RelationshipEntity::is_selected),
            EntityKind::Interface => self
                .interfaces
                .get(&key.id())
                .map(InterfaceEntity::is_selected),
        }
    }

    /// Sets the selected flag of the addressed entity.
    ///
    /// Returns `None` if the entity does not exist, otherwise whether the
    /// flag actually changed.
    pub fn set_selected(&mut self, key: EntityKey, selected: bool) -> Option<bool> {
        let id = key.id();
        let previous = match key.kind() {
            EntityKind::Class => {
                let entity = self.classes.get_mut(&id)?;
                let previous = entity.is_selected();
                entity.set_selected(selected);
                previous
            }
            EntityKind::Relationship => {
                let entity = self.relationships.get_mut(&id)?;
                let previous = entity.is_selected();
                entity.set_selected(selected);
                previous
            }
            EntityKind::Interface => {
                let entity = self.interfaces.get_mut(&id)?;
                let previous = entity.is_selected();
                entity.set_selected(selected);
                previous
            }
        };
        Some(previous != selected)
    }

    /// Sets the hovered flag of the addressed entity.
    ///
    /// Same return contract as [`EntityGraph::set_selected`].
    pub fn set_hovered(&mut self, key: EntityKey, hovered: bool) -> Option<bool> {
        let id = key.id();
        let previous = match key.kind() {
            EntityKind::Class => {
                let entity = self.classes.get_mut(&id)?;
                let previous = entity.is_hovered();
                entity.set_hovered(hovered);
                previous
            }
            EntityKind::Relationship => {
                let entity = self.relationships.get_mut(&id)?;
                let previous = entity.is_hovered();
                entity.set_hovered(hovered);
                previous
            }
            EntityKind::Interface => {
                let entity = self.interfaces.get_mut(&id)?;
                let previous = entity.is_hovered();
                entity.set_hovered(hovered);
                previous
            }
        };
        Some(previous != hovered)
    }

    /// Total number of entities of all kinds.
    pub fn len(&self) -> usize {
        self.classes.len() + self.relationships.len() + self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Spherical;

    fn sample_graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        graph.insert_class(ClassEntity::new(Id::new("g:Person"), "Person"));
        graph.insert_class(ClassEntity::new(Id::new("g:Place"), "Place"));
        graph.insert_relationship(RelationshipEntity::new(
            Id::new("g:livesIn"),
            "livesIn",
            Id::new("g:Person"),
            Id::new("g:Place"),
        ));
        graph.insert_interface(InterfaceEntity::new(
            Id::new("g:Greeter"),
            "Greeter",
            Id::new("g:Person"),
            Spherical::default(),
        ));
        graph
    }

    #[test]
    fn test_insert_class_first_wins() {
        let mut graph = EntityGraph::new();
        assert!(graph.insert_class(ClassEntity::new(Id::new("g:Dup"), "first")));
        assert!(!graph.insert_class(ClassEntity::new(Id::new("g:Dup"), "second")));

        assert_eq!(graph.classes().len(), 1);
        assert_eq!(graph.class(Id::new("g:Dup")).map(ClassEntity::label), Some("first"));
    }

    #[test]
    fn test_insert_relationship_replaces() {
        let mut graph = EntityGraph::new();
        let (a, b) = (Id::new("g:A"), Id::new("g:B"));
        graph.insert_relationship(RelationshipEntity::new(Id::new("g:rel"), "old", a, b));
        graph.insert_relationship(RelationshipEntity::new(Id::new("g:rel"), "new", a, b));

        assert_eq!(graph.relationships().len(), 1);
        let label = graph.relationships().values().next().map(RelationshipEntity::label);
        assert_eq!(label, Some("new"));
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut graph = EntityGraph::new();
        for name in ["g:c", "g:a", "g:b"] {
            graph.insert_class(ClassEntity::new(Id::new(name), name));
        }

        let order: Vec<String> = graph.classes().keys().map(Id::as_string).collect();
        assert_eq!(order, ["g:c", "g:a", "g:b"]);
    }

    #[test]
    fn test_set_selected_reports_change() {
        let mut graph = sample_graph();
        let key = EntityKey::class(Id::new("g:Person"));

        assert_eq!(graph.set_selected(key, true), Some(true));
        assert_eq!(graph.set_selected(key, true), Some(false));
        assert_eq!(graph.is_selected(key), Some(true));
        assert_eq!(graph.set_selected(key, false), Some(true));
    }

    #[test]
    fn test_set_selected_missing_entity() {
        let mut graph = sample_graph();
        let key = EntityKey::interface(Id::new("g:Missing"));

        assert_eq!(graph.set_selected(key, true), None);
        assert_eq!(graph.is_selected(key), None);
    }

    #[test]
    fn test_set_hovered_each_kind() {
        let mut graph = sample_graph();
        let relationship = *graph.relationships().keys().next().expect("one relationship");

        assert_eq!(graph.set_hovered(EntityKey::relationship(relationship), true), Some(true));
        assert_eq!(graph.set_hovered(EntityKey::interface(Id::new("g:Greeter")), true), Some(true));
        assert!(graph.relationship(relationship).is_some_and(RelationshipEntity::is_hovered));
    }

    #[test]
    fn test_contains_and_len() {
        let graph = sample_graph();

        assert!(graph.contains(EntityKey::class(Id::new("g:Place"))));
        assert!(!graph.contains(EntityKey::relationship(Id::new("g:Place"))));
        assert_eq!(graph.len(), 4);
        assert!(!graph.is_empty());
        assert!(EntityGraph::new().is_empty());
    }
}
