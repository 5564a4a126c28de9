//! Entity types of the semantic graph.
//!
//! Three kinds of entity make up an [`EntityGraph`](crate::graph::EntityGraph):
//!
//! - [`ClassEntity`] - a class or an individual instance, shown as a sphere
//! - [`RelationshipEntity`] - one domain/range pair of a relationship
//!   definition, shown as a labeled connector
//! - [`InterfaceEntity`] - an interface descriptor, shown as a port on its
//!   owner's surface
//!
//! Entities are built by the extractor and never edited structurally
//! afterwards. Only presentation attributes (position, selection and hover
//! flags) change while a graph is published.

use std::fmt;

use indexmap::IndexSet;

use crate::{
    geometry::{Spherical, Vec3},
    identifier::Id,
};

/// Radius of a class sphere with no subclasses.
pub const BASE_RADIUS: f32 = 5.0;

/// Radius added per direct subclass.
pub const RADIUS_PER_SUBCLASS: f32 = 0.5;

/// The kind of an entity, used to address it alongside its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Class,
    Relationship,
    Interface,
}

impl EntityKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Relationship => "relationship",
            EntityKind::Interface => "interface",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(EntityKind::Class),
            "relationship" => Ok(EntityKind::Relationship),
            "interface" => Ok(EntityKind::Interface),
            other => Err(format!("unknown entity kind `{other}`")),
        }
    }
}

/// Kind plus identifier: the address of one entity in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    kind: EntityKind,
    id: Id,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: Id) -> Self {
        Self { kind, id }
    }

    pub fn class(id: Id) -> Self {
        Self::new(EntityKind::Class, id)
    }

    pub fn relationship(id: Id) -> Self {
        Self::new(EntityKind::Relationship, id)
    }

    pub fn interface(id: Id) -> Self {
        Self::new(EntityKind::Interface, id)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> Id {
        self.id
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// An opaque predicate/value pair attached to a class or instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    predicate: String,
    value: String,
}

impl Property {
    pub fn new(predicate: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            value: value.into(),
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A class or an individual instance, rendered as a sphere.
#[derive(Debug, Clone)]
pub struct ClassEntity {
    id: Id,
    label: String,
    instance_of: Option<Id>,
    properties: Vec<Property>,
    subclasses: IndexSet<Id>,
    interfaces: IndexSet<Id>,
    position: Vec3,
    radius_override: Option<f32>,
    selected: bool,
    hovered: bool,
}

impl ClassEntity {
    /// Create a class entity with no properties, subclasses or interfaces.
    pub fn new(id: Id, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            instance_of: None,
            properties: Vec::new(),
            subclasses: IndexSet::new(),
            interfaces: IndexSet::new(),
            position: Vec3::ZERO,
            radius_override: None,
            selected: false,
            hovered: false,
        }
    }

    /// Mark this entity as an individual of `class` (builder style).
    pub fn with_instance_of(mut self, class: Id) -> Self {
        self.instance_of = Some(class);
        self
    }

    /// Fix the radius instead of deriving it from the subclass count.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius_override = Some(radius);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The class this entity was discovered as an instance of, if any.
    pub fn instance_of(&self) -> Option<Id> {
        self.instance_of
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Direct subclasses, in discovery order.
    pub fn subclasses(&self) -> &IndexSet<Id> {
        &self.subclasses
    }

    pub fn interfaces(&self) -> &IndexSet<Id> {
        &self.interfaces
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Sphere radius: `5 + 0.5 × |subclasses|` unless overridden.
    pub fn radius(&self) -> f32 {
        self.radius_override
            .unwrap_or(BASE_RADIUS + RADIUS_PER_SUBCLASS * self.subclasses.len() as f32)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Registers a direct subclass. Returns `false` if it was already known.
    pub fn add_subclass(&mut self, subclass: Id) -> bool {
        self.subclasses.insert(subclass)
    }

    pub fn add_interface(&mut self, interface: Id) -> bool {
        self.interfaces.insert(interface)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

/// One domain/range pair of a relationship definition.
///
/// A definition with `d` domains and `r` ranges produces `d × r` of these,
/// all sharing the same `definition` id.
#[derive(Debug, Clone)]
pub struct RelationshipEntity {
    id: Id,
    definition: Id,
    label: String,
    source: Id,
    target: Id,
    selected: bool,
    hovered: bool,
}

impl RelationshipEntity {
    /// Create a relationship entity for one `source -> target` pair of
    /// `definition`. The entity id is derived from all three, so it is
    /// stable across extraction passes.
    pub fn new(definition: Id, label: impl Into<String>, source: Id, target: Id) -> Self {
        let id = Id::new(&format!("{definition}[{source}->{target}]"));
        Self {
            id,
            definition,
            label: label.into(),
            source,
            target,
            selected: false,
            hovered: false,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Identifier of the relationship definition this pair came from.
    pub fn definition(&self) -> Id {
        self.definition
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

/// A named, typed method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// A method of an interface, with ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: String,
    return_type: String,
    parameters: Vec<Parameter>,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// `name(p: T, ...) -> R` rendering used for labels.
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.type_name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}) -> {}", self.name, params, self.return_type)
    }
}

/// An interface descriptor anchored on its owner's sphere surface.
#[derive(Debug, Clone)]
pub struct InterfaceEntity {
    id: Id,
    label: String,
    owner: Id,
    surface: Spherical,
    methods: Vec<Method>,
    selected: bool,
    hovered: bool,
}

impl InterfaceEntity {
    pub fn new(id: Id, label: impl Into<String>, owner: Id, surface: Spherical) -> Self {
        Self {
            id,
            label: label.into(),
            owner,
            surface,
            methods: Vec::new(),
            selected: false,
            hovered: false,
        }
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn owner(&self) -> Id {
        self.owner
    }

    /// Port position on the owner's surface, fixed for the extraction epoch.
    pub fn surface(&self) -> Spherical {
        self.surface
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}
