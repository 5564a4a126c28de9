//! Reconciliation of visual handles against the entity graph.
//!
//! The [`SceneSynchronizer`] owns one [`VisualHandle`] per visible entity.
//! Each [`sync`](SceneSynchronizer::sync) pass computes the set of entities
//! that should be visible for the current graph and scope, disposes every
//! handle that is no longer wanted, then creates the missing ones. A pass
//! with no change since the previous one touches nothing.
//!
//! # Visibility
//!
//! - Top level: every class.
//! - Inside class `c`: the direct subclasses of `c` only.
//! - A relationship: both endpoints resolve to visible classes.
//! - An interface: its owner resolves to a visible class.
//!
//! References are matched through a [`Resolver`]. A reference that does not
//! resolve keeps its entity out of the scene for this pass only.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace, warn};

use ontoscope_core::{
    entity::{ClassEntity, EntityKey, EntityKind, InterfaceEntity, RelationshipEntity},
    graph::EntityGraph,
    identifier::Id,
};

use crate::{error::UnresolvedReference, navigation::Scope, resolve::Resolver};

/// Borrowed view of one visible entity, handed to the [`Renderer`].
///
/// Relationships and interfaces come with the visible classes they attach
/// to, already resolved.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Class(&'a ClassEntity),
    Relationship {
        entity: &'a RelationshipEntity,
        source: &'a ClassEntity,
        target: &'a ClassEntity,
    },
    Interface {
        entity: &'a InterfaceEntity,
        owner: &'a ClassEntity,
    },
}

impl EntityRef<'_> {
    pub fn key(&self) -> EntityKey {
        match self {
            EntityRef::Class(class) => EntityKey::class(class.id()),
            EntityRef::Relationship { entity, .. } => EntityKey::relationship(entity.id()),
            EntityRef::Interface { entity, .. } => EntityKey::interface(entity.id()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EntityRef::Class(class) => class.label(),
            EntityRef::Relationship { entity, .. } => entity.label(),
            EntityRef::Interface { entity, .. } => entity.label(),
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            EntityRef::Class(class) => class.is_selected(),
            EntityRef::Relationship { entity, .. } => entity.is_selected(),
            EntityRef::Interface { entity, .. } => entity.is_selected(),
        }
    }

    pub fn is_hovered(&self) -> bool {
        match self {
            EntityRef::Class(class) => class.is_hovered(),
            EntityRef::Relationship { entity, .. } => entity.is_hovered(),
            EntityRef::Interface { entity, .. } => entity.is_hovered(),
        }
    }
}

/// The rendering collaborator.
///
/// Implementations own the graphical resources behind each handle.
pub trait Renderer {
    /// Rendering-side resource for one visible entity.
    type Handle;

    fn create_visual_handle(&mut self, entity: EntityRef<'_>) -> Self::Handle;

    fn dispose_visual_handle(&mut self, handle: Self::Handle);

    /// Brings an existing handle up to date with `entity`.
    fn refresh_visual_handle(&mut self, handle: &mut Self::Handle, entity: EntityRef<'_>);
}

/// The visible classes an entity is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    None,
    Endpoints { source: Id, target: Id },
    Owner(Id),
}

/// One visible entity's rendering resource, tagged with the entity it
/// belongs to.
#[derive(Debug)]
pub struct VisualHandle<H> {
    key: EntityKey,
    anchor: Anchor,
    resource: H,
}

impl<H> VisualHandle<H> {
    pub fn key(&self) -> EntityKey {
        self.key
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn resource(&self) -> &H {
        &self.resource
    }
}

/// Counts and skipped references of one synchronization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub created: usize,
    pub disposed: usize,
    pub refreshed: usize,
    pub unresolved: Vec<UnresolvedReference>,
}

impl SyncReport {
    /// `true` if the pass did not call the renderer at all.
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.disposed == 0 && self.refreshed == 0
    }
}

/// The classes visible in `scope`, in graph order.
///
/// Inside a class that is missing from `graph` nothing is visible.
pub fn visible_classes(graph: &EntityGraph, scope: Scope) -> IndexSet<Id> {
    match scope {
        Scope::TopLevel => graph.classes().keys().copied().collect(),
        Scope::InsideClass(id) => match graph.class(id) {
            Some(class) => class
                .subclasses()
                .iter()
                .copied()
                .filter(|sub| graph.contains_class(*sub))
                .collect(),
            None => {
                warn!(scope:% = id; "Scope class is not part of the current graph");
                IndexSet::new()
            }
        },
    }
}

/// Desired handles for one pass, keyed in creation order.
struct ScenePlan {
    wanted: IndexMap<EntityKey, Anchor>,
    unresolved: Vec<UnresolvedReference>,
}

fn plan(graph: &EntityGraph, scope: Scope, resolver: &Resolver) -> ScenePlan {
    let visible = visible_classes(graph, scope);
    let mut wanted: IndexMap<EntityKey, Anchor> = visible
        .iter()
        .map(|&id| (EntityKey::class(id), Anchor::None))
        .collect();
    let mut unresolved = Vec::new();

    for relationship in graph.relationships().values() {
        let source = resolver.resolve(relationship.source(), &visible);
        let target = resolver.resolve(relationship.target(), &visible);
        match (source, target) {
            (Some(source), Some(target)) => {
                wanted.insert(
                    EntityKey::relationship(relationship.id()),
                    Anchor::Endpoints {
                        source: source.id(),
                        target: target.id(),
                    },
                );
            }
            (source, _) => {
                let missing = if source.is_none() {
                    relationship.source()
                } else {
                    relationship.target()
                };
                unresolved.push(UnresolvedReference::new(
                    EntityKind::Relationship,
                    relationship.id(),
                    missing,
                ));
            }
        }
    }

    for interface in graph.interfaces().values() {
        match resolver.resolve(interface.owner(), &visible) {
            Some(owner) => {
                wanted.insert(EntityKey::interface(interface.id()), Anchor::Owner(owner.id()));
            }
            None => unresolved.push(UnresolvedReference::new(
                EntityKind::Interface,
                interface.id(),
                interface.owner(),
            )),
        }
    }

    ScenePlan { wanted, unresolved }
}

/// Builds the renderer view of `key`, or `None` if the entity or one of its
/// anchors is missing from `graph`.
fn entity_ref(graph: &EntityGraph, key: EntityKey, anchor: Anchor) -> Option<EntityRef<'_>> {
    match (key.kind(), anchor) {
        (EntityKind::Class, _) => graph.class(key.id()).map(EntityRef::Class),
        (EntityKind::Relationship, Anchor::Endpoints { source, target }) => {
            Some(EntityRef::Relationship {
                entity: graph.relationship(key.id())?,
                source: graph.class(source)?,
                target: graph.class(target)?,
            })
        }
        (EntityKind::Interface, Anchor::Owner(owner)) => Some(EntityRef::Interface {
            entity: graph.interface(key.id())?,
            owner: graph.class(owner)?,
        }),
        _ => None,
    }
}

/// Keeps the set of visual handles in step with the graph and scope.
#[derive(Debug)]
pub struct SceneSynchronizer<H> {
    handles: IndexMap<EntityKey, VisualHandle<H>>,
    last_pass: Option<(u64, Scope)>,
}

impl<H> Default for SceneSynchronizer<H> {
    fn default() -> Self {
        Self {
            handles: IndexMap::new(),
            last_pass: None,
        }
    }
}

impl<H> SceneSynchronizer<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current handles, in creation order.
    pub fn handles(&self) -> impl Iterator<Item = &VisualHandle<H>> {
        self.handles.values()
    }

    pub fn handle(&self, key: EntityKey) -> Option<&VisualHandle<H>> {
        self.handles.get(&key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.handles.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reconciles the handle set with `graph` filtered by `scope`.
    ///
    /// `epoch` identifies the graph; when neither it nor `scope` changed
    /// since the previous pass, surviving handles are left alone.
    pub fn sync<R>(
        &mut self,
        graph: &EntityGraph,
        epoch: u64,
        scope: Scope,
        resolver: &Resolver,
        renderer: &mut R,
    ) -> SyncReport
    where
        R: Renderer<Handle = H>,
    {
        let ScenePlan { wanted, unresolved } = plan(graph, scope, resolver);
        for reference in &unresolved {
            warn!(
                kind:% = reference.kind(),
                entity:% = reference.entity(),
                reference:% = reference.reference();
                "Skipping entity with unresolved reference"
            );
        }

        let changed = self.last_pass != Some((epoch, scope));
        self.last_pass = Some((epoch, scope));

        let mut report = SyncReport {
            unresolved,
            ..SyncReport::default()
        };

        let stale: Vec<EntityKey> = self
            .handles
            .keys()
            .filter(|key| !wanted.contains_key(*key))
            .copied()
            .collect();
        for key in stale {
            if let Some(handle) = self.handles.shift_remove(&key) {
                trace!(key:% = key; "Disposing visual handle");
                renderer.dispose_visual_handle(handle.resource);
                report.disposed += 1;
            }
        }

        for (key, anchor) in wanted {
            let Some(entity) = entity_ref(graph, key, anchor) else {
                continue;
            };
            match self.handles.get_mut(&key) {
                Some(handle) => {
                    if changed || handle.anchor != anchor {
                        handle.anchor = anchor;
                        renderer.refresh_visual_handle(&mut handle.resource, entity);
                        report.refreshed += 1;
                    }
                }
                None => {
                    trace!(key:% = key; "Creating visual handle");
                    let resource = renderer.create_visual_handle(entity);
                    self.handles.insert(
                        key,
                        VisualHandle {
                            key,
                            anchor,
                            resource,
                        },
                    );
                    report.created += 1;
                }
            }
        }

        debug!(
            created = report.created,
            disposed = report.disposed,
            refreshed = report.refreshed,
            unresolved = report.unresolved.len(),
            handles = self.handles.len();
            "Scene synchronized"
        );
        report
    }

    /// Refreshes the single handle of `key`, if it exists.
    ///
    /// Returns `true` if the renderer was called.
    pub fn refresh<R>(&mut self, key: EntityKey, graph: &EntityGraph, renderer: &mut R) -> bool
    where
        R: Renderer<Handle = H>,
    {
        let Some(handle) = self.handles.get_mut(&key) else {
            return false;
        };
        let Some(entity) = entity_ref(graph, key, handle.anchor) else {
            return false;
        };
        renderer.refresh_visual_handle(&mut handle.resource, entity);
        true
    }

    /// Disposes every handle.
    pub fn clear<R>(&mut self, renderer: &mut R) -> usize
    where
        R: Renderer<Handle = H>,
    {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain(..) {
            renderer.dispose_visual_handle(handle.resource);
        }
        self.last_pass = None;
        count
    }
}
