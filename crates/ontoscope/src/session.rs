//! The single-threaded orchestrator tying the engine together.
//!
//! A [`Session`] owns the store, the published [`EntityGraph`], the
//! navigation state, the scene synchronizer and the renderer. The host loop
//! drives it:
//!
//! - store notifications go through [`ChangeSignal`] and are handled by
//!   [`Session::process_changes`], which rebuilds the graph once per pending
//!   notification batch
//! - navigation ([`enter_class`](Session::enter_class),
//!   [`exit_class`](Session::exit_class)) and selection commands are
//!   synchronous and must not be issued while `process_changes` is running
//! - emitted [`SceneEvent`]s are collected with
//!   [`drain_events`](Session::drain_events)

use std::collections::VecDeque;

use log::{debug, info, warn};

use ontoscope_core::{
    entity::{EntityKey, EntityKind},
    graph::EntityGraph,
    identifier::Id,
};

use crate::{
    config::AppConfig,
    error::{ResourceError, UnresolvedReference},
    event::SceneEvent,
    extract::Extractor,
    layout,
    navigation::{CameraState, Navigator, Scope},
    resolve::{self, Resolver},
    scene::{Renderer, SceneSynchronizer, VisualHandle, visible_classes},
    selection::SelectionTracker,
    store::{ChangeSignal, Store},
};

/// Engine state for one store and one renderer.
///
/// # Examples
///
/// ```
/// # use ontoscope::{Session, config::AppConfig, store::{MemoryStore, ResourceRecord}};
/// # use ontoscope::scene::{EntityRef, Renderer};
/// struct Null;
/// impl Renderer for Null {
///     type Handle = ();
///     fn create_visual_handle(&mut self, _: EntityRef<'_>) {}
///     fn dispose_visual_handle(&mut self, _: ()) {}
///     fn refresh_visual_handle(&mut self, _: &mut (), _: EntityRef<'_>) {}
/// }
///
/// let store = MemoryStore::new();
/// store.add_class(ResourceRecord::new("ex:Person"));
///
/// let mut session = Session::new(store.clone(), Null, AppConfig::default());
/// store.attach_signal(session.change_signal());
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// rt.block_on(session.load());
/// assert_eq!(session.graph().classes().len(), 1);
/// assert!(session.enter_class("ex:Person"));
/// ```
pub struct Session<S, R>
where
    S: Store,
    R: Renderer,
{
    store: S,
    extractor: Extractor,
    config: AppConfig,
    resolver: Resolver,
    graph: EntityGraph,
    epoch: u64,
    issues: Vec<ResourceError>,
    navigator: Navigator,
    camera: CameraState,
    scene: SceneSynchronizer<R::Handle>,
    unresolved: Vec<UnresolvedReference>,
    renderer: R,
    selection: SelectionTracker,
    signal: ChangeSignal,
    events: VecDeque<SceneEvent>,
}

impl<S, R> Session<S, R>
where
    S: Store,
    R: Renderer,
{
    /// Creates a session with an empty graph at the top level.
    ///
    /// Nothing is extracted until [`load`](Self::load) or
    /// [`process_changes`](Self::process_changes) runs.
    pub fn new(store: S, renderer: R, config: AppConfig) -> Self {
        let resolver = Resolver::new(config.resolve().strategies());
        let camera = config.camera().default_state();
        Self {
            store,
            extractor: Extractor::new(),
            config,
            resolver,
            graph: EntityGraph::new(),
            epoch: 0,
            issues: Vec::new(),
            navigator: Navigator::new(),
            camera,
            scene: SceneSynchronizer::new(),
            unresolved: Vec::new(),
            renderer,
            selection: SelectionTracker::new(),
            signal: ChangeSignal::new(),
            events: VecDeque::new(),
        }
    }

    /// Replaces the extractor, e.g. with a seeded one.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The signal the store must raise on every mutation.
    pub fn change_signal(&self) -> ChangeSignal {
        self.signal.clone()
    }

    /// Marks the store as changed.
    pub fn notify_changed(&self) {
        self.signal.notify();
    }

    /// Performs the initial extraction.
    pub async fn load(&mut self) -> usize {
        self.signal.notify();
        self.process_changes().await
    }

    /// Rebuilds the graph while change notifications are pending and
    /// returns the number of extraction passes run.
    ///
    /// Notifications raised while a pass is in flight are coalesced into
    /// exactly one follow-up pass.
    pub async fn process_changes(&mut self) -> usize {
        let mut passes = 0;
        while self.signal.take() {
            passes += 1;
            self.rebuild().await;
        }
        if passes > 0 {
            debug!(passes = passes, epoch = self.epoch; "Store changes processed");
        }
        passes
    }

    async fn rebuild(&mut self) {
        match self.extractor.extract(&self.store).await {
            Ok(extraction) => {
                let (graph, issues) = extraction.into_parts();
                self.issues = issues;
                self.publish(graph);
            }
            Err(err) => {
                warn!(err:% = err, epoch = self.epoch; "Extraction failed, keeping the previous graph");
            }
        }
    }

    fn publish(&mut self, graph: EntityGraph) {
        self.graph = graph;
        self.epoch += 1;
        self.selection.reapply(&mut self.graph);
        self.layout_scope();
        info!(epoch = self.epoch, entities = self.graph.len(); "Graph published");
        self.events.push_back(SceneEvent::GraphUpdated { epoch: self.epoch });
        self.synchronize();
    }

    fn layout_scope(&mut self) {
        let in_scope: Vec<Id> = visible_classes(&self.graph, self.navigator.scope())
            .into_iter()
            .collect();
        layout::assign_positions(&mut self.graph, &in_scope, self.config.layout());
    }

    fn synchronize(&mut self) {
        let report = self.scene.sync(
            &self.graph,
            self.epoch,
            self.navigator.scope(),
            &self.resolver,
            &mut self.renderer,
        );
        self.events.push_back(SceneEvent::SceneUpdated {
            created: report.created,
            disposed: report.disposed,
        });
        self.unresolved = report.unresolved;
    }

    /// Drills into the visible class `id`.
    ///
    /// The identifier is canonicalized and must name a visible class
    /// exactly, or be a bare local name shared by exactly one visible class.
    /// Returns `false` and leaves everything untouched otherwise.
    pub fn enter_class(&mut self, id: &str) -> bool {
        let visible = visible_classes(&self.graph, self.navigator.scope());
        let reference = Id::canonical(id);
        let target = resolve::scope_target(reference, &visible).unwrap_or(reference);
        let framing = self.config.camera().default_state();

        if self
            .navigator
            .enter(target, &visible, &mut self.camera, framing)
            .is_err()
        {
            return false;
        }
        self.events.push_back(SceneEvent::ScopeEntered(target));
        self.layout_scope();
        self.synchronize();
        true
    }

    /// Returns to the previous scope and camera.
    ///
    /// Returns `false` at the top level, where nothing changes.
    pub fn exit_class(&mut self) -> bool {
        let Ok(exited) = self.navigator.exit(&mut self.camera) else {
            return false;
        };
        self.events.push_back(SceneEvent::ScopeExited(exited));
        self.layout_scope();
        self.synchronize();
        true
    }

    pub fn select(&mut self, kind: EntityKind, id: Id) -> bool {
        self.set_selected(kind, id, true)
    }

    pub fn deselect(&mut self, kind: EntityKind, id: Id) -> bool {
        self.set_selected(kind, id, false)
    }

    /// Sets the selected flag of one entity and refreshes its handle only.
    ///
    /// Returns `true` if the flag changed.
    pub fn set_selected(&mut self, kind: EntityKind, id: Id, value: bool) -> bool {
        let key = EntityKey::new(kind, id);
        if !self.selection.set_selected(&mut self.graph, key, value) {
            return false;
        }
        self.scene.refresh(key, &self.graph, &mut self.renderer);
        true
    }

    /// Moves the hover to `key`, or clears it. Returns the number of
    /// handles refreshed.
    pub fn hover(&mut self, key: Option<EntityKey>) -> usize {
        let touched = self.selection.hover(&mut self.graph, key);
        let mut refreshed = 0;
        for key in touched {
            if self.scene.refresh(key, &self.graph, &mut self.renderer) {
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Records where the host moved the camera.
    pub fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn scope(&self) -> Scope {
        self.navigator.scope()
    }

    /// Classes entered so far, outermost first.
    pub fn path(&self) -> Vec<Id> {
        self.navigator.path()
    }

    pub fn depth(&self) -> usize {
        self.navigator.depth()
    }

    /// The latest published graph.
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Number of graphs published so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Resources skipped by the latest successful extraction.
    pub fn issues(&self) -> &[ResourceError] {
        &self.issues
    }

    /// References left unresolved by the latest synchronization pass.
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn handles(&self) -> impl Iterator<Item = &VisualHandle<R::Handle>> {
        self.scene.handles()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain(..).collect()
    }

    /// Disposes every handle and hands the renderer back.
    pub fn into_renderer(mut self) -> R {
        let disposed = self.scene.clear(&mut self.renderer);
        debug!(disposed = disposed; "Session closed");
        self.renderer
    }
}
