//! Graph extraction from a semantic store.
//!
//! The [`Extractor`] rebuilds a complete [`EntityGraph`] from the store's
//! listing queries. Every pass starts from scratch; the caller publishes the
//! result by replacing its previous graph whole.
//!
//! The pass runs in a fixed order:
//!
//! 1. class-defining resources
//! 2. instances of each class (skipping identifiers already known)
//! 3. properties of every class and instance
//! 4. subclass edges, kept only when both endpoints are known
//! 5. relationship definitions, one entity per domain × range pair
//! 6. interface definitions, each with exactly one owner and a random
//!    position on the owner's surface
//!
//! A malformed resource or a failed per-resource query is reported in
//! [`Extraction::issues`] and skipped. Only a failed top-level listing aborts
//! the pass. That includes the relationship and interface listings: if either
//! fails, the classes and instances already gathered in the pass are dropped
//! too and the caller keeps its previous graph.

use std::f32::consts::{PI, TAU};

use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use ontoscope_core::{
    entity::{ClassEntity, InterfaceEntity, Method, Parameter, Property, RelationshipEntity},
    geometry::Spherical,
    graph::EntityGraph,
    identifier::{self, Id},
};

use crate::{
    error::{ResourceError, StoreError},
    store::{InterfaceRecord, MethodRecord, RelationshipRecord, Store},
};

/// Return type recorded for methods that declare none.
pub const DEFAULT_RETURN_TYPE: &str = "void";

/// Result of one extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    graph: EntityGraph,
    issues: Vec<ResourceError>,
}

impl Extraction {
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Resources skipped during the pass.
    pub fn issues(&self) -> &[ResourceError] {
        &self.issues
    }

    pub fn into_parts(self) -> (EntityGraph, Vec<ResourceError>) {
        (self.graph, self.issues)
    }
}

/// A store resource that made it into the graph, with the raw identifier
/// used to query the store about it.
struct Known {
    id: Id,
    raw: String,
}

/// Rebuilds entity graphs from a [`Store`].
///
/// The random source places interface ports; positions are stable for one
/// graph, not across passes.
#[derive(Debug, Clone)]
pub struct Extractor<R = StdRng> {
    rng: R,
}

impl Extractor<StdRng> {
    /// Creates an extractor with a randomly seeded generator.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Creates an extractor with reproducible interface placement.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Extractor<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Extractor<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Runs one full extraction pass against `store`.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of a failed top-level listing
    /// (`list_classes`, `list_relationship_definitions` or
    /// `list_interface_definitions`). Everything else is reported through
    /// [`Extraction::issues`].
    pub async fn extract<S>(&mut self, store: &S) -> Result<Extraction, StoreError>
    where
        S: Store + ?Sized,
    {
        let mut graph = EntityGraph::new();
        let mut issues = Vec::new();

        let classes = extract_classes(store, &mut graph, &mut issues).await?;
        let instances = extract_instances(store, &classes, &mut graph, &mut issues).await;
        extract_properties(
            store,
            classes.iter().chain(&instances),
            &mut graph,
            &mut issues,
        )
        .await;
        extract_subclasses(store, &classes, &mut graph, &mut issues).await;

        let relationships = store.list_relationship_definitions().await?;
        for record in relationships {
            if let Err(err) = add_relationships(&mut graph, &record) {
                warn!(resource = record.id.as_str(), reason = err.reason(); "Skipping relationship definition");
                issues.push(err);
            }
        }

        let interfaces = store.list_interface_definitions().await?;
        for record in interfaces {
            if let Err(err) = self.add_interface(&mut graph, &record) {
                warn!(resource = record.id.as_str(), reason = err.reason(); "Skipping interface definition");
                issues.push(err);
            }
        }

        info!(
            classes = graph.classes().len(),
            relationships = graph.relationships().len(),
            interfaces = graph.interfaces().len(),
            issues = issues.len();
            "Graph extracted"
        );
        Ok(Extraction { graph, issues })
    }

    fn add_interface(
        &mut self,
        graph: &mut EntityGraph,
        record: &InterfaceRecord,
    ) -> Result<(), ResourceError> {
        let id = require_id(&record.id)?;
        if graph.interface(id).is_some() {
            trace!(id:% = id; "Duplicate interface ignored");
            return Ok(());
        }

        let owners: IndexSet<Id> = record
            .owners
            .iter()
            .map(|owner| identifier::canonicalize(owner))
            .filter(|owner| !owner.is_empty())
            .map(Id::new)
            .collect();
        let owner = match owners.len() {
            1 => owners[0],
            n => {
                return Err(ResourceError::new(
                    &record.id,
                    format!("expected exactly one owner class, found {n}"),
                ));
            }
        };

        let methods = record
            .methods
            .iter()
            .map(|method| to_method(&record.id, method))
            .collect::<Result<Vec<_>, _>>()?;

        let surface = Spherical::new(
            self.rng.random_range(0.0..TAU),
            self.rng.random_range(0.0..PI),
        );
        let label = label_or_local_name(record.label.as_deref(), id);

        if let Some(class) = graph.class_mut(owner) {
            class.add_interface(id);
        }
        trace!(id:% = id, owner:% = owner, methods = methods.len(); "Interface");
        graph.insert_interface(InterfaceEntity::new(id, label, owner, surface).with_methods(methods));
        Ok(())
    }
}

async fn extract_classes<S>(
    store: &S,
    graph: &mut EntityGraph,
    issues: &mut Vec<ResourceError>,
) -> Result<Vec<Known>, StoreError>
where
    S: Store + ?Sized,
{
    let records = store.list_classes().await?;
    let mut known = Vec::with_capacity(records.len());
    for record in records {
        let Some(id) = canonical_id(&record.id, issues) else {
            continue;
        };
        let label = label_or_local_name(record.label.as_deref(), id);
        if graph.insert_class(ClassEntity::new(id, label)) {
            trace!(id:% = id; "Class");
            known.push(Known { id, raw: record.id });
        } else {
            trace!(id:% = id; "Duplicate class ignored");
        }
    }
    debug!(classes = known.len(); "Classes listed");
    Ok(known)
}

async fn extract_instances<S>(
    store: &S,
    classes: &[Known],
    graph: &mut EntityGraph,
    issues: &mut Vec<ResourceError>,
) -> Vec<Known>
where
    S: Store + ?Sized,
{
    let mut known = Vec::new();
    for class in classes {
        let records = match store.list_instances_of(&class.raw).await {
            Ok(records) => records,
            Err(err) => {
                report_query_failure(&class.raw, &err, issues);
                continue;
            }
        };
        for record in records {
            let Some(id) = canonical_id(&record.id, issues) else {
                continue;
            };
            if graph.contains_class(id) {
                trace!(id:% = id, class:% = class.id; "Instance already known");
                continue;
            }
            let label = label_or_local_name(record.label.as_deref(), id);
            graph.insert_class(ClassEntity::new(id, label).with_instance_of(class.id));
            known.push(Known { id, raw: record.id });
        }
    }
    debug!(instances = known.len(); "Instances listed");
    known
}

async fn extract_properties<'a, S>(
    store: &S,
    resources: impl Iterator<Item = &'a Known>,
    graph: &mut EntityGraph,
    issues: &mut Vec<ResourceError>,
) where
    S: Store + ?Sized,
{
    for resource in resources {
        let records = match store.list_properties(&resource.raw).await {
            Ok(records) => records,
            Err(err) => {
                report_query_failure(&resource.raw, &err, issues);
                continue;
            }
        };
        if let Some(class) = graph.class_mut(resource.id) {
            for record in records {
                class.add_property(Property::new(record.predicate, record.value));
            }
        }
    }
}

async fn extract_subclasses<S>(
    store: &S,
    classes: &[Known],
    graph: &mut EntityGraph,
    issues: &mut Vec<ResourceError>,
) where
    S: Store + ?Sized,
{
    let mut edges = 0usize;
    for class in classes {
        let subclasses = match store.list_subclasses(&class.raw).await {
            Ok(subclasses) => subclasses,
            Err(err) => {
                report_query_failure(&class.raw, &err, issues);
                continue;
            }
        };
        for raw in subclasses {
            let sub = Id::canonical(&raw);
            if sub == class.id || !graph.contains_class(sub) {
                trace!(class:% = class.id, subclass = raw.as_str(); "Subclass edge dropped");
                continue;
            }
            if let Some(entity) = graph.class_mut(class.id) {
                if entity.add_subclass(sub) {
                    edges += 1;
                }
            }
        }
    }
    debug!(edges = edges; "Subclass edges registered");
}

/// Adds one relationship entity per domain × range pair of `record`.
fn add_relationships(graph: &mut EntityGraph, record: &RelationshipRecord) -> Result<(), ResourceError> {
    let definition = require_id(&record.id)?;
    let domains = endpoint_ids(&record.domains);
    let ranges = endpoint_ids(&record.ranges);
    if domains.is_empty() {
        return Err(ResourceError::new(&record.id, "no domain declared"));
    }
    if ranges.is_empty() {
        return Err(ResourceError::new(&record.id, "no range declared"));
    }

    let label = label_or_local_name(record.label.as_deref(), definition);
    for &domain in &domains {
        for &range in &ranges {
            let entity = RelationshipEntity::new(definition, label.clone(), domain, range);
            trace!(id:% = entity.id(); "Relationship");
            graph.insert_relationship(entity);
        }
    }
    Ok(())
}

fn endpoint_ids(raw: &[String]) -> IndexSet<Id> {
    raw.iter()
        .map(|id| identifier::canonicalize(id))
        .filter(|id| !id.is_empty())
        .map(Id::new)
        .collect()
}

fn to_method(interface: &str, record: &MethodRecord) -> Result<Method, ResourceError> {
    if record.name.trim().is_empty() {
        return Err(ResourceError::new(interface, "method without a name"));
    }
    let return_type = record
        .return_type
        .as_deref()
        .filter(|ty| !ty.trim().is_empty())
        .unwrap_or(DEFAULT_RETURN_TYPE);
    Ok(record
        .parameters
        .iter()
        .fold(Method::new(record.name.trim(), return_type), |method, param| {
            method.with_parameter(Parameter::new(param.name.as_str(), param.type_name.as_str()))
        }))
}

fn require_id(raw: &str) -> Result<Id, ResourceError> {
    let canonical = identifier::canonicalize(raw);
    if canonical.is_empty() {
        return Err(ResourceError::new(raw, "empty identifier"));
    }
    Ok(Id::new(canonical))
}

fn canonical_id(raw: &str, issues: &mut Vec<ResourceError>) -> Option<Id> {
    match require_id(raw) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(resource = raw; "Skipping resource with an empty identifier");
            issues.push(err);
            None
        }
    }
}

fn report_query_failure(resource: &str, err: &StoreError, issues: &mut Vec<ResourceError>) {
    warn!(resource = resource, err:% = err; "Store query failed, skipping resource");
    issues.push(ResourceError::new(resource, err.to_string()));
}

fn label_or_local_name(label: Option<&str>, id: Id) -> String {
    match label.map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => label.to_owned(),
        None => id.local_name(),
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{MemoryStore, ParameterRecord, ResourceRecord};

    use super::*;

    fn relationship(id: &str, domains: &[&str], ranges: &[&str]) -> RelationshipRecord {
        RelationshipRecord {
            id: id.to_owned(),
            label: None,
            domains: domains.iter().map(|d| (*d).to_owned()).collect(),
            ranges: ranges.iter().map(|r| (*r).to_owned()).collect(),
        }
    }

    fn interface(id: &str, owners: &[&str]) -> InterfaceRecord {
        InterfaceRecord {
            id: id.to_owned(),
            label: None,
            owners: owners.iter().map(|o| (*o).to_owned()).collect(),
            methods: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_label_falls_back_to_local_name() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("http://x.org/onto#Vehicle"));
        store.add_class(ResourceRecord::new("http://x.org/onto#Car").with_label("Automobile"));

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");
        let graph = extraction.graph();

        assert_eq!(
            graph.class(Id::new("http://x.org/onto#Vehicle")).map(ClassEntity::label),
            Some("Vehicle")
        );
        assert_eq!(
            graph.class(Id::new("http://x.org/onto#Car")).map(ClassEntity::label),
            Some("Automobile")
        );
    }

    #[tokio::test]
    async fn test_instances_skip_known_ids() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("ex:Animal"));
        store.add_class(ResourceRecord::new("ex:Cat"));
        store.add_instance("ex:Animal", ResourceRecord::new("ex:Cat"));
        store.add_instance("ex:Animal", ResourceRecord::new("ex:tom"));
        store.add_instance("ex:Cat", ResourceRecord::new("ex:tom/"));

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");
        let graph = extraction.graph();

        assert_eq!(graph.classes().len(), 3);
        assert_eq!(graph.class(Id::new("ex:Cat")).and_then(ClassEntity::instance_of), None);
        assert_eq!(
            graph.class(Id::new("ex:tom")).and_then(ClassEntity::instance_of),
            Some(Id::new("ex:Animal"))
        );
    }

    #[tokio::test]
    async fn test_subclass_edges_need_both_endpoints() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("ex:Animal"));
        store.add_class(ResourceRecord::new("ex:Cat"));
        store.add_subclass("ex:Animal", "ex:Cat");
        store.add_subclass("ex:Animal", "ex:Unicorn");
        store.add_subclass("ex:Animal", "ex:Animal");

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");
        let animal = extraction.graph().class(Id::new("ex:Animal")).expect("animal");

        assert_eq!(animal.subclasses().len(), 1);
        assert!(animal.subclasses().contains(&Id::new("ex:Cat")));
    }

    #[tokio::test]
    async fn test_properties_attached() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("ex:Animal"));
        store.add_instance("ex:Animal", ResourceRecord::new("ex:rex"));
        store.add_property("ex:Animal", "rdfs:comment", "living");
        store.add_property("ex:rex", "ex:age", "4");

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");
        let graph = extraction.graph();

        let rex = graph.class(Id::new("ex:rex")).expect("rex");
        assert_eq!(rex.properties(), &[Property::new("ex:age", "4")]);
        assert_eq!(graph.class(Id::new("ex:Animal")).expect("animal").properties().len(), 1);
    }

    #[tokio::test]
    async fn test_relationship_cross_product() {
        let store = MemoryStore::new();
        store.add_relationship(relationship(
            "ex:near",
            &["ex:A", "ex:B", "ex:C"],
            &["ex:X", "ex:Y"],
        ));

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");
        let graph = extraction.graph();

        assert_eq!(graph.relationships().len(), 6);
        assert!(
            graph
                .relationships()
                .values()
                .all(|r| r.definition() == Id::new("ex:near") && r.label() == "near")
        );
    }

    #[tokio::test]
    async fn test_relationship_without_range_is_reported() {
        let store = MemoryStore::new();
        store.add_relationship(relationship("ex:dangling", &["ex:A"], &[]));
        store.add_relationship(relationship("ex:fine", &["ex:A"], &["ex:A"]));

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");

        assert_eq!(extraction.graph().relationships().len(), 1);
        assert_eq!(extraction.issues().len(), 1);
        assert_eq!(extraction.issues()[0].resource(), "ex:dangling");
    }

    #[tokio::test]
    async fn test_interface_owner_rules() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("ex:Engine"));
        store.add_interface(interface("ex:Start", &["ex:Engine"]));
        store.add_interface(interface("ex:Orphan", &[]));
        store.add_interface(interface("ex:Shared", &["ex:Engine", "ex:Wheel"]));

        let extraction = Extractor::with_seed(7).extract(&store).await.expect("extract");
        let graph = extraction.graph();

        assert_eq!(graph.interfaces().len(), 1);
        assert_eq!(extraction.issues().len(), 2);
        let engine = graph.class(Id::new("ex:Engine")).expect("engine");
        assert!(engine.interfaces().contains(&Id::new("ex:Start")));

        let surface = graph.interface(Id::new("ex:Start")).expect("start").surface();
        assert!((0.0..TAU).contains(&surface.phi()));
        assert!((0.0..PI).contains(&surface.theta()));
    }

    #[tokio::test]
    async fn test_interface_methods() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("ex:Engine"));
        store.add_interface(InterfaceRecord {
            methods: vec![
                MethodRecord {
                    name: "start".to_owned(),
                    return_type: None,
                    parameters: vec![ParameterRecord {
                        name: "rpm".to_owned(),
                        type_name: "u32".to_owned(),
                    }],
                },
                MethodRecord {
                    name: "status".to_owned(),
                    return_type: Some("String".to_owned()),
                    parameters: Vec::new(),
                },
            ],
            ..interface("ex:Control", &["ex:Engine"])
        });

        let extraction = Extractor::with_seed(7).extract(&store).await.expect("extract");
        let control = extraction.graph().interface(Id::new("ex:Control")).expect("control");

        let signatures: Vec<String> = control.methods().iter().map(Method::signature).collect();
        assert_eq!(signatures, vec!["start(rpm: u32) -> void", "status() -> String"]);
    }

    #[tokio::test]
    async fn test_same_seed_same_surface() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("ex:Engine"));
        store.add_interface(interface("ex:Start", &["ex:Engine"]));

        let first = Extractor::with_seed(42).extract(&store).await.expect("extract");
        let second = Extractor::with_seed(42).extract(&store).await.expect("extract");

        let surface = |e: &Extraction| e.graph().interface(Id::new("ex:Start")).map(InterfaceEntity::surface);
        assert_eq!(surface(&first), surface(&second));
    }

    #[tokio::test]
    async fn test_empty_identifier_reported() {
        let store = MemoryStore::new();
        store.add_class(ResourceRecord::new("  "));
        store.add_class(ResourceRecord::new("ex:Ok"));

        let extraction = Extractor::with_seed(1).extract(&store).await.expect("extract");

        assert_eq!(extraction.graph().classes().len(), 1);
        assert_eq!(extraction.issues().len(), 1);
    }
}
