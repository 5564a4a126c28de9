//! Matching entity references against the currently visible classes.
//!
//! Relationship endpoints and interface owners are plain identifiers
//! discovered independently of the classes they point at. The [`Resolver`]
//! maps such a reference onto one visible class by trying an explicit,
//! ranked list of [`MatchStrategy`]s. The first strategy that finds any
//! candidate decides. When a strategy finds several candidates the match is
//! ambiguous: the lexicographically smallest identifier is taken and a
//! warning is logged, so results are reproducible.

use indexmap::IndexSet;
use log::{trace, warn};
use serde::Deserialize;

use ontoscope_core::identifier::{self, Id};

/// One way of matching a reference against a visible class identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Identical identifiers.
    Exact,
    /// Identifiers equal once one trailing `/` or `#` is dropped from each.
    TrailingSeparator,
    /// The reference's local name occurs inside the class identifier.
    LocalName,
}

/// The visible class a reference resolved to, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    id: Id,
    strategy: MatchStrategy,
}

impl Resolution {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }
}

/// Ranked identifier matcher.
#[derive(Debug, Clone)]
pub struct Resolver {
    strategies: Vec<MatchStrategy>,
}

impl Resolver {
    pub fn new(strategies: &[MatchStrategy]) -> Self {
        Self {
            strategies: strategies.to_vec(),
        }
    }

    /// Resolves `reference` against `visible`, or `None` if no strategy
    /// matches.
    pub fn resolve(&self, reference: Id, visible: &IndexSet<Id>) -> Option<Resolution> {
        for &strategy in &self.strategies {
            let mut candidates = candidates(strategy, reference, visible);
            if candidates.is_empty() {
                continue;
            }

            candidates.sort_by(Id::cmp_lexical);
            let id = candidates[0];
            if candidates.len() > 1 {
                warn!(
                    reference:% = reference,
                    strategy:? = strategy,
                    candidates = candidates.len(),
                    chosen:% = id;
                    "Ambiguous identifier match, taking the lexicographically smallest"
                );
            } else if strategy != MatchStrategy::Exact {
                trace!(reference:% = reference, strategy:? = strategy, matched:% = id; "Fuzzy identifier match");
            }
            return Some(Resolution { id, strategy });
        }
        None
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&[
            MatchStrategy::Exact,
            MatchStrategy::TrailingSeparator,
            MatchStrategy::LocalName,
        ])
    }
}

fn candidates(strategy: MatchStrategy, reference: Id, visible: &IndexSet<Id>) -> Vec<Id> {
    match strategy {
        MatchStrategy::Exact => visible.get(&reference).copied().into_iter().collect(),
        MatchStrategy::TrailingSeparator => {
            let wanted = reference.with_str(|s| strip_one_separator(s).to_owned());
            visible
                .iter()
                .copied()
                .filter(|&id| id != reference)
                .filter(|id| id.with_str(|s| strip_one_separator(s) == wanted))
                .collect()
        }
        MatchStrategy::LocalName => {
            let local = reference.with_str(|s| identifier::local_name(s).to_owned());
            if local.is_empty() {
                return Vec::new();
            }
            visible
                .iter()
                .copied()
                .filter(|id| id.with_str(|s| s.contains(local.as_str())))
                .collect()
        }
    }
}

/// Matches a navigation target against the visible classes.
///
/// Stricter than [`Resolver::resolve`]: only an identical identifier, or a
/// bare local name equal to the local name of exactly one visible class,
/// is accepted. Partial and ambiguous names match nothing.
pub fn scope_target(reference: Id, visible: &IndexSet<Id>) -> Option<Id> {
    if visible.contains(&reference) {
        return Some(reference);
    }

    let local = reference.local_name();
    if local.is_empty() || reference != local.as_str() {
        return None;
    }

    let mut matches = visible.iter().copied().filter(|id| id.local_name() == local);
    match (matches.next(), matches.next()) {
        (Some(id), None) => Some(id),
        (Some(_), Some(_)) => {
            warn!(reference:% = reference; "Ambiguous local name, not entering");
            None
        }
        _ => None,
    }
}

fn strip_one_separator(s: &str) -> &str {
    s.strip_suffix(['/', '#']).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(ids: &[&str]) -> IndexSet<Id> {
        ids.iter().map(|id| Id::new(id)).collect()
    }

    #[test]
    fn test_exact_match_wins() {
        let set = visible(&["http://r.org/Person", "http://r.org/other/Person"]);
        let resolution = Resolver::default()
            .resolve(Id::new("http://r.org/Person"), &set)
            .expect("resolves");

        assert_eq!(resolution.id(), "http://r.org/Person");
        assert_eq!(resolution.strategy(), MatchStrategy::Exact);
    }

    #[test]
    fn test_trailing_separator_match() {
        let set = visible(&["http://r.org/Place"]);
        let resolution = Resolver::default()
            .resolve(Id::new("http://r.org/Place/"), &set)
            .expect("resolves");

        assert_eq!(resolution.id(), "http://r.org/Place");
        assert_eq!(resolution.strategy(), MatchStrategy::TrailingSeparator);
    }

    #[test]
    fn test_trailing_separator_both_directions() {
        let set = visible(&["http://r.org/Thing#"]);
        let resolution = Resolver::default()
            .resolve(Id::new("http://r.org/Thing"), &set)
            .expect("resolves");

        assert_eq!(resolution.id(), "http://r.org/Thing#");
    }

    #[test]
    fn test_local_name_fallback() {
        let set = visible(&["http://r.org/model#Vehicle"]);
        let resolution = Resolver::default()
            .resolve(Id::new("urn:other:Vehicle"), &set)
            .expect("resolves");

        assert_eq!(resolution.id(), "http://r.org/model#Vehicle");
        assert_eq!(resolution.strategy(), MatchStrategy::LocalName);
    }

    #[test]
    fn test_local_name_collision_is_deterministic() {
        let first = visible(&["urn:z:Car", "urn:a:Car", "urn:m:Car"]);
        let second = visible(&["urn:m:Car", "urn:z:Car", "urn:a:Car"]);
        let resolver = Resolver::default();

        let a = resolver.resolve(Id::new("urn:q:Car"), &first).expect("resolves");
        let b = resolver.resolve(Id::new("urn:q:Car"), &second).expect("resolves");

        assert_eq!(a.id(), "urn:a:Car");
        assert_eq!(a, b);
    }

    #[test]
    fn test_strict_resolver_skips_fuzzy() {
        let set = visible(&["http://r.org/Place"]);
        let resolver = Resolver::new(&[MatchStrategy::Exact]);

        assert!(resolver.resolve(Id::new("http://r.org/Place/"), &set).is_none());
    }

    #[test]
    fn test_no_match() {
        let set = visible(&["urn:x:Alpha"]);
        assert!(Resolver::default().resolve(Id::new("urn:x:Beta"), &set).is_none());
        assert!(Resolver::default().resolve(Id::new("urn:x:Beta"), &IndexSet::new()).is_none());
    }

    #[test]
    fn test_scope_target_exact_and_bare_local_name() {
        let set = visible(&["zoo:Animal", "zoo:Plant"]);

        assert_eq!(scope_target(Id::new("zoo:Animal"), &set), Some(Id::new("zoo:Animal")));
        assert_eq!(scope_target(Id::new("Plant"), &set), Some(Id::new("zoo:Plant")));
    }

    #[test]
    fn test_scope_target_rejects_partial_names() {
        let set = visible(&["zoo:Animal"]);

        assert_eq!(scope_target(Id::new("zoo:Anim"), &set), None);
        assert_eq!(scope_target(Id::new("a"), &set), None);
        assert_eq!(scope_target(Id::new("Anim"), &set), None);
        assert_eq!(scope_target(Id::new("other:Animal"), &set), None);
    }

    #[test]
    fn test_scope_target_rejects_ambiguous_local_name() {
        let set = visible(&["urn:a:Car", "urn:b:Car"]);

        assert_eq!(scope_target(Id::new("Car"), &set), None);
        assert_eq!(scope_target(Id::new("urn:b:Car"), &set), Some(Id::new("urn:b:Car")));
    }
}
