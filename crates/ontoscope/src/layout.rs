//! Layout assignment for the classes of the current scope.
//!
//! Classes are placed on a circle in the XZ plane:
//!
//! - no classes: nothing happens
//! - one class: it sits at the origin
//! - `n > 1` classes: evenly spaced on a circle of radius
//!   `max(min_circle_radius, n × spacing_per_class)`, starting on +X and
//!   following the order of the given identifiers
//!
//! Only the listed classes are moved; everything else keeps its position.

use std::f32::consts::TAU;

use log::{debug, trace};

use ontoscope_core::{geometry::Vec3, graph::EntityGraph, identifier::Id};

use crate::config::LayoutConfig;

/// Radius of the circle holding `count` classes.
pub fn circle_radius(count: usize, config: &LayoutConfig) -> f32 {
    config
        .min_circle_radius()
        .max(count as f32 * config.spacing_per_class())
}

/// Positions for `ids`, in order.
pub fn circle_positions(ids: &[Id], config: &LayoutConfig) -> Vec<(Id, Vec3)> {
    match ids {
        [] => Vec::new(),
        [only] => vec![(*only, Vec3::ZERO)],
        _ => {
            let radius = circle_radius(ids.len(), config);
            let step = TAU / ids.len() as f32;
            ids.iter()
                .enumerate()
                .map(|(i, &id)| {
                    let angle = step * i as f32;
                    (id, Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()))
                })
                .collect()
        }
    }
}

/// Assigns positions to the classes `in_scope` inside `graph`.
///
/// Identifiers that are not classes of `graph` are ignored.
pub fn assign_positions(graph: &mut EntityGraph, in_scope: &[Id], config: &LayoutConfig) {
    if in_scope.is_empty() {
        return;
    }

    for (id, position) in circle_positions(in_scope, config) {
        if let Some(class) = graph.class_mut(id) {
            trace!(id:% = id, position:? = position; "Placing class");
            class.set_position(position);
        }
    }
    debug!(classes = in_scope.len(), radius = circle_radius(in_scope.len(), config); "Layout assigned");
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    /// Every class sits on the circle, in the y = 0 plane.
    fn check_on_circle(count: usize) -> Result<(), TestCaseError> {
        let config = LayoutConfig::default();
        let ids: Vec<Id> = (0..count).map(|i| Id::new(&format!("prop:c{i}"))).collect();
        let radius = circle_radius(count, &config);

        for (_, position) in circle_positions(&ids, &config) {
            prop_assert!(approx_eq!(f32, position.length(), radius, epsilon = radius * 1e-4));
            prop_assert_eq!(position.y(), 0.0);
        }
        Ok(())
    }

    /// Neighbours are all the same distance apart.
    fn check_even_spacing(count: usize) -> Result<(), TestCaseError> {
        let config = LayoutConfig::default();
        let ids: Vec<Id> = (0..count).map(|i| Id::new(&format!("prop:c{i}"))).collect();
        let positions: Vec<Vec3> = circle_positions(&ids, &config)
            .into_iter()
            .map(|(_, p)| p)
            .collect();

        let expected = positions[0].distance(positions[1]);
        for pair in positions.windows(2) {
            let gap = pair[0].distance(pair[1]);
            prop_assert!(approx_eq!(f32, gap, expected, epsilon = expected * 1e-3));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn on_circle(count in 2usize..64) {
            check_on_circle(count)?;
        }

        #[test]
        fn even_spacing(count in 2usize..64) {
            check_even_spacing(count)?;
        }
    }
}
