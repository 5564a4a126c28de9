//! Configuration types for the Ontoscope engine.
//!
//! This module provides configuration structures that control layout,
//! camera framing and identifier resolution. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Circle layout parameters.
//! - [`CameraConfig`] - The canonical camera framing used when entering a class.
//! - [`ResolveConfig`] - The ranked identifier matching strategies.
//!
//! # Example
//!
//! ```
//! # use ontoscope::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().min_circle_radius(), 30.0);
//! assert_eq!(config.resolve().strategies().len(), 3);
//! ```

use serde::Deserialize;

use ontoscope_core::geometry::Vec3;

use crate::{navigation::CameraState, resolve::MatchStrategy};

/// Top-level configuration combining every section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Camera configuration section.
    #[serde(default)]
    camera: CameraConfig,

    /// Identifier resolution section.
    #[serde(default)]
    resolve: ResolveConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, camera: CameraConfig, resolve: ResolveConfig) -> Self {
        Self {
            layout,
            camera,
            resolve,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the camera configuration.
    pub fn camera(&self) -> &CameraConfig {
        &self.camera
    }

    /// Returns the identifier resolution configuration.
    pub fn resolve(&self) -> &ResolveConfig {
        &self.resolve
    }
}

/// Parameters of the circle layout.
///
/// `n > 1` classes are placed on a circle of radius
/// `max(min_circle_radius, n × spacing_per_class)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    min_circle_radius: f32,
    spacing_per_class: f32,
}

impl LayoutConfig {
    pub fn new(min_circle_radius: f32, spacing_per_class: f32) -> Self {
        Self {
            min_circle_radius,
            spacing_per_class,
        }
    }

    pub fn min_circle_radius(&self) -> f32 {
        self.min_circle_radius
    }

    pub fn spacing_per_class(&self) -> f32 {
        self.spacing_per_class
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_circle_radius: 30.0,
            spacing_per_class: 5.0,
        }
    }
}

/// Canonical camera framing, applied whenever a class scope is entered.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    position: Vec3,
    target: Vec3,
}

impl CameraConfig {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// The camera state this framing describes.
    pub fn default_state(&self) -> CameraState {
        CameraState::new(self.position, self.target)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 60.0, 160.0),
            target: Vec3::ZERO,
        }
    }
}

/// Ranked strategies used to match references against visible classes.
///
/// Strategies are tried in order; the first one producing any match wins.
/// An empty list disables matching entirely, so nothing resolves.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    strategies: Vec<MatchStrategy>,
}

impl ResolveConfig {
    pub fn new(strategies: Vec<MatchStrategy>) -> Self {
        Self { strategies }
    }

    /// Exact matching only.
    pub fn strict() -> Self {
        Self::new(vec![MatchStrategy::Exact])
    }

    pub fn strategies(&self) -> &[MatchStrategy] {
        &self.strategies
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            strategies: vec![
                MatchStrategy::Exact,
                MatchStrategy::TrailingSeparator,
                MatchStrategy::LocalName,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.min_circle_radius(), 30.0);
        assert_eq!(layout.spacing_per_class(), 5.0);
    }

    #[test]
    fn test_default_camera_framing() {
        let state = CameraConfig::default().default_state();
        assert_eq!(state.position(), Vec3::new(0.0, 60.0, 160.0));
        assert_eq!(state.target(), Vec3::ZERO);
    }

    #[test]
    fn test_default_resolve_order() {
        let resolve = ResolveConfig::default();
        assert_eq!(
            resolve.strategies(),
            [
                MatchStrategy::Exact,
                MatchStrategy::TrailingSeparator,
                MatchStrategy::LocalName
            ]
        );
        assert_eq!(ResolveConfig::strict().strategies(), [MatchStrategy::Exact]);
    }
}
