//! Geometric primitives for scene layout and positioning.
//!
//! # Overview
//!
//! - [`Vec3`] - A 3D coordinate in scene space
//! - [`Spherical`] - A direction on a sphere surface, used for interface ports
//!
//! # Coordinate System
//!
//! Right-handed, Y up. Top-level layouts are placed in the XZ plane
//! (`y = 0`), so the default camera looks down on them at an angle.
//!
//! ```text
//!        +Y
//!         │
//!         │
//!         └────► +X
//!        ╱
//!      +Z
//! ```

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// Upper bound for the polar angle, kept strictly below π.
const MAX_THETA: f32 = PI - 1e-6;

/// A point or offset in scene space.
///
/// # Examples
///
/// ```
/// # use ontoscope_core::geometry::Vec3;
/// let a = Vec3::new(1.0, 2.0, 3.0);
/// let b = Vec3::new(1.0, 0.0, -3.0);
///
/// let sum = a.add(b);
/// assert_eq!(sum, Vec3::new(2.0, 2.0, 0.0));
/// assert_eq!(Vec3::ZERO.distance(Vec3::new(3.0, 4.0, 0.0)), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    /// Creates a new vector with the specified coordinates
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the z-coordinate
    pub fn z(self) -> f32 {
        self.z
    }

    /// Component-wise addition.
    pub fn add(self, other: Vec3) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise subtraction.
    pub fn sub(self, other: Vec3) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Multiplies every coordinate by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec3) -> f32 {
        self.sub(other).length()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// A direction on the surface of a sphere.
///
/// `phi` is the azimuth in `[0, 2π)`, `theta` the polar angle from +Y in
/// `[0, π)`. Constructors wrap/clamp into those ranges.
///
/// # Examples
///
/// ```
/// # use ontoscope_core::geometry::Spherical;
/// let top = Spherical::new(0.0, 0.0);
/// let offset = top.to_cartesian(5.0);
/// assert!((offset.y() - 5.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spherical {
    phi: f32,
    theta: f32,
}

impl Spherical {
    /// Creates a surface direction, wrapping `phi` into `[0, 2π)` and
    /// clamping `theta` into `[0, π)`.
    pub fn new(phi: f32, theta: f32) -> Self {
        let phi = phi.rem_euclid(TAU);
        // rem_euclid can round up to TAU for tiny negative inputs
        let phi = if phi >= TAU { 0.0 } else { phi };
        let theta = theta.clamp(0.0, MAX_THETA);
        Self { phi, theta }
    }

    /// Returns the azimuth angle.
    pub fn phi(self) -> f32 {
        self.phi
    }

    /// Returns the polar angle.
    pub fn theta(self) -> f32 {
        self.theta
    }

    /// Offset from the sphere centre to this surface point for a sphere of
    /// the given radius.
    pub fn to_cartesian(self, radius: f32) -> Vec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vec3::new(
            radius * sin_theta * cos_phi,
            radius * cos_theta,
            radius * sin_theta * sin_phi,
        )
    }
}
