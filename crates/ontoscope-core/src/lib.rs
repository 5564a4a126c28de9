//! Ontoscope Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Ontoscope
//! engine and its front ends. It includes:
//!
//! - **Identifiers**: Canonical, string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Scene-space vectors and sphere-surface directions ([`geometry`] module)
//! - **Entities**: Classes, relationships and interfaces ([`entity`] module)
//! - **Graph**: The identifier-keyed entity container ([`graph::EntityGraph`])

pub mod entity;
pub mod geometry;
pub mod graph;
pub mod identifier;
