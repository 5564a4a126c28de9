//! Ontoscope - navigable 3D views of semantic graphs.
//!
//! Extraction, layout and scene synchronization for a store of typed
//! resources. Classes and instances become spheres, relationship
//! definitions become labeled connectors and interface descriptors become
//! ports on their owner's surface. The user can drill into a class to see
//! only its direct subclasses and climb back out again.
//!
//! The engine sits between two collaborators it only knows through traits:
//! a [`store::Store`] it reads from and a [`scene::Renderer`] it drives.
//! [`Session`] wires everything together.

pub mod config;
pub mod event;
pub mod extract;
pub mod layout;
pub mod navigation;
pub mod resolve;
pub mod scene;
pub mod selection;
pub mod store;

mod error;
mod session;

pub use ontoscope_core::{entity, geometry, graph, identifier};

pub use error::{NavigationError, OntoscopeError, ResourceError, StoreError, UnresolvedReference};
pub use session::Session;
