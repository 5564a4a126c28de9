//! Notifications emitted by a [`Session`](crate::session::Session).

use std::fmt;

use ontoscope_core::identifier::Id;

/// Something the host loop may want to react to.
///
/// Events are queued in emission order and drained by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// A new entity graph was published.
    GraphUpdated { epoch: u64 },
    /// A synchronization pass finished.
    SceneUpdated { created: usize, disposed: usize },
    ScopeEntered(Id),
    ScopeExited(Id),
}

impl fmt::Display for SceneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneEvent::GraphUpdated { epoch } => write!(f, "graph-updated (epoch {epoch})"),
            SceneEvent::SceneUpdated { created, disposed } => {
                write!(f, "scene-updated (+{created} -{disposed})")
            }
            SceneEvent::ScopeEntered(id) => write!(f, "scope-entered {id}"),
            SceneEvent::ScopeExited(id) => write!(f, "scope-exited {id}"),
        }
    }
}
