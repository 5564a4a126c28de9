//! Selection and hover state.
//!
//! The flags live on the entities of the published graph, but a graph is
//! replaced whole on every extraction pass. The [`SelectionTracker`]
//! remembers which keys are selected and which one is hovered, so the
//! state can be written back onto each fresh graph.

use indexmap::IndexSet;
use log::{debug, warn};

use ontoscope_core::{entity::EntityKey, graph::EntityGraph};

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: IndexSet<EntityKey>,
    hovered: Option<EntityKey>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected keys, in selection order.
    pub fn selected(&self) -> &IndexSet<EntityKey> {
        &self.selected
    }

    pub fn hovered(&self) -> Option<EntityKey> {
        self.hovered
    }

    pub fn is_selected(&self, key: EntityKey) -> bool {
        self.selected.contains(&key)
    }

    /// Sets the selected flag of `key` in `graph`.
    ///
    /// Returns `true` only if the flag changed, i.e. the entity's visual
    /// handle needs a refresh. Unknown keys are logged and ignored.
    pub fn set_selected(&mut self, graph: &mut EntityGraph, key: EntityKey, value: bool) -> bool {
        match graph.set_selected(key, value) {
            None => {
                warn!(key:% = key; "Cannot change selection: no such entity");
                false
            }
            Some(changed) => {
                if value {
                    self.selected.insert(key);
                } else {
                    self.selected.shift_remove(&key);
                }
                if changed {
                    debug!(key:% = key, selected = value; "Selection changed");
                }
                changed
            }
        }
    }

    /// Moves the hover to `key`, or clears it with `None`.
    ///
    /// Returns the keys whose hovered flag changed: at most the previously
    /// and the newly hovered entity. A key missing from `graph` clears the
    /// hover.
    pub fn hover(&mut self, graph: &mut EntityGraph, key: Option<EntityKey>) -> Vec<EntityKey> {
        if key == self.hovered {
            return Vec::new();
        }

        let mut touched = Vec::with_capacity(2);
        if let Some(previous) = self.hovered.take() {
            if graph.set_hovered(previous, false) == Some(true) {
                touched.push(previous);
            }
        }

        if let Some(next) = key {
            match graph.set_hovered(next, true) {
                Some(changed) => {
                    self.hovered = Some(next);
                    if changed {
                        touched.push(next);
                    }
                }
                None => warn!(key:% = next; "Cannot hover: no such entity"),
            }
        }
        touched
    }

    /// Writes the remembered state onto a freshly published graph.
    ///
    /// Keys whose entity no longer exists are forgotten.
    pub fn reapply(&mut self, graph: &mut EntityGraph) {
        let before = self.selected.len();
        self.selected
            .retain(|key| graph.set_selected(*key, true).is_some());
        if self.selected.len() != before {
            debug!(dropped = before - self.selected.len(); "Forgot selection of vanished entities");
        }

        if let Some(key) = self.hovered {
            if graph.set_hovered(key, true).is_none() {
                debug!(key:% = key; "Hovered entity vanished");
                self.hovered = None;
            }
        }
    }
}
