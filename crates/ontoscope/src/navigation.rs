//! Scoped drill-down navigation.
//!
//! The navigation state is an explicit [`Scope`] plus a LIFO stack of
//! [`NavigationFrame`]s. Entering a class pushes the current scope and a
//! camera snapshot; exiting pops the top frame and restores both exactly.
//! The stack depth always equals the nesting depth, and replaying the
//! frames from an empty stack reconstructs the current scope.

use std::fmt;

use indexmap::IndexSet;
use log::{info, warn};

use ontoscope_core::{geometry::Vec3, identifier::Id};

use crate::error::NavigationError;

/// The active navigation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Root graph: every class is visible.
    #[default]
    TopLevel,
    /// Inside a class: only its direct subclasses are visible.
    InsideClass(Id),
}

impl Scope {
    /// The class this scope is inside of, if any.
    pub fn class(&self) -> Option<Id> {
        match self {
            Scope::TopLevel => None,
            Scope::InsideClass(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::TopLevel => f.write_str("top level"),
            Scope::InsideClass(id) => write!(f, "inside {id}"),
        }
    }
}

/// Camera placement as seen by the engine: an eye position and a look-at
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraState {
    position: Vec3,
    target: Vec3,
}

impl CameraState {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}

/// Everything needed to undo one `enter`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationFrame {
    previous: Scope,
    camera: CameraState,
}

impl NavigationFrame {
    pub fn previous(&self) -> Scope {
        self.previous
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }
}

/// Stack-based scope state machine.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    scope: Scope,
    stack: Vec<NavigationFrame>,
}

impl Navigator {
    /// Starts at the top level with an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn frames(&self) -> &[NavigationFrame] {
        &self.stack
    }

    /// Classes entered so far, outermost first.
    pub fn path(&self) -> Vec<Id> {
        self.stack
            .iter()
            .skip(1)
            .filter_map(|frame| frame.previous.class())
            .chain(self.scope.class())
            .collect()
    }

    /// Enters `target`, which must be one of the `visible` classes.
    ///
    /// On success the current scope and `camera` are pushed, the scope
    /// becomes `InsideClass(target)` and `camera` is reset to `framing`.
    ///
    /// # Errors
    ///
    /// [`NavigationError::UnknownScopeTarget`] if `target` is not visible;
    /// nothing changes in that case.
    pub fn enter(
        &mut self,
        target: Id,
        visible: &IndexSet<Id>,
        camera: &mut CameraState,
        framing: CameraState,
    ) -> Result<(), NavigationError> {
        if !visible.contains(&target) {
            warn!(target:% = target, scope:% = self.scope; "Rejected enter: class is not visible");
            return Err(NavigationError::UnknownScopeTarget(target));
        }

        self.stack.push(NavigationFrame {
            previous: self.scope,
            camera: *camera,
        });
        self.scope = Scope::InsideClass(target);
        *camera = framing;
        info!(target:% = target, depth = self.depth(); "Entered class scope");
        Ok(())
    }

    /// Leaves the current class scope, restoring the previous scope and
    /// `camera` exactly. Returns the class that was exited.
    ///
    /// # Errors
    ///
    /// [`NavigationError::EmptyStack`] at the top level; nothing changes.
    pub fn exit(&mut self, camera: &mut CameraState) -> Result<Id, NavigationError> {
        let Some(frame) = self.stack.pop() else {
            warn!("Ignored exit: navigation stack is empty");
            return Err(NavigationError::EmptyStack);
        };

        let exited = self.scope.class();
        self.scope = frame.previous;
        *camera = frame.camera;
        info!(scope:% = self.scope, depth = self.depth(); "Exited class scope");

        // A non-empty stack implies the scope was InsideClass.
        exited.ok_or(NavigationError::EmptyStack)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// `enter` × n followed by `exit` × n restores the starting scope and
    /// camera, and the depth tracks every step.
    fn check_lifo_restoration(targets: Vec<u8>, cameras: Vec<f32>) -> Result<(), TestCaseError> {
        let mut nav = Navigator::new();
        let start = CameraState::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::ZERO);
        let mut cam = start;
        let framing = CameraState::new(Vec3::new(0.0, 60.0, 160.0), Vec3::ZERO);

        let mut history = Vec::new();
        for (i, target) in targets.iter().enumerate() {
            let id = Id::new(&format!("lifo:{target}"));
            let visible: IndexSet<Id> = std::iter::once(id).collect();
            history.push((nav.scope(), cam));
            nav.enter(id, &visible, &mut cam, framing)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(nav.depth(), i + 1);
            // The host moves the camera between commands.
            let x = cameras[i % cameras.len()];
            cam = CameraState::new(Vec3::new(x, x, x), Vec3::new(x, 0.0, 0.0));
        }

        while let Some((scope, camera)) = history.pop() {
            nav.exit(&mut cam)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(nav.scope(), scope);
            prop_assert_eq!(cam, camera);
            prop_assert_eq!(nav.depth(), history.len());
        }

        prop_assert_eq!(nav.scope(), Scope::TopLevel);
        prop_assert_eq!(cam, start);
        Ok(())
    }

    proptest! {
        #[test]
        fn lifo_restoration(
            targets in prop::collection::vec(any::<u8>(), 1..12),
            cameras in prop::collection::vec(-500.0f32..500.0, 1..4),
        ) {
            check_lifo_restoration(targets, cameras)?;
        }
    }
}
