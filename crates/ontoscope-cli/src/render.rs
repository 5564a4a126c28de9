//! Plain-text rendering of a scene.
//!
//! [`TextRenderer`] is a [`Renderer`] whose handles are lines of text. It
//! computes the same placement a 3D renderer would: spheres at their class
//! position, connectors at the midpoint of their endpoints and ports on
//! the owner's surface.

use std::fmt;

use ontoscope::{
    Session,
    entity::EntityKind,
    geometry::Vec3,
    identifier::Id,
    scene::{EntityRef, Renderer},
    store::Store,
};

/// One rendered entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLine {
    kind: EntityKind,
    id: Id,
    label: String,
    position: Vec3,
    detail: String,
    selected: bool,
    hovered: bool,
}

impl SceneLine {
    fn from_entity(entity: EntityRef<'_>) -> Self {
        let key = entity.key();
        let (position, detail) = match entity {
            EntityRef::Class(class) => {
                let detail = match class.instance_of() {
                    Some(class_id) => format!("r={:.1} instance of {class_id}", class.radius()),
                    None => format!("r={:.1}", class.radius()),
                };
                (class.position(), detail)
            }
            EntityRef::Relationship { source, target, .. } => (
                source.position().add(target.position()).scale(0.5),
                format!("{} -> {}", source.label(), target.label()),
            ),
            EntityRef::Interface { entity, owner } => {
                let offset = entity.surface().to_cartesian(owner.radius());
                let methods = entity
                    .methods()
                    .iter()
                    .map(|method| method.signature())
                    .collect::<Vec<_>>();
                let detail = if methods.is_empty() {
                    format!("on {}", owner.label())
                } else {
                    format!("on {} [{}]", owner.label(), methods.join("; "))
                };
                (owner.position().add(offset), detail)
            }
        };

        Self {
            kind: key.kind(),
            id: key.id(),
            label: entity.label().to_string(),
            position,
            detail,
            selected: entity.is_selected(),
            hovered: entity.is_hovered(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

impl fmt::Display for SceneLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {} \"{}\" ({:.1}, {:.1}, {:.1}) {}",
            self.kind.to_string(),
            self.id,
            self.label,
            self.position.x(),
            self.position.y(),
            self.position.z(),
            self.detail
        )?;
        if self.selected {
            f.write_str(" [selected]")?;
        }
        if self.hovered {
            f.write_str(" [hovered]")?;
        }
        Ok(())
    }
}

/// Renders entities to [`SceneLine`]s and counts the calls it receives.
#[derive(Debug, Default)]
pub struct TextRenderer {
    created: usize,
    disposed: usize,
    refreshed: usize,
}

impl TextRenderer {
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn disposed(&self) -> usize {
        self.disposed
    }

    pub fn refreshed(&self) -> usize {
        self.refreshed
    }
}

impl Renderer for TextRenderer {
    type Handle = SceneLine;

    fn create_visual_handle(&mut self, entity: EntityRef<'_>) -> SceneLine {
        self.created += 1;
        SceneLine::from_entity(entity)
    }

    fn dispose_visual_handle(&mut self, _handle: SceneLine) {
        self.disposed += 1;
    }

    fn refresh_visual_handle(&mut self, handle: &mut SceneLine, entity: EntityRef<'_>) {
        self.refreshed += 1;
        *handle = SceneLine::from_entity(entity);
    }
}

/// The printable state of a session: scope, breadcrumbs, visible handles
/// and anything that was skipped.
pub struct Listing<'a, S: Store>(pub &'a Session<S, TextRenderer>);

impl<S: Store> fmt::Display for Listing<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        writeln!(f, "scope: {}", session.scope())?;

        let path = session.path();
        if path.is_empty() {
            writeln!(f, "path: /")?;
        } else {
            let crumbs: Vec<String> = path.iter().map(Id::as_string).collect();
            writeln!(f, "path: {}", crumbs.join(" > "))?;
        }

        writeln!(f, "handles: {}", session.handles().count())?;
        for handle in session.handles() {
            writeln!(f, "  {}", handle.resource())?;
        }
        for reference in session.unresolved() {
            writeln!(f, "skipped: {reference}")?;
        }
        for issue in session.issues() {
            writeln!(f, "issue: {issue}")?;
        }
        Ok(())
    }
}
