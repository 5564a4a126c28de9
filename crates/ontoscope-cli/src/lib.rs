//! CLI logic for the Ontoscope scene inspector.
//!
//! Loads a store snapshot, extracts the entity graph, replays the scripted
//! navigation and selection commands and writes the resulting scene as
//! text.

pub mod error_adapter;
pub mod render;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use ontoscope::{
    OntoscopeError, Session, StoreError,
    entity::EntityKey,
    extract::Extractor,
    identifier::Id,
    store::{MemoryStore, StoreSnapshot},
};

use render::{Listing, TextRenderer};

/// Run the Ontoscope CLI application
///
/// # Errors
///
/// Returns `OntoscopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Snapshots that cannot be decoded
/// - Commands naming classes or entities that are not there
pub fn run(args: &Args) -> Result<(), OntoscopeError> {
    info!(input_path = args.input.as_str(); "Inspecting store snapshot");

    let app_config = config::load_config(args.config.as_ref())?;
    let selections = args
        .select
        .iter()
        .map(|raw| parse_key(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let hover = args.hover.as_deref().map(parse_key).transpose()?;

    let source = fs::read_to_string(&args.input)?;
    let snapshot: StoreSnapshot =
        toml::from_str(&source).map_err(|e| StoreError::Snapshot(e.to_string()))?;
    let store = MemoryStore::from_snapshot(snapshot)?;

    let mut session = Session::new(store, TextRenderer::default(), app_config);
    if let Some(seed) = args.seed {
        session = session.with_extractor(Extractor::with_seed(seed));
    }

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    runtime.block_on(session.load());

    for id in &args.enter {
        if !session.enter_class(id) {
            return Err(OntoscopeError::Command(format!(
                "cannot enter `{id}`: not a class visible {}",
                session.scope()
            )));
        }
    }
    for _ in 0..args.exit {
        if !session.exit_class() {
            warn!(requested = args.exit; "More exits than entered scopes");
            break;
        }
    }

    for key in selections {
        if !session.graph().contains(key) {
            return Err(OntoscopeError::Command(format!(
                "cannot select `{key}`: no such entity"
            )));
        }
        session.select(key.kind(), key.id());
    }
    if hover.is_some() {
        session.hover(hover);
    }

    let listing = Listing(&session).to_string();
    match &args.output {
        Some(path) => {
            fs::write(path, listing)?;
            info!(output_file = path.as_str(); "Scene written");
        }
        None => print!("{listing}"),
    }

    Ok(())
}

/// Parses `KIND:ID`, e.g. `class:http://example.org/Person`.
fn parse_key(raw: &str) -> Result<EntityKey, OntoscopeError> {
    let (kind, id) = raw.split_once(':').ok_or_else(|| {
        OntoscopeError::Command(format!("`{raw}` is not of the form KIND:ID"))
    })?;
    let kind = kind.parse().map_err(OntoscopeError::Command)?;
    let id = Id::canonical(id);
    if id.is_empty() {
        return Err(OntoscopeError::Command(format!("`{raw}` has an empty identifier")));
    }
    Ok(EntityKey::new(kind, id))
}

#[cfg(test)]
mod tests {
    use ontoscope::entity::EntityKind;

    use super::*;

    #[test]
    fn test_parse_key() {
        let key = parse_key("class:http://example.org/Person/").expect("valid key");
        assert_eq!(key.kind(), EntityKind::Class);
        assert_eq!(key.id(), "http://example.org/Person");

        let key = parse_key("Interface:ex:Start").expect("valid key");
        assert_eq!(key.kind(), EntityKind::Interface);
        assert_eq!(key.id(), "ex:Start");
    }

    #[test]
    fn test_parse_key_errors() {
        assert!(matches!(parse_key("Person"), Err(OntoscopeError::Command(_))));
        assert!(matches!(parse_key("shape:ex:A"), Err(OntoscopeError::Command(_))));
        assert!(matches!(parse_key("class: "), Err(OntoscopeError::Command(_))));
    }
}
