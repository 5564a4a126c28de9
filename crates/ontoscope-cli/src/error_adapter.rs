//! Error adapter for converting OntoscopeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use ontoscope::{OntoscopeError, StoreError};

/// Adapter rendering an [`OntoscopeError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a OntoscopeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            OntoscopeError::Io(_) => "ontoscope::io",
            OntoscopeError::Store(_) => "ontoscope::store",
            OntoscopeError::Config(_) => "ontoscope::config",
            OntoscopeError::Command(_) => "ontoscope::command",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            OntoscopeError::Io(_) => return None,
            OntoscopeError::Store(StoreError::Snapshot(_)) => {
                "the snapshot must be TOML with [[classes]], [[relationships]] and [[interfaces]] tables"
            }
            OntoscopeError::Store(StoreError::Query { .. }) => "the store could not answer a query",
            OntoscopeError::Config(_) => {
                "check --config, ./ontoscope/config.toml or the platform config directory"
            }
            OntoscopeError::Command(_) => {
                "run without --enter/--select to list the classes visible at the top level"
            }
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
