//! Error types for registry derivation.

use teiki_protocol_core::{CompilationError, ScriptTemplateId};
use thiserror::Error;

/// Errors that abort a derivation. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    /// A template failed to compile.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// The dependency graph has a cycle among these nodes.
    #[error("dependency cycle among {0:?}")]
    Cycle(Vec<ScriptTemplateId>),

    /// A node names a dependency that is not part of the graph.
    #[error("{node} depends on {dependency}, which is not in the graph")]
    UnknownDependency {
        node: ScriptTemplateId,
        dependency: ScriptTemplateId,
    },

    /// A node was read before it was derived.
    #[error("{0} was read before it was derived")]
    Unresolved(ScriptTemplateId),

    /// A node was derived twice.
    #[error("{0} was derived twice")]
    Rederived(ScriptTemplateId),
}

/// Result type for derivation.
pub type Result<T> = std::result::Result<T, DeriveError>;
