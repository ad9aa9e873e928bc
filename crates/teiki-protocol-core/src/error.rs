//! Error types for the protocol core.

use thiserror::Error;

use crate::script::{ParamKind, ScriptTemplateId};

/// Errors for malformed identifiers and encoding failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("malformed output reference: {0}")]
    MalformedOutRef(String),

    #[error("token name must not be empty")]
    EmptyTokenName,

    #[error("token name is {len} bytes, maximum is {max}")]
    TokenNameTooLong { len: usize, max: usize },

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// A script template could not be compiled with the given parameters.
///
/// Always fatal for a derivation: no partial set of hashes is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to compile {template}: {reason}")]
pub struct CompilationError {
    /// The template that failed.
    pub template: ScriptTemplateId,
    /// What went wrong.
    pub reason: CompileFailure,
}

impl CompilationError {
    pub fn new(template: ScriptTemplateId, reason: CompileFailure) -> Self {
        Self { template, reason }
    }
}

/// Cause of a [`CompilationError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileFailure {
    #[error("expected {expected} parameters, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("parameter {index} must be {expected}, got {got}")]
    ParamKind {
        index: usize,
        expected: ParamKind,
        got: ParamKind,
    },

    #[error("no code registered for template")]
    MissingCode,

    #[error("encoding error: {0}")]
    Encoding(String),
}
