//! Error types for protocol instantiation.

use teiki_protocol_core::CoreError;
use teiki_protocol_params::ConfigError;
use teiki_protocol_registry::DeriveError;
use thiserror::Error;

/// Errors that can occur while instantiating a protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Script derivation failed.
    #[error("derivation error: {0}")]
    Derive(#[from] DeriveError),

    /// A configuration table failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed identifier text.
    #[error("invalid identifier: {0}")]
    Core(#[from] CoreError),
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
