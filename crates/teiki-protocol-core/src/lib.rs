//! # Teiki Protocol Core
//!
//! Pure primitives for deriving protocol script identities: identifiers,
//! script templates, the compiler seam and the content-hash primitive.
//!
//! This crate contains no I/O. Everything here is a deterministic function
//! of its inputs.
//!
//! ## Key Types
//!
//! - [`ScriptHash`] - 28-byte content identifier of a compiled script
//! - [`OutRef`] - Transaction output reference, the seed of a protocol instance
//! - [`ScriptTemplateId`] - Which on-chain program to compile
//! - [`ScriptCompiler`] - Template + parameters to [`ScriptArtifact`]
//!
//! ## Canonicalization
//!
//! The [`ReferenceCompiler`] encodes artifacts with deterministic CBOR. See
//! the [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod script;
pub mod types;

pub use canonical::canonical_artifact_bytes;
pub use crypto::{hash_artifact, hash_script_bytes};
pub use error::{CompilationError, CompileFailure, CoreError};
pub use script::{
    check_param_shape, ParamKind, ReferenceCompiler, ScriptArtifact, ScriptCompiler, ScriptParam,
    ScriptTemplateId,
};
pub use types::{OutRef, PolicyId, ScriptHash, SeedReference, TokenName, TxHash};
