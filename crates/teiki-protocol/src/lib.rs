//! # Teiki Protocol
//!
//! The unified API for deriving a Teiki protocol instance: its script
//! registry and the parameter tables it is deployed with.
//!
//! ## Overview
//!
//! A protocol instance is fixed by a seed output reference and a base token
//! policy. From those the protocol scripts are compiled and hashed in
//! dependency order:
//!
//! - **Scripts**: parameterized templates compiled to artifacts and hashed
//! - **Registry**: every script hash, wrapped with its migration token
//! - **Parameters**: validated non-script tables for transaction building
//!
//! ## Key Concepts
//!
//! - **Seed**: spendable once, so every hash downstream of it is unique.
//! - **Migratable script**: a hash plus the token that authorizes replacing it.
//! - **Deployment**: the registry together with the validated parameters.
//!
//! ## Usage
//!
//! ```rust
//! use teiki_protocol::{ProtocolConfig, ProtocolInstance};
//! use teiki_protocol::core::{OutRef, ReferenceCompiler, ScriptHash, TokenName, TxHash};
//!
//! let instance = ProtocolInstance::new(
//!     OutRef::new(TxHash::from_bytes([0x11; 32]), 0),
//!     ScriptHash::from_bytes([0x7a; 28]),
//!     ScriptHash::from_bytes([0x3e; 28]),
//!     TokenName::new("MIGRATE").unwrap(),
//! );
//!
//! let deployment = instance
//!     .instantiate(ReferenceCompiler::new(), ProtocolConfig::default())
//!     .unwrap();
//! assert_eq!(deployment.registry.entries().len(), 11);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `teiki_protocol::core` - Identifiers, templates, compilation and hashing
//! - `teiki_protocol::params` - Parameter tables and transaction constants
//! - `teiki_protocol::registry` - Dependency resolution and registry assembly

pub mod error;
pub mod instance;

// Re-export component crates
pub use teiki_protocol_core as core;
pub use teiki_protocol_params as params;
pub use teiki_protocol_registry as registry;

// Re-export main types for convenience
pub use error::{ProtocolError, Result};
pub use instance::{ProtocolConfig, ProtocolDeployment, ProtocolInstance};

// Re-export commonly used types
pub use teiki_protocol_core::{
    OutRef, PolicyId, ReferenceCompiler, ScriptCompiler, ScriptHash, ScriptTemplateId, TokenName,
};
pub use teiki_protocol_params::{ProtocolNonScriptParams, TransactionConstants};
pub use teiki_protocol_registry::{
    get_migratable_script, get_protocol_registry, get_protocol_registry_script, Registry,
    RegistryScriptHashes, ResolverConfig,
};
