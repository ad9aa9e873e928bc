//! # Teiki Protocol Registry
//!
//! Derives the script hashes of a protocol instance and assembles its
//! registry.
//!
//! ## Overview
//!
//! Several protocol scripts are compiled with the hashes of other scripts, so
//! hashes must be derived in dependency order:
//!
//! 1. [`DependencyResolver`] walks the [`DependencyGraph`], compiling and hashing
//!    each script once its inputs are final, producing [`RegistryScriptHashes`]
//! 2. [`get_migratable_script`] wraps a hash with its migration token
//! 3. [`build_registry`] assembles the [`Registry`]
//!
//! The protocol NFT policy is the only script compiled with the seed output
//! reference. Since that output can be spent once, every hash downstream of
//! it is unique to the instance.
//!
//! ## Usage
//!
//! ```rust
//! use teiki_protocol_core::{OutRef, ReferenceCompiler, ScriptHash, TokenName, TxHash};
//! use teiki_protocol_registry::get_protocol_registry;
//!
//! let seed = OutRef::new(TxHash::from_bytes([0x01; 32]), 0);
//! let base_policy = ScriptHash::from_bytes([0x02; 28]);
//! let migration_policy = ScriptHash::from_bytes([0x03; 28]);
//! let migration_name = TokenName::new("MIGRATE").unwrap();
//!
//! let registry = get_protocol_registry(
//!     ReferenceCompiler::new(),
//!     seed,
//!     base_policy,
//!     migration_policy,
//!     &migration_name,
//! )
//! .unwrap();
//! assert_eq!(registry.entries().len(), 11);
//! ```

pub mod error;
pub mod graph;
pub mod hashes;
pub mod migratable;
pub mod registry;
pub mod resolver;

pub use error::{DeriveError, Result};
pub use graph::{DependencyGraph, NodeInput};
pub use hashes::{DerivedHashes, RegistryScriptHashes};
pub use migratable::{
    get_migratable_script, MigratableScript, MigrationToken, RegisteredScript, ScriptRef,
};
pub use registry::{build_registry, Registry, RegistryEntry};
pub use resolver::{DependencyResolver, ResolverConfig, SeedParams};

use teiki_protocol_core::{OutRef, PolicyId, ScriptCompiler, TokenName};

/// Derive the raw hash bundle of a protocol instance.
pub fn get_protocol_registry_script<C: ScriptCompiler>(
    compiler: C,
    seed: OutRef,
    base_token_policy: PolicyId,
) -> Result<RegistryScriptHashes> {
    DependencyResolver::new(compiler, ResolverConfig::default()).derive(seed, base_token_policy)
}

/// Derive the hashes of a protocol instance and assemble its registry.
pub fn get_protocol_registry<C: ScriptCompiler>(
    compiler: C,
    seed: OutRef,
    base_token_policy: PolicyId,
    migration_token_policy: PolicyId,
    migration_token_name: &TokenName,
) -> Result<Registry> {
    let hashes = get_protocol_registry_script(compiler, seed, base_token_policy)?;
    let registry = build_registry(&hashes, migration_token_policy, migration_token_name);
    tracing::info!(
        %seed,
        protocol_nft = %hashes.protocol_nft_hash,
        "built protocol registry"
    );
    Ok(registry)
}
