//! Protocol instances: configuration plus a derived registry.
//!
//! [`ProtocolConfig`] bundles everything an instance is configured with
//! besides its seed. [`ProtocolInstance::instantiate`] validates it, derives
//! the registry, and returns both as one [`ProtocolDeployment`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use teiki_protocol_core::{OutRef, PolicyId, ScriptCompiler, TokenName};
use teiki_protocol_params::{ConfigError, ProtocolNonScriptParams, TransactionConstants};
use teiki_protocol_registry::{
    build_registry, DependencyResolver, Registry, RegistryScriptHashes, ResolverConfig,
};

use crate::error::Result;

/// Configuration for a protocol instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProtocolConfig {
    /// Resolver configuration.
    pub resolver: ResolverConfig,
    /// Non-script protocol parameters.
    pub non_script_params: ProtocolNonScriptParams,
    /// Transaction-building constants.
    pub transaction_constants: TransactionConstants,
}

impl ProtocolConfig {
    /// Check both tables.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.non_script_params.validate()?;
        self.transaction_constants.validate()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(content: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading protocol config");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Identifies one protocol instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolInstance {
    /// Output reference consumed when the protocol NFT is minted.
    pub seed: OutRef,
    /// Policy id of the base token.
    pub base_token_policy: PolicyId,
    /// Policy of the token that authorizes script migrations.
    pub migration_token_policy: PolicyId,
    pub migration_token_name: TokenName,
}

/// Everything produced by instantiating a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDeployment {
    pub registry: Registry,
    pub hashes: RegistryScriptHashes,
    pub params: ProtocolNonScriptParams,
    pub constants: TransactionConstants,
}

impl ProtocolInstance {
    pub fn new(
        seed: OutRef,
        base_token_policy: PolicyId,
        migration_token_policy: PolicyId,
        migration_token_name: TokenName,
    ) -> Self {
        Self {
            seed,
            base_token_policy,
            migration_token_policy,
            migration_token_name,
        }
    }

    /// Parse an instance from its text forms: `<tx hash hex>#<index>` for the
    /// seed, hex for both policy ids.
    pub fn from_text(
        seed: &str,
        base_token_policy: &str,
        migration_token_policy: &str,
        migration_token_name: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            seed.parse()?,
            base_token_policy.parse()?,
            migration_token_policy.parse()?,
            migration_token_name.parse()?,
        ))
    }

    /// Validate `config`, derive every script hash and build the registry.
    ///
    /// Configuration is checked before anything is compiled, so an invalid
    /// table never costs a derivation.
    pub fn instantiate<C: ScriptCompiler>(
        &self,
        compiler: C,
        config: ProtocolConfig,
    ) -> Result<ProtocolDeployment> {
        config.validate()?;

        let hashes = DependencyResolver::new(compiler, config.resolver)
            .derive(self.seed, self.base_token_policy)?;
        let registry = build_registry(
            &hashes,
            self.migration_token_policy,
            &self.migration_token_name,
        );

        tracing::info!(
            seed = %self.seed,
            protocol_nft = %hashes.protocol_nft_hash,
            "instantiated protocol"
        );

        Ok(ProtocolDeployment {
            registry,
            hashes,
            params: config.non_script_params,
            constants: config.transaction_constants,
        })
    }
}
