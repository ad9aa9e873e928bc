//! Migratable scripts: a script hash plus the tokens that authorize upgrading it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use teiki_protocol_core::{PolicyId, ScriptHash, TokenName};

/// The token whose presence authorizes migrating a script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationToken {
    pub minting_policy_hash: PolicyId,
    pub token_name: TokenName,
}

impl MigrationToken {
    pub fn new(minting_policy_hash: PolicyId, token_name: TokenName) -> Self {
        Self {
            minting_policy_hash,
            token_name,
        }
    }
}

/// A reference to a script by hash, serialized as `{ "hash": ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptRef {
    pub hash: ScriptHash,
}

/// A script registered without a migration path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisteredScript {
    script: ScriptRef,
}

impl RegisteredScript {
    pub fn new(hash: ScriptHash) -> Self {
        Self {
            script: ScriptRef { hash },
        }
    }

    pub fn hash(&self) -> ScriptHash {
        self.script.hash
    }
}

/// A script hash with its migration authorizations.
///
/// `migrations` maps a script hash to the token that authorizes migrating
/// away from it. Scripts built here carry one entry keyed by their own hash;
/// the map shape leaves room for several authorized tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigratableScript {
    script: ScriptRef,
    migrations: BTreeMap<ScriptHash, MigrationToken>,
}

impl MigratableScript {
    pub fn new(hash: ScriptHash, migrations: BTreeMap<ScriptHash, MigrationToken>) -> Self {
        Self {
            script: ScriptRef { hash },
            migrations,
        }
    }

    pub fn hash(&self) -> ScriptHash {
        self.script.hash
    }

    pub fn migrations(&self) -> &BTreeMap<ScriptHash, MigrationToken> {
        &self.migrations
    }

    /// The token that authorizes migrating `hash`, if any.
    pub fn migration_for(&self, hash: &ScriptHash) -> Option<&MigrationToken> {
        self.migrations.get(hash)
    }

    /// The token that authorizes migrating this script itself.
    pub fn own_migration(&self) -> Option<&MigrationToken> {
        self.migration_for(&self.script.hash)
    }
}

/// Wrap `hash` with a single migration entry keyed by `hash` itself.
pub fn get_migratable_script(
    hash: ScriptHash,
    migration_token_policy: PolicyId,
    migration_token_name: &TokenName,
) -> MigratableScript {
    let token = MigrationToken::new(migration_token_policy, migration_token_name.clone());
    MigratableScript::new(hash, BTreeMap::from([(hash, token)]))
}
