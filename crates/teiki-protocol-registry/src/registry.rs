//! The protocol registry: every registered script of a protocol instance.

use serde::{Deserialize, Serialize};

use teiki_protocol_core::{PolicyId, ScriptHash, ScriptTemplateId, TokenName};

use crate::hashes::RegistryScriptHashes;
use crate::migratable::{get_migratable_script, MigratableScript, RegisteredScript};

/// The registry record of a protocol instance.
///
/// Built once by [`build_registry`] and never mutated: fields are private
/// and only readable. The protocol stake validator has no migration path;
/// every other script is migratable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Registry {
    protocol_staking_validator: RegisteredScript,
    project_auth_token_minting_policy: MigratableScript,
    project_validator: MigratableScript,
    project_detail_validator: MigratableScript,
    project_script_validator: MigratableScript,
    backing_validator: MigratableScript,
    proof_of_backing_minting_policy: MigratableScript,
    teiki_minting_policy: MigratableScript,
    dedicated_treasury_validator: MigratableScript,
    shared_treasury_validator: MigratableScript,
    open_treasury_validator: MigratableScript,
}

/// One field of the registry, for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry<'a> {
    /// The field's serialized name.
    pub field: &'static str,
    pub template: ScriptTemplateId,
    pub hash: ScriptHash,
    /// `None` for the stake validator.
    pub migratable: Option<&'a MigratableScript>,
}

/// Assemble a registry from derived hashes.
///
/// The stake validator is stored bare; every other hash is wrapped with the
/// same migration token.
pub fn build_registry(
    hashes: &RegistryScriptHashes,
    migration_token_policy: PolicyId,
    migration_token_name: &TokenName,
) -> Registry {
    let wrap = |hash| get_migratable_script(hash, migration_token_policy, migration_token_name);

    Registry {
        protocol_staking_validator: RegisteredScript::new(hashes.protocol_stake_validator_hash),
        project_auth_token_minting_policy: wrap(hashes.projects_auth_token_hash),
        project_validator: wrap(hashes.project_validator_hash),
        project_detail_validator: wrap(hashes.project_detail_validator_hash),
        project_script_validator: wrap(hashes.project_script_validator_hash),
        backing_validator: wrap(hashes.backing_validator_hash),
        proof_of_backing_minting_policy: wrap(hashes.proof_of_backing_hash),
        teiki_minting_policy: wrap(hashes.teiki_token_hash),
        dedicated_treasury_validator: wrap(hashes.dedicated_treasury_validator_hash),
        shared_treasury_validator: wrap(hashes.shared_treasury_validator_hash),
        open_treasury_validator: wrap(hashes.open_treasury_validator_hash),
    }
}

impl Registry {
    pub fn protocol_staking_validator(&self) -> &RegisteredScript {
        &self.protocol_staking_validator
    }

    pub fn project_auth_token_minting_policy(&self) -> &MigratableScript {
        &self.project_auth_token_minting_policy
    }

    pub fn project_validator(&self) -> &MigratableScript {
        &self.project_validator
    }

    pub fn project_detail_validator(&self) -> &MigratableScript {
        &self.project_detail_validator
    }

    pub fn project_script_validator(&self) -> &MigratableScript {
        &self.project_script_validator
    }

    pub fn backing_validator(&self) -> &MigratableScript {
        &self.backing_validator
    }

    pub fn proof_of_backing_minting_policy(&self) -> &MigratableScript {
        &self.proof_of_backing_minting_policy
    }

    pub fn teiki_minting_policy(&self) -> &MigratableScript {
        &self.teiki_minting_policy
    }

    pub fn dedicated_treasury_validator(&self) -> &MigratableScript {
        &self.dedicated_treasury_validator
    }

    pub fn shared_treasury_validator(&self) -> &MigratableScript {
        &self.shared_treasury_validator
    }

    pub fn open_treasury_validator(&self) -> &MigratableScript {
        &self.open_treasury_validator
    }

    /// The migratable fields with their templates, in serialization order.
    pub fn migratable_scripts(&self) -> [(&'static str, ScriptTemplateId, &MigratableScript); 10] {
        use ScriptTemplateId as T;
        [
            (
                "projectAuthTokenMintingPolicy",
                T::ProjectsAuthToken,
                &self.project_auth_token_minting_policy,
            ),
            ("projectValidator", T::Project, &self.project_validator),
            (
                "projectDetailValidator",
                T::ProjectDetail,
                &self.project_detail_validator,
            ),
            (
                "projectScriptValidator",
                T::ProjectScript,
                &self.project_script_validator,
            ),
            ("backingValidator", T::Backing, &self.backing_validator),
            (
                "proofOfBackingMintingPolicy",
                T::ProofOfBacking,
                &self.proof_of_backing_minting_policy,
            ),
            ("teikiMintingPolicy", T::TeikiToken, &self.teiki_minting_policy),
            (
                "dedicatedTreasuryValidator",
                T::DedicatedTreasury,
                &self.dedicated_treasury_validator,
            ),
            (
                "sharedTreasuryValidator",
                T::SharedTreasury,
                &self.shared_treasury_validator,
            ),
            (
                "openTreasuryValidator",
                T::OpenTreasury,
                &self.open_treasury_validator,
            ),
        ]
    }

    /// Every field of the registry, in serialization order.
    pub fn entries(&self) -> Vec<RegistryEntry<'_>> {
        let mut entries = Vec::with_capacity(11);
        entries.push(RegistryEntry {
            field: "protocolStakingValidator",
            template: ScriptTemplateId::ProtocolStake,
            hash: self.protocol_staking_validator.hash(),
            migratable: None,
        });
        entries.extend(
            self.migratable_scripts()
                .into_iter()
                .map(|(field, template, script)| RegistryEntry {
                    field,
                    template,
                    hash: script.hash(),
                    migratable: Some(script),
                }),
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migratable::MigrationToken;

    fn bundle() -> RegistryScriptHashes {
        let h = |b: u8| ScriptHash::from_bytes([b; 28]);
        RegistryScriptHashes {
            protocol_nft_hash: h(1),
            projects_auth_token_hash: h(2),
            teiki_token_hash: h(3),
            proof_of_backing_hash: h(4),
            protocol_stake_validator_hash: h(5),
            project_validator_hash: h(6),
            project_detail_validator_hash: h(7),
            project_script_validator_hash: h(8),
            backing_validator_hash: h(9),
            dedicated_treasury_validator_hash: h(10),
            shared_treasury_validator_hash: h(11),
            open_treasury_validator_hash: h(12),
        }
    }

    fn token() -> (PolicyId, TokenName) {
        (ScriptHash::from_bytes([0xee; 28]), TokenName::new("MIGRATE").unwrap())
    }

    #[test]
    fn test_every_field_maps_its_template_hash() {
        let (policy, name) = token();
        let hashes = bundle();
        let registry = build_registry(&hashes, policy, &name);

        let entries = registry.entries();
        assert_eq!(entries.len(), 11);
        for entry in &entries {
            assert_eq!(entry.hash, hashes.get(entry.template), "{}", entry.field);
        }

        // Every script except the protocol NFT is registered exactly once
        let mut templates: Vec<_> = entries.iter().map(|e| e.template).collect();
        templates.sort();
        let expected: Vec<_> = ScriptTemplateId::ALL
            .into_iter()
            .filter(|t| *t != ScriptTemplateId::ProtocolNft)
            .collect();
        assert_eq!(templates, expected);
    }

    #[test]
    fn test_only_stake_validator_is_bare() {
        let (policy, name) = token();
        let registry = build_registry(&bundle(), policy, &name);
        let expected = MigrationToken::new(policy, name);

        for entry in registry.entries() {
            match entry.migratable {
                None => assert_eq!(entry.template, ScriptTemplateId::ProtocolStake),
                Some(script) => {
                    assert_eq!(script.migrations().len(), 1);
                    assert_eq!(script.own_migration(), Some(&expected));
                }
            }
        }
    }

    #[test]
    fn test_entry_field_names_match_serialization() {
        let (policy, name) = token();
        let registry = build_registry(&bundle(), policy, &name);
        let json = serde_json::to_value(&registry).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 11);
        for entry in registry.entries() {
            assert_eq!(
                object[entry.field]["script"]["hash"],
                entry.hash.to_hex().as_str()
            );
        }
    }

    #[test]
    fn test_json_roundtrip_requires_every_field() {
        let (policy, name) = token();
        let registry = build_registry(&bundle(), policy, &name);
        let mut json = serde_json::to_value(&registry).unwrap();

        let back: Registry = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, registry);

        json.as_object_mut().unwrap().remove("backingValidator");
        assert!(serde_json::from_value::<Registry>(json).is_err());
    }
}
