//! Derived script hashes of one protocol instance.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use teiki_protocol_core::{PolicyId, ScriptHash, ScriptTemplateId};

use crate::error::{DeriveError, Result};

/// Write-once map from node to derived hash, filled during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedHashes {
    hashes: BTreeMap<ScriptTemplateId, ScriptHash>,
}

impl DerivedHashes {
    /// Record a node's hash. A node is never derived twice.
    pub fn insert(&mut self, node: ScriptTemplateId, hash: ScriptHash) -> Result<()> {
        match self.hashes.entry(node) {
            Entry::Occupied(_) => Err(DeriveError::Rederived(node)),
            Entry::Vacant(slot) => {
                slot.insert(hash);
                Ok(())
            }
        }
    }

    pub fn get(&self, node: ScriptTemplateId) -> Option<ScriptHash> {
        self.hashes.get(&node).copied()
    }

    /// The hash of `node`, which must already be derived.
    pub fn require(&self, node: ScriptTemplateId) -> Result<ScriptHash> {
        self.get(node).ok_or(DeriveError::Unresolved(node))
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScriptTemplateId, ScriptHash)> + '_ {
        self.hashes.iter().map(|(node, hash)| (*node, *hash))
    }
}

/// The raw hash bundle of a protocol instance: one hash per script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryScriptHashes {
    pub protocol_nft_hash: PolicyId,
    pub projects_auth_token_hash: PolicyId,
    pub teiki_token_hash: PolicyId,
    pub proof_of_backing_hash: PolicyId,
    pub protocol_stake_validator_hash: ScriptHash,
    pub project_validator_hash: ScriptHash,
    pub project_detail_validator_hash: ScriptHash,
    pub project_script_validator_hash: ScriptHash,
    pub backing_validator_hash: ScriptHash,
    pub dedicated_treasury_validator_hash: ScriptHash,
    pub shared_treasury_validator_hash: ScriptHash,
    pub open_treasury_validator_hash: ScriptHash,
}

impl RegistryScriptHashes {
    /// Collect the bundle from a completed resolution.
    pub fn from_derived(derived: &DerivedHashes) -> Result<Self> {
        use ScriptTemplateId as T;
        Ok(Self {
            protocol_nft_hash: derived.require(T::ProtocolNft)?,
            projects_auth_token_hash: derived.require(T::ProjectsAuthToken)?,
            teiki_token_hash: derived.require(T::TeikiToken)?,
            proof_of_backing_hash: derived.require(T::ProofOfBacking)?,
            protocol_stake_validator_hash: derived.require(T::ProtocolStake)?,
            project_validator_hash: derived.require(T::Project)?,
            project_detail_validator_hash: derived.require(T::ProjectDetail)?,
            project_script_validator_hash: derived.require(T::ProjectScript)?,
            backing_validator_hash: derived.require(T::Backing)?,
            dedicated_treasury_validator_hash: derived.require(T::DedicatedTreasury)?,
            shared_treasury_validator_hash: derived.require(T::SharedTreasury)?,
            open_treasury_validator_hash: derived.require(T::OpenTreasury)?,
        })
    }

    /// The hash derived for `template`.
    pub fn get(&self, template: ScriptTemplateId) -> ScriptHash {
        use ScriptTemplateId as T;
        match template {
            T::ProtocolNft => self.protocol_nft_hash,
            T::ProjectsAuthToken => self.projects_auth_token_hash,
            T::TeikiToken => self.teiki_token_hash,
            T::ProofOfBacking => self.proof_of_backing_hash,
            T::ProtocolStake => self.protocol_stake_validator_hash,
            T::Project => self.project_validator_hash,
            T::ProjectDetail => self.project_detail_validator_hash,
            T::ProjectScript => self.project_script_validator_hash,
            T::Backing => self.backing_validator_hash,
            T::DedicatedTreasury => self.dedicated_treasury_validator_hash,
            T::SharedTreasury => self.shared_treasury_validator_hash,
            T::OpenTreasury => self.open_treasury_validator_hash,
        }
    }

    /// Every (template, hash) pair, in tag order.
    pub fn entries(&self) -> [(ScriptTemplateId, ScriptHash); 12] {
        ScriptTemplateId::ALL.map(|t| (t, self.get(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> ScriptHash {
        ScriptHash::from_bytes([byte; 28])
    }

    #[test]
    fn test_insert_is_write_once() {
        let mut derived = DerivedHashes::default();
        derived.insert(ScriptTemplateId::Backing, hash(1)).unwrap();
        assert_eq!(
            derived.insert(ScriptTemplateId::Backing, hash(2)),
            Err(DeriveError::Rederived(ScriptTemplateId::Backing))
        );
        assert_eq!(derived.get(ScriptTemplateId::Backing), Some(hash(1)));
    }

    #[test]
    fn test_rejected_rederive_keeps_first_hash() {
        let mut derived = DerivedHashes::default();
        derived.insert(ScriptTemplateId::ProtocolNft, hash(7)).unwrap();
        assert!(derived.insert(ScriptTemplateId::ProtocolNft, hash(8)).is_err());
        assert!(derived.insert(ScriptTemplateId::ProtocolNft, hash(9)).is_err());

        assert_eq!(derived.len(), 1);
        assert_eq!(derived.require(ScriptTemplateId::ProtocolNft), Ok(hash(7)));
    }

    #[test]
    fn test_from_derived_requires_every_node() {
        let mut derived = DerivedHashes::default();
        for (i, t) in ScriptTemplateId::ALL.into_iter().enumerate().skip(1) {
            derived.insert(t, hash(i as u8)).unwrap();
        }
        assert_eq!(
            RegistryScriptHashes::from_derived(&derived),
            Err(DeriveError::Unresolved(ScriptTemplateId::ProtocolNft))
        );

        derived.insert(ScriptTemplateId::ProtocolNft, hash(0)).unwrap();
        let bundle = RegistryScriptHashes::from_derived(&derived).unwrap();
        for (i, (t, h)) in bundle.entries().into_iter().enumerate() {
            assert_eq!(derived.get(t), Some(h));
            assert_eq!(h, hash(i as u8));
        }
    }
}
