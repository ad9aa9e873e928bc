//! Named derivation scenarios for regression checks.
//!
//! Each scenario fixes seed parameters and pins two hashes produced by the
//! reference compiler: the protocol NFT policy id, which reads the seed
//! directly, and the shared treasury validator, which sits at the bottom of
//! the graph and so covers parameter threading.

use teiki_protocol_core::{OutRef, ReferenceCompiler, ScriptHash, TxHash};
use teiki_protocol_registry::{DependencyResolver, ResolverConfig, RegistryScriptHashes};

/// A named derivation scenario.
#[derive(Debug, Clone)]
pub struct DerivationVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Transaction hash bytes of the seed (repeated).
    pub seed_tx_byte: u8,
    pub seed_index: u32,
    /// Base token policy bytes (repeated).
    pub base_policy_byte: u8,
    /// Expected protocol NFT policy id (hex).
    pub expected_protocol_nft: &'static str,
    /// Expected shared treasury validator hash (hex).
    pub expected_shared_treasury: &'static str,
}

impl DerivationVector {
    pub fn seed(&self) -> OutRef {
        OutRef::new(TxHash::from_bytes([self.seed_tx_byte; 32]), self.seed_index)
    }

    pub fn base_policy(&self) -> ScriptHash {
        ScriptHash::from_bytes([self.base_policy_byte; 28])
    }

    /// Derive this vector's hashes with the reference compiler.
    pub fn derive(&self) -> RegistryScriptHashes {
        DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig::default())
            .derive(self.seed(), self.base_policy())
            .expect("reference compiler covers every template")
    }
}

/// Get all derivation vectors.
pub fn all_vectors() -> Vec<DerivationVector> {
    vec![
        DerivationVector {
            name: "first output of a seed transaction",
            seed_tx_byte: 0x11,
            seed_index: 0,
            base_policy_byte: 0x7a,
            expected_protocol_nft: "e9e47e4b7698f0f25694950c669ea074fb6a16e410defe7b0e7232c6",
            expected_shared_treasury: "85c3e77c82f14919e92a58bf3e749db624d61d7732026b0d79cf6936",
        },
        DerivationVector {
            name: "second output of the same transaction",
            seed_tx_byte: 0x11,
            seed_index: 1,
            base_policy_byte: 0x7a,
            expected_protocol_nft: "0ea6a9477c5e2b96bab8381ce5e61e3e36e515facfd994b518cea346",
            expected_shared_treasury: "61ab5c8ea5f31e2fb155751b8fe294f2550e7af766161f0f878ada31",
        },
        DerivationVector {
            name: "same seed, different base policy",
            seed_tx_byte: 0x11,
            seed_index: 0,
            base_policy_byte: 0x7b,
            expected_protocol_nft: "e9e47e4b7698f0f25694950c669ea074fb6a16e410defe7b0e7232c6",
            expected_shared_treasury: "a8a38eae7e5ddf217fb1ff7ebff75b695f967fec5fa89a7ec9a61aac",
        },
        DerivationVector {
            name: "zero transaction hash",
            seed_tx_byte: 0x00,
            seed_index: 0,
            base_policy_byte: 0x00,
            expected_protocol_nft: "1be2142e457d1e8e0315b11b3152bd5ecaebe14ecfe1a00b46f9eba8",
            expected_shared_treasury: "8abab4dc5c0565898c44097ec738a0b9e0aa7eb709a5772c72444f8c",
        },
    ]
}

/// Derive every vector: `(name, matches, "<protocol nft hex>/<shared treasury hex>")`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hashes = v.derive();
            let nft = hashes.protocol_nft_hash.to_hex();
            let treasury = hashes.shared_treasury_validator_hash.to_hex();
            let matches = nft == v.expected_protocol_nft && treasury == v.expected_shared_treasury;
            (v.name.to_string(), matches, format!("{nft}/{treasury}"))
        })
        .collect()
}
