//! Proptest generators for property-based testing.

use proptest::prelude::*;

use teiki_protocol_core::{OutRef, PolicyId, ScriptHash, TokenName, TxHash};
use teiki_protocol_registry::SeedParams;

/// Generate a random ScriptHash.
pub fn script_hash() -> impl Strategy<Value = ScriptHash> {
    any::<[u8; 28]>().prop_map(ScriptHash::from_bytes)
}

/// Generate a random policy id.
pub fn policy_id() -> impl Strategy<Value = PolicyId> {
    script_hash()
}

/// Generate a random TxHash.
pub fn tx_hash() -> impl Strategy<Value = TxHash> {
    any::<[u8; 32]>().prop_map(TxHash::from_bytes)
}

/// Generate an output reference with a realistic index.
pub fn out_ref() -> impl Strategy<Value = OutRef> {
    (tx_hash(), 0u32..256).prop_map(|(tx, index)| OutRef::new(tx, index))
}

/// Generate a valid token name.
pub fn token_name() -> impl Strategy<Value = TokenName> {
    "[A-Za-z0-9_]{1,32}".prop_map(|s| TokenName::new(s).expect("pattern yields valid names"))
}

/// Generate seed parameters.
pub fn seed_params() -> impl Strategy<Value = SeedParams> {
    (out_ref(), policy_id()).prop_map(|(seed, base_token_policy)| SeedParams {
        seed,
        base_token_policy,
    })
}

/// Seed parameters plus a migration token.
#[derive(Debug, Clone)]
pub struct InstanceParams {
    pub seed: SeedParams,
    pub migration_token_policy: PolicyId,
    pub migration_token_name: TokenName,
}

impl Arbitrary for InstanceParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (seed_params(), policy_id(), token_name())
            .prop_map(|(seed, policy, name)| InstanceParams {
                seed,
                migration_token_policy: policy,
                migration_token_name: name,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teiki_protocol_core::ReferenceCompiler;
    use teiki_protocol_registry::{DependencyResolver, ResolverConfig};

    proptest! {
        #[test]
        fn test_out_ref_text_roundtrip(out_ref in out_ref()) {
            let parsed: OutRef = out_ref.to_string().parse().unwrap();
            prop_assert_eq!(parsed, out_ref);
        }

        #[test]
        fn test_derivation_deterministic(params: InstanceParams) {
            let resolver = DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig::default());
            let a = resolver.derive(params.seed.seed, params.seed.base_token_policy).unwrap();
            let b = resolver.derive(params.seed.seed, params.seed.base_token_policy).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
