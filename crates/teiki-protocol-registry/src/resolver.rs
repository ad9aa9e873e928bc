//! Dependency resolution: compile and hash every script in graph order.
//!
//! Resolution walks the [`DependencyGraph`] layer by layer. Each node's
//! parameters are built from the seed, the base token policy and the
//! already-final hashes of earlier layers, then compiled and hashed. Nodes of
//! one layer never read each other, so a layer may be evaluated on the rayon
//! pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use teiki_protocol_core::{OutRef, PolicyId, ScriptCompiler, ScriptHash, ScriptParam, ScriptTemplateId};

use crate::error::Result;
use crate::graph::{DependencyGraph, NodeInput};
use crate::hashes::{DerivedHashes, RegistryScriptHashes};

/// Configuration for the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Evaluate independent nodes of a layer concurrently.
    pub parallel: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// The seed parameters of a protocol instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedParams {
    /// Output reference consumed when the protocol NFT is minted.
    pub seed: OutRef,
    /// Policy id of the base token the teiki token is minted against.
    pub base_token_policy: PolicyId,
}

/// Derives every protocol script hash from seed parameters.
pub struct DependencyResolver<C: ScriptCompiler> {
    compiler: C,
    graph: DependencyGraph,
    config: ResolverConfig,
}

impl<C: ScriptCompiler> DependencyResolver<C> {
    /// Create a resolver over the protocol graph.
    pub fn new(compiler: C, config: ResolverConfig) -> Self {
        Self {
            compiler,
            graph: DependencyGraph::protocol(),
            config,
        }
    }

    /// Replace the graph. Only for exercising graph failures.
    #[cfg(test)]
    pub(crate) fn with_graph(mut self, graph: DependencyGraph) -> Self {
        self.graph = graph;
        self
    }

    /// Derive the raw hash bundle.
    pub fn derive(&self, seed: OutRef, base_token_policy: PolicyId) -> Result<RegistryScriptHashes> {
        let derived = self.derive_all(&SeedParams {
            seed,
            base_token_policy,
        })?;
        RegistryScriptHashes::from_derived(&derived)
    }

    /// Derive the hash of every graph node.
    ///
    /// All or nothing: the first failure discards everything derived so far.
    pub fn derive_all(&self, seed: &SeedParams) -> Result<DerivedHashes> {
        let layers = self.graph.layers()?;
        let mut derived = DerivedHashes::default();

        for (depth, layer) in layers.iter().enumerate() {
            tracing::trace!(depth, nodes = layer.len(), "resolving layer");

            let results: Vec<(ScriptTemplateId, ScriptHash)> = if self.config.parallel && layer.len() > 1 {
                layer
                    .par_iter()
                    .map(|&node| self.derive_node(node, seed, &derived).map(|hash| (node, hash)))
                    .collect::<Result<_>>()?
            } else {
                layer
                    .iter()
                    .map(|&node| self.derive_node(node, seed, &derived).map(|hash| (node, hash)))
                    .collect::<Result<_>>()?
            };

            for (node, hash) in results {
                derived.insert(node, hash)?;
            }
        }

        Ok(derived)
    }

    /// The parameters `node` is compiled with, given everything derived so far.
    pub fn node_params(
        &self,
        node: ScriptTemplateId,
        seed: &SeedParams,
        derived: &DerivedHashes,
    ) -> Result<Vec<ScriptParam>> {
        self.graph
            .inputs(node)
            .iter()
            .map(|input| match input {
                NodeInput::Seed => Ok(ScriptParam::OutRef(seed.seed)),
                NodeInput::BaseTokenPolicy => Ok(ScriptParam::ScriptHash(seed.base_token_policy)),
                NodeInput::Script(dep) => derived.require(*dep).map(ScriptParam::ScriptHash),
            })
            .collect()
    }

    fn derive_node(
        &self,
        node: ScriptTemplateId,
        seed: &SeedParams,
        derived: &DerivedHashes,
    ) -> Result<ScriptHash> {
        let params = self.node_params(node, seed, derived)?;
        let artifact = self.compiler.compile(node, &params)?;
        let hash = artifact.hash();
        tracing::debug!(script = %node, %hash, size = artifact.len(), "derived script hash");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeriveError;
    use teiki_protocol_core::{CompilationError, CompileFailure, ReferenceCompiler, TxHash};

    fn seed() -> SeedParams {
        SeedParams {
            seed: OutRef::new(TxHash::from_bytes([0x51; 32]), 0),
            base_token_policy: ScriptHash::from_bytes([0x71; 28]),
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let parallel = DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig { parallel: true });
        let sequential = DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig { parallel: false });

        let a = parallel.derive_all(&seed()).unwrap();
        let b = sequential.derive_all(&seed()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_node_params_thread_upstream_hashes() {
        let resolver = DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig::default());
        let derived = resolver.derive_all(&seed()).unwrap();

        let params = resolver
            .node_params(ScriptTemplateId::SharedTreasury, &seed(), &derived)
            .unwrap();
        let expected: Vec<ScriptParam> = [
            ScriptTemplateId::ProjectsAuthToken,
            ScriptTemplateId::ProtocolNft,
            ScriptTemplateId::TeikiToken,
            ScriptTemplateId::ProofOfBacking,
        ]
        .into_iter()
        .map(|t| ScriptParam::ScriptHash(derived.get(t).unwrap()))
        .collect();
        assert_eq!(params, expected);

        let params = resolver
            .node_params(ScriptTemplateId::TeikiToken, &seed(), &derived)
            .unwrap();
        assert_eq!(params, vec![ScriptParam::ScriptHash(seed().base_token_policy)]);
    }

    #[test]
    fn test_node_params_before_dependency_is_unresolved() {
        let resolver = DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig::default());
        let err = resolver
            .node_params(ScriptTemplateId::Backing, &seed(), &DerivedHashes::default())
            .unwrap_err();
        assert_eq!(err, DeriveError::Unresolved(ScriptTemplateId::ProofOfBacking));
    }

    #[test]
    fn test_compilation_failure_aborts() {
        let compiler = ReferenceCompiler::new().without_code(ScriptTemplateId::ProjectDetail);
        let resolver = DependencyResolver::new(compiler, ResolverConfig::default());
        let err = resolver.derive_all(&seed()).unwrap_err();
        assert_eq!(
            err,
            DeriveError::Compilation(CompilationError::new(
                ScriptTemplateId::ProjectDetail,
                CompileFailure::MissingCode
            ))
        );
    }

    #[test]
    fn test_cyclic_graph_is_rejected_before_compiling() {
        let graph = DependencyGraph::protocol().with_inputs(
            ScriptTemplateId::ProtocolNft,
            vec![NodeInput::Script(ScriptTemplateId::OpenTreasury)],
        );
        let resolver =
            DependencyResolver::new(ReferenceCompiler::new(), ResolverConfig::default()).with_graph(graph);
        assert!(matches!(resolver.derive_all(&seed()), Err(DeriveError::Cycle(_))));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert!(config.parallel);
    }
}
