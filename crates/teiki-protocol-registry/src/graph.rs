//! The script dependency graph.
//!
//! Every protocol script is a node. A node's inputs are the parameters its
//! template is compiled with, in order: the seed, the base token policy, or
//! the hash of another node. Hash inputs are the graph's edges.
//!
//! ```text
//! seed ──> protocol-nft ─┬─> projects-auth-token ─┬─> project, project-detail,
//!                        │                        │   project-script, dedicated-treasury
//!                        │                        └─> proof-of-backing ──> backing
//! base ──> teiki-token ──┼────────────────────────────┘        │
//!                        │                                     └─> shared-treasury
//!                        ├─> open-treasury
//!                        └─> protocol-stake
//! ```

use std::collections::{BTreeMap, BTreeSet};

use teiki_protocol_core::ScriptTemplateId;

use crate::error::{DeriveError, Result};

/// One compile-time input of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeInput {
    /// The protocol instance's seed output reference.
    Seed,
    /// The policy id of the base token the teiki token is minted against.
    BaseTokenPolicy,
    /// The hash of another node.
    Script(ScriptTemplateId),
}

use NodeInput::{BaseTokenPolicy, Script, Seed};
use ScriptTemplateId as T;

/// Inputs of every protocol script, in compile-parameter order.
const PROTOCOL_GRAPH: [(ScriptTemplateId, &[NodeInput]); 12] = [
    (T::ProtocolNft, &[Seed]),
    (T::ProjectsAuthToken, &[Script(T::ProtocolNft)]),
    (T::TeikiToken, &[BaseTokenPolicy]),
    (
        T::ProofOfBacking,
        &[
            Script(T::ProjectsAuthToken),
            Script(T::ProtocolNft),
            Script(T::TeikiToken),
        ],
    ),
    (T::ProtocolStake, &[Script(T::ProtocolNft)]),
    (
        T::Project,
        &[Script(T::ProjectsAuthToken), Script(T::ProtocolNft)],
    ),
    (
        T::ProjectDetail,
        &[Script(T::ProjectsAuthToken), Script(T::ProtocolNft)],
    ),
    (
        T::ProjectScript,
        &[Script(T::ProjectsAuthToken), Script(T::ProtocolNft)],
    ),
    (
        T::Backing,
        &[Script(T::ProofOfBacking), Script(T::ProtocolNft)],
    ),
    (
        T::DedicatedTreasury,
        &[Script(T::ProjectsAuthToken), Script(T::ProtocolNft)],
    ),
    (
        T::SharedTreasury,
        &[
            Script(T::ProjectsAuthToken),
            Script(T::ProtocolNft),
            Script(T::TeikiToken),
            Script(T::ProofOfBacking),
        ],
    ),
    (T::OpenTreasury, &[Script(T::ProtocolNft)]),
];

/// A fixed, acyclic graph of script nodes.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: BTreeMap<ScriptTemplateId, Vec<NodeInput>>,
}

impl DependencyGraph {
    /// The protocol's script graph.
    pub fn protocol() -> Self {
        let nodes = PROTOCOL_GRAPH
            .iter()
            .map(|(node, inputs)| (*node, inputs.to_vec()))
            .collect();
        Self { nodes }
    }

    /// Replace a node's inputs. Only for exercising graph checks.
    #[cfg(test)]
    pub(crate) fn with_inputs(mut self, node: ScriptTemplateId, inputs: Vec<NodeInput>) -> Self {
        self.nodes.insert(node, inputs);
        self
    }

    /// All nodes, in tag order.
    pub fn nodes(&self) -> impl Iterator<Item = ScriptTemplateId> + '_ {
        self.nodes.keys().copied()
    }

    /// The compile inputs of `node`, in parameter order. Empty for unknown nodes.
    pub fn inputs(&self, node: ScriptTemplateId) -> &[NodeInput] {
        self.nodes.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The nodes whose hashes `node` is compiled with.
    pub fn dependencies(&self, node: ScriptTemplateId) -> impl Iterator<Item = ScriptTemplateId> + '_ {
        self.inputs(node).iter().filter_map(|input| match input {
            Script(dep) => Some(*dep),
            Seed | BaseTokenPolicy => None,
        })
    }

    /// Every node that depends on `node`, directly or transitively.
    pub fn dependents(&self, node: ScriptTemplateId) -> BTreeSet<ScriptTemplateId> {
        let mut found = BTreeSet::new();
        let mut frontier = vec![node];
        while let Some(current) = frontier.pop() {
            for candidate in self.nodes() {
                if self.dependencies(candidate).any(|d| d == current) && found.insert(candidate) {
                    frontier.push(candidate);
                }
            }
        }
        found
    }

    /// Group nodes into evaluation layers (Kahn's algorithm).
    ///
    /// Every dependency of a node lies in an earlier layer, so nodes within one
    /// layer are independent and may be evaluated in any order or concurrently.
    pub fn layers(&self) -> Result<Vec<Vec<ScriptTemplateId>>> {
        for node in self.nodes() {
            if let Some(dependency) = self.dependencies(node).find(|d| !self.nodes.contains_key(d)) {
                return Err(DeriveError::UnknownDependency { node, dependency });
            }
        }

        let mut resolved = BTreeSet::new();
        let mut pending: Vec<ScriptTemplateId> = self.nodes().collect();
        let mut layers = Vec::new();

        while !pending.is_empty() {
            let (ready, blocked): (Vec<_>, Vec<_>) = pending
                .into_iter()
                .partition(|node| self.dependencies(*node).all(|d| resolved.contains(&d)));

            if ready.is_empty() {
                return Err(DeriveError::Cycle(blocked));
            }

            resolved.extend(ready.iter().copied());
            layers.push(ready);
            pending = blocked;
        }

        Ok(layers)
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::protocol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_of(layers: &[Vec<ScriptTemplateId>], node: ScriptTemplateId) -> usize {
        layers.iter().position(|l| l.contains(&node)).unwrap()
    }

    #[test]
    fn test_every_template_is_a_node() {
        let graph = DependencyGraph::protocol();
        let nodes: Vec<_> = graph.nodes().collect();
        assert_eq!(nodes, ScriptTemplateId::ALL.to_vec());
    }

    #[test]
    fn test_inputs_match_template_shapes() {
        let graph = DependencyGraph::protocol();
        for node in graph.nodes() {
            assert_eq!(
                graph.inputs(node).len(),
                node.param_shape().len(),
                "{node} input count differs from its template"
            );
        }
    }

    #[test]
    fn test_only_protocol_nft_uses_seed() {
        let graph = DependencyGraph::protocol();
        let seeded: Vec<_> = graph
            .nodes()
            .filter(|n| graph.inputs(*n).contains(&Seed))
            .collect();
        assert_eq!(seeded, vec![T::ProtocolNft]);
    }

    #[test]
    fn test_protocol_layers() {
        let layers = DependencyGraph::protocol().layers().unwrap();
        assert_eq!(
            layers,
            vec![
                vec![T::ProtocolNft, T::TeikiToken],
                vec![T::ProjectsAuthToken, T::ProtocolStake, T::OpenTreasury],
                vec![
                    T::ProofOfBacking,
                    T::Project,
                    T::ProjectDetail,
                    T::ProjectScript,
                    T::DedicatedTreasury,
                ],
                vec![T::Backing, T::SharedTreasury],
            ]
        );
    }

    #[test]
    fn test_layers_respect_dependencies() {
        let graph = DependencyGraph::protocol();
        let layers = graph.layers().unwrap();
        for node in graph.nodes() {
            for dep in graph.dependencies(node) {
                assert!(layer_of(&layers, dep) < layer_of(&layers, node));
            }
        }
    }

    #[test]
    fn test_dependents_of_teiki_token() {
        let dependents = DependencyGraph::protocol().dependents(T::TeikiToken);
        assert_eq!(
            dependents,
            BTreeSet::from([T::ProofOfBacking, T::Backing, T::SharedTreasury])
        );
    }

    #[test]
    fn test_everything_but_teiki_token_depends_on_protocol_nft() {
        let graph = DependencyGraph::protocol();
        let mut expected: BTreeSet<_> = graph.nodes().collect();
        expected.remove(&T::ProtocolNft);
        expected.remove(&T::TeikiToken);
        assert_eq!(graph.dependents(T::ProtocolNft), expected);
    }

    #[test]
    fn test_cycle_detected() {
        let graph = DependencyGraph::protocol()
            .with_inputs(T::ProjectsAuthToken, vec![Script(T::Backing)]);
        match graph.layers() {
            Err(DeriveError::Cycle(nodes)) => {
                assert!(nodes.contains(&T::ProjectsAuthToken));
                assert!(nodes.contains(&T::Backing));
                assert!(!nodes.contains(&T::ProtocolNft));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }
}
