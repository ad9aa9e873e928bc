//! Script templates, parameters, artifacts and the compiler seam.
//!
//! Compiling a script template means applying its parameters to its code and
//! producing a loadable artifact. The pipeline only ever needs the artifact's
//! hash, so compilation sits behind the [`ScriptCompiler`] trait: production
//! deployments plug in their real toolchain, tests and tooling use
//! [`ReferenceCompiler`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::canonical::canonical_artifact_bytes;
use crate::crypto::hash_artifact;
use crate::error::{CompilationError, CompileFailure};
use crate::types::{OutRef, ScriptHash};

/// Identifies which on-chain program template to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u16)]
pub enum ScriptTemplateId {
    // Minting policies (0x0000 - 0x00FF)
    /// One-shot policy of the protocol NFT, parameterized by the seed.
    ProtocolNft = 0x0001,
    /// Authentication tokens carried by project outputs.
    ProjectsAuthToken = 0x0002,
    /// The protocol's reward token.
    TeikiToken = 0x0003,
    /// Receipts minted when backing a project.
    ProofOfBacking = 0x0004,

    // Validators (0x0100 - 0x01FF)
    /// Staking validator shared by all protocol outputs.
    ProtocolStake = 0x0100,
    Project = 0x0101,
    ProjectDetail = 0x0102,
    ProjectScript = 0x0103,
    Backing = 0x0104,

    // Treasury validators (0x0200 - 0x02FF)
    DedicatedTreasury = 0x0200,
    SharedTreasury = 0x0201,
    OpenTreasury = 0x0202,
}

impl ScriptTemplateId {
    /// Every template, in tag order.
    pub const ALL: [ScriptTemplateId; 12] = [
        Self::ProtocolNft,
        Self::ProjectsAuthToken,
        Self::TeikiToken,
        Self::ProofOfBacking,
        Self::ProtocolStake,
        Self::Project,
        Self::ProjectDetail,
        Self::ProjectScript,
        Self::Backing,
        Self::DedicatedTreasury,
        Self::SharedTreasury,
        Self::OpenTreasury,
    ];

    /// Convert to u16 for serialization.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.to_u16() == value)
    }

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ProtocolNft => "protocol-nft",
            Self::ProjectsAuthToken => "projects-auth-token",
            Self::TeikiToken => "teiki-token",
            Self::ProofOfBacking => "proof-of-backing",
            Self::ProtocolStake => "protocol-stake",
            Self::Project => "project",
            Self::ProjectDetail => "project-detail",
            Self::ProjectScript => "project-script",
            Self::Backing => "backing",
            Self::DedicatedTreasury => "dedicated-treasury",
            Self::SharedTreasury => "shared-treasury",
            Self::OpenTreasury => "open-treasury",
        }
    }

    pub fn is_minting_policy(self) -> bool {
        (self.to_u16() & 0xFF00) == 0x0000
    }

    pub fn is_validator(self) -> bool {
        !self.is_minting_policy()
    }

    pub fn is_treasury(self) -> bool {
        (self.to_u16() & 0xFF00) == 0x0200
    }

    /// The parameter list this template is compiled with.
    pub fn param_shape(self) -> &'static [ParamKind] {
        use ParamKind::{OutRef as R, ScriptHash as H};
        match self {
            Self::ProtocolNft => &[R],
            Self::ProjectsAuthToken
            | Self::TeikiToken
            | Self::ProtocolStake
            | Self::OpenTreasury => &[H],
            Self::Project
            | Self::ProjectDetail
            | Self::ProjectScript
            | Self::Backing
            | Self::DedicatedTreasury => &[H, H],
            Self::ProofOfBacking => &[H, H, H],
            Self::SharedTreasury => &[H, H, H, H],
        }
    }
}

impl fmt::Display for ScriptTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of a compile-time parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    OutRef,
    ScriptHash,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutRef => f.write_str("an output reference"),
            Self::ScriptHash => f.write_str("a script hash"),
        }
    }
}

/// A single compile-time parameter of a script template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptParam {
    OutRef(OutRef),
    ScriptHash(ScriptHash),
}

impl ScriptParam {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::OutRef(_) => ParamKind::OutRef,
            Self::ScriptHash(_) => ParamKind::ScriptHash,
        }
    }

    /// The hash, if this parameter is one.
    pub fn as_script_hash(&self) -> Option<&ScriptHash> {
        match self {
            Self::ScriptHash(hash) => Some(hash),
            Self::OutRef(_) => None,
        }
    }
}

impl From<OutRef> for ScriptParam {
    fn from(out_ref: OutRef) -> Self {
        Self::OutRef(out_ref)
    }
}

impl From<ScriptHash> for ScriptParam {
    fn from(hash: ScriptHash) -> Self {
        Self::ScriptHash(hash)
    }
}

/// A compiled script. Opaque beyond its bytes and the template it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptArtifact {
    template: ScriptTemplateId,
    bytes: Bytes,
}

impl ScriptArtifact {
    pub fn new(template: ScriptTemplateId, bytes: impl Into<Bytes>) -> Self {
        Self {
            template,
            bytes: bytes.into(),
        }
    }

    pub fn template(&self) -> ScriptTemplateId {
        self.template
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Compute the canonical content hash of this artifact.
    pub fn hash(&self) -> ScriptHash {
        hash_artifact(self)
    }
}

/// Turns a template plus parameters into a script artifact.
///
/// Implementations must be pure: identical inputs always produce
/// byte-identical artifacts. `Send + Sync` so independent templates can be
/// compiled concurrently.
pub trait ScriptCompiler: Send + Sync {
    fn compile(
        &self,
        template: ScriptTemplateId,
        params: &[ScriptParam],
    ) -> Result<ScriptArtifact, CompilationError>;
}

impl<C: ScriptCompiler + ?Sized> ScriptCompiler for &C {
    fn compile(
        &self,
        template: ScriptTemplateId,
        params: &[ScriptParam],
    ) -> Result<ScriptArtifact, CompilationError> {
        (**self).compile(template, params)
    }
}

/// Check `params` against the template's declared parameter shape.
pub fn check_param_shape(
    template: ScriptTemplateId,
    params: &[ScriptParam],
) -> Result<(), CompilationError> {
    let shape = template.param_shape();
    if shape.len() != params.len() {
        return Err(CompilationError::new(
            template,
            CompileFailure::Arity {
                expected: shape.len(),
                got: params.len(),
            },
        ));
    }

    for (index, (expected, param)) in shape.iter().zip(params).enumerate() {
        if param.kind() != *expected {
            return Err(CompilationError::new(
                template,
                CompileFailure::ParamKind {
                    index,
                    expected: *expected,
                    got: param.kind(),
                },
            ));
        }
    }

    Ok(())
}

/// A deterministic compiler over a table of template code.
///
/// The artifact is the canonical CBOR encoding of the template tag, its code
/// and the applied parameters. Templates without code fail to compile.
#[derive(Debug, Clone)]
pub struct ReferenceCompiler {
    code: BTreeMap<ScriptTemplateId, Bytes>,
}

impl ReferenceCompiler {
    /// A compiler with built-in placeholder code for every template.
    pub fn new() -> Self {
        let code = ScriptTemplateId::ALL
            .into_iter()
            .map(|t| (t, Bytes::from(format!("teiki/{}/v0", t.name()))))
            .collect();
        Self { code }
    }

    /// A compiler with no template code at all.
    pub fn empty() -> Self {
        Self {
            code: BTreeMap::new(),
        }
    }

    /// Replace the code of one template.
    pub fn with_code(mut self, template: ScriptTemplateId, code: impl Into<Bytes>) -> Self {
        self.code.insert(template, code.into());
        self
    }

    /// Remove the code of one template.
    pub fn without_code(mut self, template: ScriptTemplateId) -> Self {
        self.code.remove(&template);
        self
    }

    pub fn code(&self, template: ScriptTemplateId) -> Option<&Bytes> {
        self.code.get(&template)
    }
}

impl Default for ReferenceCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptCompiler for ReferenceCompiler {
    fn compile(
        &self,
        template: ScriptTemplateId,
        params: &[ScriptParam],
    ) -> Result<ScriptArtifact, CompilationError> {
        check_param_shape(template, params)?;

        let code = self
            .code
            .get(&template)
            .ok_or_else(|| CompilationError::new(template, CompileFailure::MissingCode))?;

        let bytes = canonical_artifact_bytes(template, code, params)
            .map_err(|e| CompilationError::new(template, CompileFailure::Encoding(e.to_string())))?;

        Ok(ScriptArtifact::new(template, bytes))
    }
}
