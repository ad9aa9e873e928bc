//! Test fixtures and helpers.
//!
//! Deterministic seed parameters plus compiler wrappers that record or fail
//! compilations, for asserting on what the resolver asked for.

use std::sync::Mutex;

use teiki_protocol_core::{
    CompilationError, CompileFailure, OutRef, PolicyId, ReferenceCompiler, ScriptArtifact,
    ScriptCompiler, ScriptHash, ScriptParam, ScriptTemplateId, TokenName, TxHash,
};
use teiki_protocol_registry::{
    build_registry, DependencyResolver, Registry, RegistryScriptHashes, ResolverConfig, SeedParams,
};

/// Seed parameters and a migration token for one protocol instance.
#[derive(Debug, Clone)]
pub struct SeedFixture {
    pub seed: OutRef,
    pub base_token_policy: PolicyId,
    pub migration_token_policy: PolicyId,
    pub migration_token_name: TokenName,
}

impl SeedFixture {
    /// A fixture with a random seed output reference.
    pub fn new() -> Self {
        let tx: [u8; 32] = rand::random();
        Self::with_seed(OutRef::new(TxHash::from_bytes(tx), 0))
    }

    /// A fixture with a given seed and fixed policies.
    pub fn with_seed(seed: OutRef) -> Self {
        Self {
            seed,
            base_token_policy: ScriptHash::from_bytes([0x7a; 28]),
            migration_token_policy: ScriptHash::from_bytes([0x3e; 28]),
            migration_token_name: TokenName::new("MIGRATE").expect("valid token name"),
        }
    }

    /// Fixture `S1`: seed `0x11..11#0`.
    pub fn s1() -> Self {
        Self::with_seed(OutRef::new(TxHash::from_bytes([0x11; 32]), 0))
    }

    /// Fixture `S2`: same transaction as `S1`, next output.
    pub fn s2() -> Self {
        Self::with_seed(OutRef::new(TxHash::from_bytes([0x11; 32]), 1))
    }

    pub fn seed_params(&self) -> SeedParams {
        SeedParams {
            seed: self.seed,
            base_token_policy: self.base_token_policy,
        }
    }

    /// Derive hashes with the reference compiler.
    pub fn derive(&self) -> RegistryScriptHashes {
        self.derive_with(ReferenceCompiler::new())
    }

    /// Derive hashes with the given compiler.
    pub fn derive_with<C: ScriptCompiler>(&self, compiler: C) -> RegistryScriptHashes {
        DependencyResolver::new(compiler, ResolverConfig::default())
            .derive(self.seed, self.base_token_policy)
            .expect("derivation succeeds")
    }

    /// Derive hashes and build the registry with the reference compiler.
    pub fn registry(&self) -> Registry {
        build_registry(
            &self.derive(),
            self.migration_token_policy,
            &self.migration_token_name,
        )
    }
}

impl Default for SeedFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// One recorded compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCall {
    pub template: ScriptTemplateId,
    pub params: Vec<ScriptParam>,
    pub hash: ScriptHash,
}

/// Wraps a compiler and records every successful compilation, in order.
pub struct RecordingCompiler<C = ReferenceCompiler> {
    inner: C,
    calls: Mutex<Vec<CompileCall>>,
}

impl RecordingCompiler<ReferenceCompiler> {
    pub fn new() -> Self {
        Self::wrap(ReferenceCompiler::new())
    }
}

impl Default for RecordingCompiler<ReferenceCompiler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ScriptCompiler> RecordingCompiler<C> {
    pub fn wrap(inner: C) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded calls, in completion order.
    pub fn calls(&self) -> Vec<CompileCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// The recorded call for `template`.
    pub fn call_for(&self, template: ScriptTemplateId) -> Option<CompileCall> {
        self.calls().into_iter().find(|c| c.template == template)
    }

    /// Position of `template` in completion order.
    pub fn position(&self, template: ScriptTemplateId) -> Option<usize> {
        self.calls().iter().position(|c| c.template == template)
    }
}

impl<C: ScriptCompiler> ScriptCompiler for RecordingCompiler<C> {
    fn compile(
        &self,
        template: ScriptTemplateId,
        params: &[ScriptParam],
    ) -> Result<ScriptArtifact, CompilationError> {
        let artifact = self.inner.compile(template, params)?;
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(CompileCall {
                template,
                params: params.to_vec(),
                hash: artifact.hash(),
            });
        Ok(artifact)
    }
}

/// A compiler that fails for one template and delegates the rest.
pub struct FailingCompiler {
    inner: ReferenceCompiler,
    fail_on: ScriptTemplateId,
}

impl FailingCompiler {
    pub fn new(fail_on: ScriptTemplateId) -> Self {
        Self {
            inner: ReferenceCompiler::new(),
            fail_on,
        }
    }
}

impl ScriptCompiler for FailingCompiler {
    fn compile(
        &self,
        template: ScriptTemplateId,
        params: &[ScriptParam],
    ) -> Result<ScriptArtifact, CompilationError> {
        if template == self.fail_on {
            return Err(CompilationError::new(
                template,
                CompileFailure::Encoding("injected failure".into()),
            ));
        }
        self.inner.compile(template, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_compiler_records_every_script() {
        let fixture = SeedFixture::s1();
        let compiler = RecordingCompiler::new();
        let hashes = fixture.derive_with(&compiler);

        let calls = compiler.calls();
        assert_eq!(calls.len(), 12);
        for call in &calls {
            assert_eq!(call.hash, hashes.get(call.template));
        }
    }

    #[test]
    fn test_recording_does_not_change_hashes() {
        let fixture = SeedFixture::s1();
        assert_eq!(fixture.derive_with(RecordingCompiler::new()), fixture.derive());
    }

    #[test]
    fn test_random_fixtures_differ() {
        assert_ne!(SeedFixture::new().seed, SeedFixture::new().seed);
    }
}
