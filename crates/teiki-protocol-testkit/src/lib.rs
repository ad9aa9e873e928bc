//! # Teiki Protocol Testkit
//!
//! Testing utilities for protocol registry derivation.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic seed parameters and compiler wrappers that
//!   record or inject compilation failures
//! - **Generators**: Proptest strategies for property-based testing
//! - **Vectors**: named derivation scenarios for regression checks
//!
//! ## Recording Compilations
//!
//! ```rust
//! use teiki_protocol_core::ScriptTemplateId;
//! use teiki_protocol_testkit::{RecordingCompiler, SeedFixture};
//!
//! let fixture = SeedFixture::s1();
//! let compiler = RecordingCompiler::new();
//! let hashes = fixture.derive_with(&compiler);
//!
//! let call = compiler.call_for(ScriptTemplateId::Backing).unwrap();
//! assert_eq!(call.hash, hashes.backing_validator_hash);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use teiki_protocol_testkit::generators::InstanceParams;
//!
//! proptest! {
//!     #[test]
//!     fn derivation_is_deterministic(params: InstanceParams) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{CompileCall, FailingCompiler, RecordingCompiler, SeedFixture};
pub use generators::InstanceParams;
pub use vectors::{all_vectors, verify_all_vectors, DerivationVector};
