//! The content-hash primitive for script artifacts.
//!
//! Script hashes are Blake3 over a domain tag and the artifact bytes,
//! truncated (via the XOF) to [`SCRIPT_HASH_LEN`] bytes.

use crate::script::ScriptArtifact;
use crate::types::{ScriptHash, SCRIPT_HASH_LEN};

/// Domain separator for script hashes.
pub const SCRIPT_HASH_DOMAIN: &[u8] = b"teiki-script-v0:";

/// Compute the canonical content hash of a script artifact.
pub fn hash_artifact(artifact: &ScriptArtifact) -> ScriptHash {
    hash_script_bytes(artifact.as_bytes())
}

/// Compute the script hash of raw compiled script bytes.
pub fn hash_script_bytes(bytes: &[u8]) -> ScriptHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SCRIPT_HASH_DOMAIN);
    hasher.update(bytes);

    let mut out = [0u8; SCRIPT_HASH_LEN];
    hasher.finalize_xof().fill(&mut out);
    ScriptHash(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptTemplateId;

    #[test]
    fn test_hash_deterministic() {
        let h1 = hash_script_bytes(b"script");
        let h2 = hash_script_bytes(b"script");
        assert_eq!(h1, h2);
        assert_ne!(h1, hash_script_bytes(b"scripT"));
    }

    #[test]
    fn test_hash_pinned() {
        assert_eq!(
            hash_script_bytes(b"script").to_hex(),
            "8461b134d058404adf138b666419a8176c79b7cbf17c7de937d29fca"
        );
    }

    #[test]
    fn test_hash_is_domain_separated() {
        // A plain Blake3 prefix of the same bytes must not collide with ours
        let plain = blake3::hash(b"script");
        let ours = hash_script_bytes(b"script");
        assert_ne!(&plain.as_bytes()[..SCRIPT_HASH_LEN], ours.as_bytes());
    }

    #[test]
    fn test_hash_artifact_ignores_nothing_but_bytes() {
        let a = ScriptArtifact::new(ScriptTemplateId::Project, b"code".to_vec());
        let b = ScriptArtifact::new(ScriptTemplateId::Project, b"code".to_vec());
        assert_eq!(hash_artifact(&a), hash_artifact(&b));
        assert_eq!(hash_artifact(&a), hash_script_bytes(b"code"));
    }
}
