//! Strong type definitions for protocol identifiers.
//!
//! All identifiers are newtypes to prevent misuse at compile time. Text forms
//! are lowercase hex, which is also how they serialize.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Length of a script hash in bytes.
pub const SCRIPT_HASH_LEN: usize = 28;

/// Maximum length of a token name in bytes.
pub const MAX_TOKEN_NAME_LEN: usize = 32;

/// A 28-byte script hash, the content identifier of a compiled script.
///
/// A script hash is at once the script's address and an input to the
/// compilation of every script that depends on it. Minting policy ids are
/// script hashes too; see [`PolicyId`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptHash(pub [u8; SCRIPT_HASH_LEN]);

/// A minting policy id is the hash of the minting policy script.
pub type PolicyId = ScriptHash;

impl ScriptHash {
    /// Create a new ScriptHash from raw bytes.
    pub const fn from_bytes(bytes: [u8; SCRIPT_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SCRIPT_HASH_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != SCRIPT_HASH_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; SCRIPT_HASH_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ScriptHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_hex(s)?)
    }
}

impl AsRef<[u8]> for ScriptHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SCRIPT_HASH_LEN]> for ScriptHash {
    fn from(bytes: [u8; SCRIPT_HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for ScriptHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ScriptHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A reference to a transaction output.
///
/// Used as the seed of a protocol instance: the output can be spent exactly
/// once, so a script parameterized by it has a globally unique hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutRef {
    /// Hash of the transaction that created the output.
    pub tx_hash: TxHash,
    /// Index of the output within that transaction.
    pub output_index: u32,
}

/// The seed of a protocol instance is an output reference.
pub type SeedReference = OutRef;

impl OutRef {
    pub const fn new(tx_hash: TxHash, output_index: u32) -> Self {
        Self {
            tx_hash,
            output_index,
        }
    }
}

impl fmt::Display for OutRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_hash, self.output_index)
    }
}

impl FromStr for OutRef {
    type Err = CoreError;

    /// Parse `<tx hash hex>#<output index>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hash, index) = s
            .split_once('#')
            .ok_or_else(|| CoreError::MalformedOutRef(format!("missing '#' in {s:?}")))?;
        let tx_hash = TxHash::from_hex(hash)
            .map_err(|e| CoreError::MalformedOutRef(format!("tx hash: {e}")))?;
        let output_index = index
            .parse::<u32>()
            .map_err(|e| CoreError::MalformedOutRef(format!("output index: {e}")))?;
        Ok(Self::new(tx_hash, output_index))
    }
}

/// A native token name.
///
/// Never empty and at most [`MAX_TOKEN_NAME_LEN`] bytes, so anything holding a
/// `TokenName` can use it without further checks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenName(String);

impl TokenName {
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::EmptyTokenName);
        }
        if name.len() > MAX_TOKEN_NAME_LEN {
            return Err(CoreError::TokenNameTooLong {
                len: name.len(),
                max: MAX_TOKEN_NAME_LEN,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TokenName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenName> for String {
    fn from(name: TokenName) -> Self {
        name.0
    }
}
