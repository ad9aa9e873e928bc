//! Canonical CBOR encoding for deterministic script artifacts.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Only integers, byte strings, arrays and maps; anything else is rejected
//!
//! The reference compiler encodes (template, code, parameters) with this
//! encoder, so identical inputs give identical bytes and identical hashes on
//! every platform.

use ciborium::value::Value;

use crate::error::CoreError;
use crate::script::{ScriptParam, ScriptTemplateId};

/// Artifact field keys (integer keys for compact encoding).
mod keys {
    pub const TEMPLATE: u64 = 0;
    pub const CODE: u64 = 1;
    pub const PARAMS: u64 = 2;
}

/// Encode a compiled script body to canonical CBOR bytes.
///
/// Layout: `{0: template tag, 1: code bytes, 2: [params...]}`.
pub fn canonical_artifact_bytes(
    template: ScriptTemplateId,
    code: &[u8],
    params: &[ScriptParam],
) -> Result<Vec<u8>, CoreError> {
    let value = artifact_to_cbor_value(template, code, params);
    encode_canonical(&value)
}

/// Encode a CBOR Value to canonical bytes.
pub fn encode_canonical(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

fn artifact_to_cbor_value(
    template: ScriptTemplateId,
    code: &[u8],
    params: &[ScriptParam],
) -> Value {
    let params: Vec<Value> = params.iter().map(param_to_cbor_value).collect();

    Value::Map(vec![
        (
            Value::Integer(keys::TEMPLATE.into()),
            Value::Integer(template.to_u16().into()),
        ),
        (Value::Integer(keys::CODE.into()), Value::Bytes(code.to_vec())),
        (Value::Integer(keys::PARAMS.into()), Value::Array(params)),
    ])
}

/// Output references encode as `[tx_hash, index]`, hashes as a byte string.
fn param_to_cbor_value(param: &ScriptParam) -> Value {
    match param {
        ScriptParam::OutRef(out_ref) => Value::Array(vec![
            Value::Bytes(out_ref.tx_hash.0.to_vec()),
            Value::Integer(out_ref.output_index.into()),
        ]),
        ScriptParam::ScriptHash(hash) => Value::Bytes(hash.0.to_vec()),
    }
}

fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Float(_) => {
            return Err(CoreError::EncodingError(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => {
            return Err(CoreError::EncodingError(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CoreError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut key_value_pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        key_value_pairs.push((key_buf, v));
    }

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutRef, ScriptHash, TxHash};

    #[test]
    fn test_artifact_encoding_deterministic() {
        let params = [ScriptParam::ScriptHash(ScriptHash::from_bytes([0x11; 28]))];
        let b1 = canonical_artifact_bytes(ScriptTemplateId::ProjectsAuthToken, b"code", &params)
            .unwrap();
        let b2 = canonical_artifact_bytes(ScriptTemplateId::ProjectsAuthToken, b"code", &params)
            .unwrap();
        assert_eq!(b1, b2);
    }

    #[test]
    fn test_artifact_layout() {
        let seed = OutRef::new(TxHash::from_bytes([0xaa; 32]), 1);
        let bytes = canonical_artifact_bytes(
            ScriptTemplateId::ProtocolNft,
            b"nft",
            &[ScriptParam::OutRef(seed)],
        )
        .unwrap();

        // Map header (3 entries), key 0, template tag 1
        assert_eq!(&bytes[..3], &[0xa3, 0x00, 0x01]);
        // key 1, 3-byte code string
        assert_eq!(&bytes[3..8], &[0x01, 0x43, b'n', b'f', b't']);
        // key 2, array of one param, which is a 2-element array
        assert_eq!(&bytes[8..11], &[0x02, 0x81, 0x82]);
        // tx hash as 32-byte string, then index 1
        assert_eq!(&bytes[11..13], &[0x58, 32]);
        assert_eq!(bytes[45], 0x01);
        assert_eq!(bytes.len(), 46);
    }

    #[test]
    fn test_param_order_matters() {
        let a = ScriptParam::ScriptHash(ScriptHash::from_bytes([0x01; 28]));
        let b = ScriptParam::ScriptHash(ScriptHash::from_bytes([0x02; 28]));
        let ab = canonical_artifact_bytes(ScriptTemplateId::Project, b"p", &[a, b]).unwrap();
        let ba = canonical_artifact_bytes(ScriptTemplateId::Project, b"p", &[b, a]).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 0x1_0000_0000);
        assert_eq!(buf, vec![0x1b, 0, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_map_key_ordering() {
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Integer(8.into()), Value::Integer(80.into())),
            (Value::Integer(0.into()), Value::Integer(0.into())),
            (Value::Integer(5.into()), Value::Integer(50.into())),
        ];
        encode_map_canonical(&mut buf, &entries).unwrap();

        assert_eq!(buf, vec![0xa3, 0x00, 0x00, 0x05, 0x18, 50, 0x08, 0x18, 80]);
    }

    #[test]
    fn test_floats_rejected() {
        let err = encode_canonical(&Value::Float(1.5)).unwrap_err();
        assert!(matches!(err, CoreError::EncodingError(_)));
    }

    #[test]
    fn test_values_outside_artifact_layout_rejected() {
        for value in [Value::Text("code".into()), Value::Bool(true), Value::Null] {
            let err = encode_canonical(&value).unwrap_err();
            assert!(matches!(err, CoreError::EncodingError(_)));
        }
    }
}
