//! Deterministic report digests.
//!
//! Re-running an analysis with the same witness and limits must reproduce
//! the same report, so every report can be fingerprinted:
//!
//! 1. Serialize the report to a `serde_json::Value`
//! 2. Canonicalize (sorted object keys, no whitespace, integer numbers verbatim)
//! 3. digest = "r1_" || base32hex_lower(SHA256(canonical bytes))

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute the digest of any serializable report.
///
/// Values that fail to serialize (non-string map keys and the like) digest
/// as `null`; reports in this crate never hit that path.
pub fn report_digest<T: Serialize + ?Sized>(report: &T) -> String {
    let value = serde_json::to_value(report).unwrap_or(Value::Null);
    digest_value(&value)
}

/// Digest an already-built JSON value.
pub fn digest_value(value: &Value) -> String {
    let mut bytes = Vec::new();
    canonical_json(value, &mut bytes);
    let hash = Sha256::digest(&bytes);
    format!("r1_{}", base32hex_lower_no_pad(&hash))
}

/// Canonical JSON: lexicographically sorted keys, no insignificant whitespace.
fn canonical_json(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.extend_from_slice(i.to_string().as_bytes());
            } else if let Some(u) = n.as_u64() {
                out.extend_from_slice(u.to_string().as_bytes());
            } else {
                out.extend_from_slice(n.to_string().as_bytes());
            }
        }
        Value::String(s) => write_json_string(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                canonical_json(item, out);
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_json_string(key, out);
                out.push(b':');
                canonical_json(&map[*key], out);
            }
            out.push(b'}');
        }
    }
}

fn write_json_string(s: &str, out: &mut Vec<u8>) {
    // Display of a string Value is its escaped JSON form.
    out.extend_from_slice(Value::String(s.to_string()).to_string().as_bytes());
}

/// RFC 4648 base32hex, lowercase, unpadded: five bits per digit, the last
/// digit zero-filled on the right.
fn base32hex_lower_no_pad(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

    (0..(bytes.len() * 8).div_ceil(5))
        .map(|group| {
            let offset = group * 5;
            let high = u16::from(bytes[offset / 8]);
            let low = u16::from(bytes.get(offset / 8 + 1).copied().unwrap_or(0));
            let window = (high << 8) | low;
            let digit = (window >> (11 - offset % 8)) & 0x1f;
            char::from(DIGITS[usize::from(digit)])
        })
        .collect()
}
