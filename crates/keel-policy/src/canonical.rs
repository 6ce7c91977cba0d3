//! Canonical byte form for hashing and signing.
//!
//! A value's canonical form is its JSON encoding with object keys in
//! lexicographic order; sets are sorted at the type level (`BTreeSet`),
//! so equal values produce identical bytes on every call, in every
//! process. This encoding is a compatibility contract: any change to it
//! invalidates every previously stored signature.

use serde::Serialize;

/// Serialize a value to its canonical bytes.
///
/// Runs through `serde_json::Value`, whose object map keeps keys sorted,
/// so struct field declaration order never leaks into the encoding.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_vec(&value)
}

/// Canonical form as a `String`; identical characters to
/// [`to_canonical_bytes`].
pub fn to_canonical_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&value)
}
