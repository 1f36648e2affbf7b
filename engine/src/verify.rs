//! Recomputes a root from a proof and the schema shape alone — no record
//! access — and compares it against an expected root.
//!
//! The walk consumes the proof's `hashes` sequence leaf-first: at each
//! class node it pulls the *next* `(before, after)` entry only if one of
//! its children turned out to lie on the disclosed path, matching the
//! proof engine's flattening exactly in reverse.

use crate::canonical::canonicalize_primitive;
use crate::compat::{String, Vec};
use crate::error::{EngineError, ErrorKind};
use crate::hash::{hash_leaf, hash_node, Digest};
use crate::limits::{DIGEST_BYTES, MAX_PATH_DEPTH, MAX_PROPERTIES_PER_CLASS};
use crate::proof::Proof;
use crate::schema::{PropertyKind, SchemaProvider};

fn decode_digest(hex_str: &str, path: &[String]) -> Result<Digest, EngineError> {
    let bytes = hex::decode(hex_str)
        .map_err(|_| EngineError::at(ErrorKind::MalformedProof, path))?;
    bytes
        .try_into()
        .map_err(|_| EngineError::at(ErrorKind::MalformedProof, path))
}

/// The result of walking one subtree against the proof.
///
/// `Invalid` covers every divergence that must fail verification rather
/// than raise an exception — the path running into an
/// array/enum/relationship, or the disclosed value's type disagreeing with
/// the schema at the matched leaf. Propagating a distinct soft-failure
/// variant (instead of an `Err`) keeps a forged path indistinguishable from
/// a cryptographic mismatch: both simply fail to verify.
enum WalkOutcome {
    NoMatch,
    Matched(Digest),
    Invalid,
}

/// Verify `proof` discloses the value at `path` and recomputes to
/// `expected_root` under `class_name`'s schema.
///
/// Returns `Ok(false)` for any cryptographic or structural mismatch along
/// the disclosed path; only malformed proof encoding (bad hex, wrong salt
/// length) raises `MalformedProof`, and an unresolvable `path`/`class_name`
/// against the schema raises `PathInvalid`/`TypeMismatch` as caller errors.
pub fn verify(
    schema: &impl SchemaProvider,
    class_name: &str,
    path: &[&str],
    expected_root: &str,
    proof: &Proof,
) -> Result<bool, EngineError> {
    if path.is_empty() {
        return Err(EngineError::new(ErrorKind::PathInvalid, Vec::new()));
    }

    let salt_bytes: [u8; DIGEST_BYTES] = hex::decode(&proof.salt)
        .map_err(|_| EngineError::new(ErrorKind::MalformedProof, Vec::new()))?
        .try_into()
        .map_err(|_| EngineError::new(ErrorKind::MalformedProof, Vec::new()))?;

    let mut current_path = Vec::new();
    let mut level_cursor = 0usize;
    let outcome = walk(
        schema,
        class_name,
        path,
        proof,
        &salt_bytes,
        &mut current_path,
        &mut level_cursor,
    )?;

    let digest = match outcome {
        WalkOutcome::Matched(d) => d,
        WalkOutcome::Invalid => return Ok(false),
        WalkOutcome::NoMatch => return Err(EngineError::new(ErrorKind::PathInvalid, Vec::new())),
    };

    if level_cursor != proof.hashes.len() {
        // Leftover or short hashes sequence: a verification failure, not
        // an exception.
        return Ok(false);
    }

    Ok(hex::encode(digest) == expected_root.to_lowercase())
}

fn walk(
    schema: &impl SchemaProvider,
    class_name: &str,
    target: &[&str],
    proof: &Proof,
    salt: &[u8; DIGEST_BYTES],
    current_path: &mut Vec<String>,
    level_cursor: &mut usize,
) -> Result<WalkOutcome, EngineError> {
    let properties = schema
        .properties(class_name)
        .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, current_path))?;

    if properties.len() > MAX_PROPERTIES_PER_CLASS {
        return Err(EngineError::at(ErrorKind::TypeMismatch, current_path));
    }

    let mut matched: Option<Digest> = None;

    for property in properties {
        if current_path.len() >= MAX_PATH_DEPTH {
            return Ok(WalkOutcome::Invalid);
        }
        current_path.push(property.name.clone());

        let on_path = current_path.len() <= target.len()
            && current_path
                .iter()
                .zip(target.iter())
                .all(|(a, b)| a.as_str() == *b);

        if on_path {
            let child_outcome = match &property.kind {
                PropertyKind::Primitive(ty) => {
                    if current_path.len() != target.len() {
                        WalkOutcome::Invalid
                    } else {
                        match canonicalize_primitive(&proof.value, *ty) {
                            Ok(canonical) => WalkOutcome::Matched(hash_leaf(&canonical, salt)),
                            Err(_) => WalkOutcome::Invalid,
                        }
                    }
                }
                PropertyKind::NestedClass(nested_name) => walk(
                    schema,
                    nested_name,
                    target,
                    proof,
                    salt,
                    current_path,
                    level_cursor,
                )?,
                PropertyKind::Array | PropertyKind::Enum | PropertyKind::Relationship => {
                    WalkOutcome::Invalid
                }
            };

            match child_outcome {
                WalkOutcome::Invalid => return Ok(WalkOutcome::Invalid),
                WalkOutcome::Matched(d) => {
                    if matched.is_some() {
                        // Proof structure claims two disclosures at one level.
                        return Ok(WalkOutcome::Invalid);
                    }
                    matched = Some(d);
                }
                WalkOutcome::NoMatch => {}
            }
        }

        current_path.pop();
    }

    let matched = match matched {
        Some(d) => d,
        None => return Ok(WalkOutcome::NoMatch),
    };

    let level = match proof.hashes.get(*level_cursor) {
        Some(l) => l,
        None => return Ok(WalkOutcome::Invalid),
    };
    *level_cursor += 1;

    let mut children = Vec::with_capacity(level.before.len() + 1 + level.after.len());
    for h in &level.before {
        children.push(decode_digest(h, current_path.as_slice())?);
    }
    children.push(matched);
    for h in &level.after {
        children.push(decode_digest(h, current_path.as_slice())?);
    }

    Ok(WalkOutcome::Matched(hash_node(&children)))
}
