//! Discloses exactly one primitive leaf at a given path, together with the
//! sibling digests needed to recompute the root without the rest of the
//! record.
//!
//! The walk first builds a *raw* tree-shaped structure (`RawNode`) that
//! mixes plain digests for non-disclosed subtrees with at most one
//! non-digest entry — the disclosure itself, or a nested raw structure
//! containing it — at every level. A second pass flattens that raw
//! structure into the public `before`/`after` proof format, leaf-first.

use crate::canonical::canonicalize_primitive;
use crate::compat::{String, Vec};
use crate::error::{EngineError, ErrorKind};
use crate::hash::{hash_leaf, hash_node, Digest};
use crate::limits::{MAX_PATH_DEPTH, MAX_PROPERTIES_PER_CLASS};
use crate::record::TypedRecord;
use crate::schema::{PropertyKind, SchemaProvider};
use crate::value::Value;

/// One level of the flattened proof: sibling digests before and after the
/// disclosed subtree, in declaration order, hex-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofLevel {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// A disclosure of one leaf's value and salt, plus the sibling digests at
/// every enclosing level, ordered leaf-first-to-root.
#[derive(Debug, Clone, PartialEq)]
pub struct Proof {
    pub value: Value,
    /// Lowercase hex encoding of the leaf's 32-byte salt.
    pub salt: String,
    pub hashes: Vec<ProofLevel>,
}

/// The un-flattened result of one node's walk: a mix of plain digests with
/// at most one entry somewhere in the list that is not a plain digest.
enum RawNode {
    Digest(Digest),
    Disclosed { value: Value, salt: String },
    Nested(Vec<RawNode>),
}

/// Build a proof disclosing the primitive leaf at `path`.
pub fn proof(
    schema: &impl SchemaProvider,
    record: &TypedRecord,
    path: &[&str],
) -> Result<Proof, EngineError> {
    if path.is_empty() {
        return Err(EngineError::new(ErrorKind::PathInvalid, Vec::new()));
    }

    let mut current_path = Vec::new();
    let raw = walk(schema, record, path, &mut current_path)?;

    let mut hashes = Vec::new();
    let (value, salt) = flatten(raw, &mut hashes)
        .ok_or_else(|| EngineError::new(ErrorKind::PathInvalid, path_owned(path)))?;

    Ok(Proof { value, salt, hashes })
}

fn path_owned(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| String::from(*s)).collect()
}

fn walk(
    schema: &impl SchemaProvider,
    record: &TypedRecord,
    target: &[&str],
    current_path: &mut Vec<String>,
) -> Result<RawNode, EngineError> {
    let properties = schema
        .properties(record.type_name())
        .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, current_path))?;

    if properties.len() > MAX_PROPERTIES_PER_CLASS {
        return Err(EngineError::at(ErrorKind::TypeMismatch, current_path));
    }

    let mut children = Vec::with_capacity(properties.len());

    for property in properties {
        if current_path.len() >= MAX_PATH_DEPTH {
            return Err(EngineError::at(ErrorKind::PathInvalid, current_path));
        }
        current_path.push(property.name.clone());

        let at_this_level = current_path.len() <= target.len()
            && current_path
                .iter()
                .zip(target.iter())
                .all(|(a, b)| a.as_str() == *b);

        let node = if at_this_level {
            match &property.kind {
                PropertyKind::Primitive(ty) => {
                    if current_path.len() != target.len() {
                        return Err(EngineError::at(ErrorKind::PathInvalid, current_path));
                    }
                    let value = record
                        .get(&property.name)
                        .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, current_path))?;
                    // value must canonicalise cleanly even though it is not hashed,
                    // so a malformed disclosed value is still caught here.
                    canonicalize_primitive(value, *ty)
                        .map_err(|e| EngineError::at(e.kind, current_path))?;
                    let salt = record
                        .get_salt(&property.name)
                        .ok_or_else(|| EngineError::at(ErrorKind::SaltMissing, current_path))?;
                    RawNode::Disclosed {
                        value: value.clone(),
                        salt: hex::encode(salt),
                    }
                }
                PropertyKind::NestedClass(declared_class) => match record.get(&property.name) {
                    Some(Value::NestedRecord(inner)) => {
                        if inner.type_name() != declared_class.as_str() {
                            return Err(EngineError::at(ErrorKind::TypeMismatch, current_path));
                        }
                        walk(schema, inner, target, current_path)?
                    }
                    _ => return Err(EngineError::at(ErrorKind::TypeMismatch, current_path)),
                },
                PropertyKind::Array | PropertyKind::Enum | PropertyKind::Relationship => {
                    return Err(EngineError::at(ErrorKind::NotImplemented, current_path));
                }
            }
        } else {
            RawNode::Digest(digest_of(schema, record, property, current_path)?)
        };

        children.push(node);
        current_path.pop();
    }

    Ok(RawNode::Nested(children))
}

/// Compute the plain digest of a non-disclosed property, mirroring the root
/// engine's per-child hashing exactly.
fn digest_of(
    schema: &impl SchemaProvider,
    record: &TypedRecord,
    property: &crate::schema::Property,
    path: &mut Vec<String>,
) -> Result<Digest, EngineError> {
    match &property.kind {
        PropertyKind::Primitive(ty) => {
            let value = record
                .get(&property.name)
                .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, path))?;
            let salt = record
                .get_salt(&property.name)
                .ok_or_else(|| EngineError::at(ErrorKind::SaltMissing, path))?;
            let canonical =
                canonicalize_primitive(value, *ty).map_err(|e| EngineError::at(e.kind, path))?;
            Ok(hash_leaf(&canonical, salt))
        }
        PropertyKind::NestedClass(declared_class) => match record.get(&property.name) {
            Some(Value::NestedRecord(inner)) => {
                if inner.type_name() != declared_class.as_str() {
                    return Err(EngineError::at(ErrorKind::TypeMismatch, path));
                }
                crate::root::node_digest(schema, inner, path)
            }
            _ => Err(EngineError::at(ErrorKind::TypeMismatch, path)),
        },
        PropertyKind::Array | PropertyKind::Enum | PropertyKind::Relationship => {
            Err(EngineError::at(ErrorKind::NotImplemented, path))
        }
    }
}

/// Flatten the raw tree into the public leaf-first `hashes` sequence.
/// Returns `None` if no disclosure was ever found (an invalid path that
/// slipped past the walk, e.g. one addressing an intermediate nested class
/// rather than a primitive leaf).
fn flatten(node: RawNode, hashes: &mut Vec<ProofLevel>) -> Option<(Value, String)> {
    match node {
        RawNode::Disclosed { value, salt } => Some((value, salt)),
        RawNode::Digest(_) => None,
        RawNode::Nested(children) => {
            let split = children.iter().position(|c| !matches!(c, RawNode::Digest(_)))?;

            let before: Vec<String> = children[..split]
                .iter()
                .map(|c| match c {
                    RawNode::Digest(d) => hex::encode(d),
                    _ => unreachable!("split index guarantees only digests precede it"),
                })
                .collect();
            let after: Vec<String> = children[split + 1..]
                .iter()
                .map(|c| match c {
                    RawNode::Digest(d) => hex::encode(d),
                    _ => unreachable!("only the entry at `split` may be non-digest"),
                })
                .collect();

            let mut children = children;
            let disclosing = children.remove(split);
            let result = flatten(disclosing, hashes)?;
            hashes.push(ProofLevel { before, after });
            Some(result)
        }
    }
}
