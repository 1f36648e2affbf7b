//! Error taxonomy for the selective-disclosure engine.
//!
//! CONSTITUTIONAL RULE: errors abort the current engine call immediately.
//! No partial result is ever returned — see `lib.rs` invariant notes.
//!
//! Plain hand-rolled enum, no `thiserror`: this crate is a pure, no-I/O,
//! `no_std`-targetable component (see `compat.rs`), and its error type
//! follows the same zero-extra-dependency discipline the rest of the
//! engine holds itself to.

use crate::compat::{String, Vec};
use core::fmt;

/// The kind of failure, independent of where in the schema walk it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The walk encountered an array, enum, or relationship property.
    NotImplemented,
    /// A primitive leaf's salt was required but never generated.
    SaltMissing,
    /// The record's in-memory value disagrees with the schema's declared kind.
    TypeMismatch,
    /// The requested path does not resolve to a primitive leaf.
    PathInvalid,
    /// The CSPRNG source failed to produce salt bytes.
    RandomnessUnavailable,
    /// `verify` received a structurally invalid proof (bad hex, wrong lengths).
    MalformedProof,
}

/// An engine failure, carrying the schema path at which it occurred.
///
/// `path` is the property-name stack from the root class down to the point
/// of failure — essential for debugging proofs over deep records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub kind: ErrorKind,
    pub path: Vec<String>,
}

impl EngineError {
    pub fn new(kind: ErrorKind, path: Vec<String>) -> Self {
        Self { kind, path }
    }

    pub fn at(kind: ErrorKind, path: &[String]) -> Self {
        Self {
            kind,
            path: path.to_vec(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{:?} at {}", self.kind, self.path.join("."))
        }
    }
}

impl std::error::Error for EngineError {}
