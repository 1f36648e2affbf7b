//! Selective-disclosure Merkle engine.
//!
//! Four read-mostly traversal engines over a schema-typed record:
//!
//! - [`salt::salt`] assigns a fresh 32-byte random salt to every primitive
//!   leaf reachable from a record.
//! - [`root::root`] computes the record's 32-byte Merkle commitment.
//! - [`proof::proof`] discloses one primitive leaf's value and salt, plus
//!   the sibling digests needed to recompute the root.
//! - [`verify::verify`] recomputes a root from a proof and a schema shape
//!   alone, with no access to the original record.
//!
//! INVARIANTS:
//! 1. Property declaration order (from [`schema::SchemaProvider`]) is the
//!    sole source of hash-input ordering; implementations never iterate a
//!    hashed map to decide it.
//! 2. `root`, `proof`, and `verify` are pure — they read but never mutate
//!    the record or its salts. Only `salt` mutates, and only its own
//!    record's (and nested records') salt stores.
//! 3. Array, enum, and relationship properties are reserved extension
//!    points; every engine raises `NotImplemented` rather than guessing at
//!    semantics for them.
//! 4. There is no domain-separator byte and no length prefix between
//!    hashed children — this is a frozen on-wire contract, not a style
//!    choice.

pub mod canonical;
pub mod compat;
pub mod error;
pub mod hash;
pub mod limits;
pub mod proof;
pub mod record;
pub mod root;
pub mod salt;
pub mod schema;
pub mod value;
pub mod verify;

pub use error::{EngineError, ErrorKind};
pub use proof::{Proof, ProofLevel};
pub use record::{Salt, TypedRecord};
pub use schema::{ClassRegistry, PrimitiveType, Property, PropertyKind, SchemaProvider};
pub use value::Value;

pub use proof::proof as build_proof;
pub use root::root as compute_root;
pub use salt::salt as assign_salts;
pub use verify::verify as verify_proof;
