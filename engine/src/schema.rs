//! The schema-introspection contract consumed by the engine.
//!
//! This is the narrow read-only interface the surrounding schema compiler,
//! parser, and code-generators are required to satisfy — everything else
//! about a class declaration (super-types, imports, identifiers, whether it
//! is a transaction or event) is invisible here. Only the ordered property
//! list matters, and that order is part of the hash contract: reordering
//! properties changes the root.

use crate::compat::{String, Vec};

/// One of the primitive scalar types a `Field` may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Boolean,
    Double,
    Long,
    Integer,
    DateTime,
}

/// What a declared property is, from the engine's point of view.
///
/// `Array`, `Enum`, and `Relationship` are reserved extension points: every
/// engine keeps these as an explicit error arm rather than guessing at
/// semantics for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Primitive(PrimitiveType),
    NestedClass(String),
    Array,
    Enum,
    Relationship,
}

/// One declared property of a class, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
}

impl Property {
    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Primitive(ty),
        }
    }

    pub fn nested(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::NestedClass(class_name.into()),
        }
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Array,
        }
    }

    pub fn enum_(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Enum,
        }
    }

    pub fn relationship(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Relationship,
        }
    }
}

/// The schema-introspection interface consumed by the core.
///
/// For any fully-qualified class name, the engine needs only the ordered
/// list of that class's OWN properties. Implementations must return
/// properties in declaration order — the engine never sorts or otherwise
/// reorders them, since declaration order is the authoritative hash input
/// order.
pub trait SchemaProvider {
    /// Own properties of `class_name`, in declaration order, or `None` if
    /// the class is not known to this provider.
    fn properties(&self, class_name: &str) -> Option<&[Property]>;
}

/// A minimal in-memory [`SchemaProvider`] for tests and small embedders that
/// do not already have their own schema compiler's introspection surface.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: crate::compat::BTreeMap<String, Vec<Property>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self {
            classes: crate::compat::BTreeMap::new(),
        }
    }

    pub fn declare(&mut self, class_name: impl Into<String>, properties: Vec<Property>) -> &mut Self {
        self.classes.insert(class_name.into(), properties);
        self
    }
}

impl SchemaProvider for ClassRegistry {
    fn properties(&self, class_name: &str) -> Option<&[Property]> {
        self.classes.get(class_name).map(Vec::as_slice)
    }
}
