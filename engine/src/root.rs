//! The 32-byte Merkle commitment over a record's values and salts. Pure —
//! reads but never mutates the record.

use crate::canonical::canonicalize_primitive;
use crate::compat::{String, Vec};
use crate::error::{EngineError, ErrorKind};
use crate::hash::{hash_leaf, hash_node, Digest};
use crate::limits::{MAX_PATH_DEPTH, MAX_PROPERTIES_PER_CLASS};
use crate::record::TypedRecord;
use crate::schema::{PropertyKind, SchemaProvider};
use crate::value::Value;

/// Compute the root digest of `record`, hex-encoded (64 lowercase hex
/// characters).
pub fn root(schema: &impl SchemaProvider, record: &TypedRecord) -> Result<String, EngineError> {
    let mut path = Vec::new();
    let digest = node_digest(schema, record, &mut path)?;
    Ok(hex::encode(digest))
}

/// Compute the node digest of one record (not hex-encoded) — used
/// internally and by the proof engine's no-match primitive branch.
pub(crate) fn node_digest(
    schema: &impl SchemaProvider,
    record: &TypedRecord,
    path: &mut Vec<String>,
) -> Result<Digest, EngineError> {
    let properties = schema
        .properties(record.type_name())
        .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, path))?;

    if properties.len() > MAX_PROPERTIES_PER_CLASS {
        return Err(EngineError::at(ErrorKind::TypeMismatch, path));
    }

    let mut children = Vec::with_capacity(properties.len());

    for property in properties {
        if path.len() >= MAX_PATH_DEPTH {
            return Err(EngineError::at(ErrorKind::PathInvalid, path));
        }
        path.push(property.name.clone());

        let digest = match &property.kind {
            PropertyKind::Primitive(ty) => {
                let value = record
                    .get(&property.name)
                    .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, path))?;
                let salt = record
                    .get_salt(&property.name)
                    .ok_or_else(|| EngineError::at(ErrorKind::SaltMissing, path))?;
                let canonical = canonicalize_primitive(value, *ty)
                    .map_err(|e| EngineError::at(e.kind, path))?;
                hash_leaf(&canonical, salt)
            }
            PropertyKind::NestedClass(declared_class) => match record.get(&property.name) {
                Some(Value::NestedRecord(inner)) => {
                    if inner.type_name() != declared_class.as_str() {
                        return Err(EngineError::at(ErrorKind::TypeMismatch, path));
                    }
                    node_digest(schema, inner, path)?
                }
                _ => return Err(EngineError::at(ErrorKind::TypeMismatch, path)),
            },
            PropertyKind::Array | PropertyKind::Enum | PropertyKind::Relationship => {
                return Err(EngineError::at(ErrorKind::NotImplemented, path));
            }
        };

        children.push(digest);
        path.pop();
    }

    Ok(hash_node(&children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassRegistry, PrimitiveType, Property};

    #[test]
    fn root_is_deterministic() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Thing", vec![Property::primitive("name", PrimitiveType::String)]);
        let mut record = TypedRecord::new("ns.Thing").with_value("name", Value::String("alice".into()));
        record.set_salt("name", [0u8; 32]);

        let r1 = root(&schema, &record).unwrap();
        let r2 = root(&schema, &record).unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r1.len(), 64);
    }

    #[test]
    fn s1_single_primitive_class_literal_vector() {
        let mut schema = ClassRegistry::new();
        schema.declare("org.test.Thing", vec![Property::primitive("name", PrimitiveType::String)]);
        let mut record =
            TypedRecord::new("org.test.Thing").with_value("name", Value::String("alice".into()));
        record.set_salt("name", [0u8; 32]);

        let got = root(&schema, &record).unwrap();

        let leaf = crate::hash::hash_leaf(br#""alice""#, &[0u8; 32]);
        let expected_digest = crate::hash::hash_node(&[leaf]);
        assert_eq!(got, hex::encode(expected_digest));
    }

    #[test]
    fn s4_nested_class_literal_vector() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Inner", vec![Property::primitive("k", PrimitiveType::String)]);
        schema.declare("ns.Outer", vec![Property::nested("inner", "ns.Inner")]);

        let mut inner = TypedRecord::new("ns.Inner").with_value("k", Value::String("v".into()));
        inner.set_salt("k", [9u8; 32]);
        let outer = TypedRecord::new("ns.Outer").with_value("inner", Value::nested(inner));

        let got = root(&schema, &outer).unwrap();

        let leaf = crate::hash::hash_leaf(br#""v""#, &[9u8; 32]);
        let inner_root = crate::hash::hash_node(&[leaf]);
        let expected = crate::hash::hash_node(&[inner_root]);
        assert_eq!(got, hex::encode(expected));
    }

    #[test]
    fn order_sensitivity_property_8() {
        let mut schema_ab = ClassRegistry::new();
        schema_ab.declare(
            "ns.Pair",
            vec![
                Property::primitive("a", PrimitiveType::Integer),
                Property::primitive("b", PrimitiveType::Integer),
            ],
        );
        let mut schema_ba = ClassRegistry::new();
        schema_ba.declare(
            "ns.Pair",
            vec![
                Property::primitive("b", PrimitiveType::Integer),
                Property::primitive("a", PrimitiveType::Integer),
            ],
        );

        let mut record = TypedRecord::new("ns.Pair")
            .with_value("a", Value::Integer(1))
            .with_value("b", Value::Integer(2));
        record.set_salt("a", [1u8; 32]);
        record.set_salt("b", [2u8; 32]);

        let root_ab = root(&schema_ab, &record).unwrap();
        let root_ba = root(&schema_ba, &record).unwrap();
        assert_ne!(root_ab, root_ba);
    }

    #[test]
    fn missing_salt_is_salt_missing_error() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Thing", vec![Property::primitive("name", PrimitiveType::String)]);
        let record = TypedRecord::new("ns.Thing").with_value("name", Value::String("alice".into()));

        let err = root(&schema, &record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SaltMissing);
    }

    #[test]
    fn array_field_is_not_implemented() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Tagged", vec![Property::array("tags")]);
        let record = TypedRecord::new("ns.Tagged").with_value("tags", Value::Array);

        let err = root(&schema, &record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotImplemented);
    }

    #[test]
    fn nested_value_of_a_different_known_class_is_type_mismatch() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Inner", vec![Property::primitive("k", PrimitiveType::String)]);
        schema.declare("ns.Impostor", vec![Property::primitive("k", PrimitiveType::String)]);
        schema.declare("ns.Outer", vec![Property::nested("inner", "ns.Inner")]);

        // The self-reported class of the nested value resolves to a different
        // class this schema also knows about, not merely an unknown one — the
        // declared shape must still win, not the value's own claim.
        let mut impostor =
            TypedRecord::new("ns.Impostor").with_value("k", Value::String("v".into()));
        impostor.set_salt("k", [0u8; 32]);
        let outer = TypedRecord::new("ns.Outer").with_value("inner", Value::nested(impostor));

        let err = root(&schema, &outer).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.path, vec![String::from("inner")]);
    }
}
