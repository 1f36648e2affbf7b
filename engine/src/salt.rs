//! Assigns a fresh 32-byte random salt to every primitive leaf reachable
//! from a record, writing each salt into the owning record's own salt
//! store.
//!
//! The walk is a depth-first traversal of the class declaration's own
//! properties, in declaration order — the same shape the root, proof, and
//! verify walks share. Each walk is its own recursive-function skeleton
//! rather than one shared higher-order walker, since each emits a
//! structurally different result and Rust's type system makes a literal
//! shared walker awkward to read; what *is* shared is the traversal order
//! and the path-stack discipline.

use crate::compat::{String, Vec};
use crate::error::{EngineError, ErrorKind};
use crate::limits::{DIGEST_BYTES, MAX_PATH_DEPTH, MAX_PROPERTIES_PER_CLASS};
use crate::record::{Salt, TypedRecord};
use crate::schema::{PropertyKind, SchemaProvider};
use crate::value::Value;

/// Draw `DIGEST_BYTES` of cryptographically secure randomness.
///
/// Surfaces `RandomnessUnavailable` if the host CSPRNG source fails.
fn draw_salt(path: &[String]) -> Result<Salt, EngineError> {
    let mut salt = [0u8; DIGEST_BYTES];
    getrandom::fill(&mut salt)
        .map_err(|_| EngineError::at(ErrorKind::RandomnessUnavailable, path))?;
    Ok(salt)
}

/// Populate `record`'s salt store (and every nested record's own salt
/// store) in place.
///
/// On error the record's salt stores are left in an unspecified partial
/// state — callers must discard the record.
pub fn salt(schema: &impl SchemaProvider, record: &mut TypedRecord) -> Result<(), EngineError> {
    let mut path = Vec::new();
    walk(schema, record, &mut path)
}

fn walk(
    schema: &impl SchemaProvider,
    record: &mut TypedRecord,
    path: &mut Vec<String>,
) -> Result<(), EngineError> {
    let properties = schema
        .properties(record.type_name())
        .ok_or_else(|| EngineError::at(ErrorKind::TypeMismatch, path))?
        .to_vec();

    if properties.len() > MAX_PROPERTIES_PER_CLASS {
        return Err(EngineError::at(ErrorKind::TypeMismatch, path));
    }

    for property in &properties {
        if path.len() >= MAX_PATH_DEPTH {
            return Err(EngineError::at(ErrorKind::PathInvalid, path));
        }
        path.push(property.name.clone());

        match &property.kind {
            PropertyKind::Primitive(_) => {
                let has_value = record.get(&property.name).is_some();
                if !has_value {
                    return Err(EngineError::at(ErrorKind::TypeMismatch, path));
                }
                let fresh = draw_salt(path)?;
                record.set_salt(property.name.clone(), fresh);
            }
            PropertyKind::NestedClass(declared_class) => {
                let nested = record.get_mut(&property.name);
                match nested {
                    Some(Value::NestedRecord(inner)) => {
                        if inner.type_name() != declared_class.as_str() {
                            return Err(EngineError::at(ErrorKind::TypeMismatch, path));
                        }
                        walk(schema, inner, path)?;
                    }
                    _ => return Err(EngineError::at(ErrorKind::TypeMismatch, path)),
                }
            }
            PropertyKind::Array | PropertyKind::Enum | PropertyKind::Relationship => {
                return Err(EngineError::at(ErrorKind::NotImplemented, path));
            }
        }

        path.pop();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassRegistry, Property, PrimitiveType};

    fn thing_schema() -> ClassRegistry {
        let mut reg = ClassRegistry::new();
        reg.declare("ns.Thing", vec![Property::primitive("name", PrimitiveType::String)]);
        reg
    }

    #[test]
    fn salts_every_primitive_leaf() {
        let schema = thing_schema();
        let mut record = TypedRecord::new("ns.Thing").with_value("name", Value::String("alice".into()));
        salt(&schema, &mut record).unwrap();
        assert_eq!(record.get_salt("name").unwrap().len(), DIGEST_BYTES);
    }

    #[test]
    fn salts_are_fresh_each_call() {
        let schema = thing_schema();
        let mut seen = alloc_btreeset();
        for _ in 0..1000 {
            let mut record =
                TypedRecord::new("ns.Thing").with_value("name", Value::String("alice".into()));
            salt(&schema, &mut record).unwrap();
            let s = *record.get_salt("name").unwrap();
            assert!(seen.insert(s), "salt collision observed in 1000 draws");
        }
    }

    fn alloc_btreeset() -> crate::compat::BTreeSet<Salt> {
        crate::compat::BTreeSet::new()
    }

    #[test]
    fn recurses_into_nested_class_and_salts_its_own_store() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Inner", vec![Property::primitive("k", PrimitiveType::String)]);
        schema.declare("ns.Outer", vec![Property::nested("inner", "ns.Inner")]);

        let inner = TypedRecord::new("ns.Inner").with_value("k", Value::String("v".into()));
        let mut outer = TypedRecord::new("ns.Outer").with_value("inner", Value::nested(inner));

        salt(&schema, &mut outer).unwrap();

        let inner_val = outer.get("inner").unwrap().as_nested().unwrap();
        assert_eq!(inner_val.get_salt("k").unwrap().len(), DIGEST_BYTES);
        // Parent's own salt store is untouched by the nested field's salts.
        assert!(outer.get_salt("k").is_none());
    }

    #[test]
    fn nested_value_of_a_different_known_class_is_type_mismatch() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Inner", vec![Property::primitive("k", PrimitiveType::String)]);
        schema.declare("ns.Impostor", vec![Property::primitive("k", PrimitiveType::String)]);
        schema.declare("ns.Outer", vec![Property::nested("inner", "ns.Inner")]);

        // The value's own self-reported type is a class the schema does know
        // about — just not the one declared for this property.
        let impostor =
            TypedRecord::new("ns.Impostor").with_value("k", Value::String("v".into()));
        let mut outer = TypedRecord::new("ns.Outer").with_value("inner", Value::nested(impostor));

        let err = salt(&schema, &mut outer).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.path, vec![String::from("inner")]);
    }

    #[test]
    fn array_field_is_not_implemented() {
        let mut schema = ClassRegistry::new();
        schema.declare("ns.Tagged", vec![Property::array("tags")]);
        let mut record = TypedRecord::new("ns.Tagged").with_value("tags", Value::Array);

        let err = salt(&schema, &mut record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotImplemented);
        assert_eq!(err.path, vec![String::from("tags")]);
    }

    #[test]
    fn missing_value_for_declared_property_is_type_mismatch() {
        let schema = thing_schema();
        let mut record = TypedRecord::new("ns.Thing");
        let err = salt(&schema, &mut record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }
}
