//! Validation with diagnostics.
//!
//! Every codec has a `validate` method answering yes or no. The functions
//! here answer the same question but say where and why a value fails.

use crate::codec::Codec;
use crate::error::{Mismatch, ValidationError};
use crate::model::{StructValue, Value};
use crate::schema::StructSchema;

/// Checks `value` against `codec`.
///
/// Returns `Ok(())` exactly when `codec.validate(value)` is true.
pub fn validate_value(codec: &Codec, value: &Value) -> Result<(), ValidationError> {
    codec.check(value)
}

/// Structural check for an untagged instance: it must hold exactly the
/// schema's fields, and each field value must be valid for its codec.
pub fn structurally_compatible(
    schema: &StructSchema,
    instance: &StructValue,
) -> Result<(), ValidationError> {
    let same_fields = instance.len() == schema.fields().len()
        && schema.fields().iter().all(|f| instance.get(f.name()).is_some());
    if !same_fields {
        return Err(ValidationError::new(Mismatch::Fields {
            expected: schema.fields().iter().map(|f| f.name().to_string()).collect(),
            found: instance.field_names().map(str::to_string).collect(),
        }));
    }

    for field in schema.fields() {
        if let Some(value) = instance.get(field.name()) {
            field
                .codec()
                .check(value)
                .map_err(|err| err.at_field(field.name()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Registry;

    fn range_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .create(
                "MyRange",
                [
                    ("begin", Codec::INT),
                    ("end", Codec::INT),
                    ("inclusive", Codec::BOOL),
                ],
            )
            .unwrap();
        registry
    }

    fn untagged(fields: Vec<(&str, Value)>) -> Value {
        Value::Struct(StructValue::untagged(fields))
    }

    #[test]
    fn test_untagged_structural_match() {
        let registry = range_registry();
        let range = registry.get("MyRange").unwrap();

        let value = untagged(vec![
            ("inclusive", Value::Bool(true)),
            ("begin", Value::Int(1)),
            ("end", Value::Int(2)),
        ]);
        assert!(range.validate(&value));
        assert_eq!(
            Codec::from(range).to_xdr(&value).unwrap(),
            [0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_untagged_field_set_mismatch() {
        let registry = range_registry();
        let range = Codec::from(registry.get("MyRange").unwrap());

        let missing = untagged(vec![("begin", Value::Int(1)), ("end", Value::Int(2))]);
        let err = validate_value(&range, &missing).unwrap_err();
        assert!(err.path.is_empty());
        assert!(matches!(err.mismatch, Mismatch::Fields { .. }));

        let extra = untagged(vec![
            ("begin", Value::Int(1)),
            ("end", Value::Int(2)),
            ("inclusive", Value::Bool(true)),
            ("step", Value::Int(1)),
        ]);
        assert!(!range.validate(&extra));
    }

    #[test]
    fn test_untagged_bad_field_value() {
        let registry = range_registry();
        let range = Codec::from(registry.get("MyRange").unwrap());

        let value = untagged(vec![
            ("begin", Value::Int(1)),
            ("end", Value::from("two")),
            ("inclusive", Value::Bool(true)),
        ]);
        let err = validate_value(&range, &value).unwrap_err();
        assert_eq!(err.path, "end");
        assert_eq!(err.to_string(), "end: expected int, found string");
    }

    #[test]
    fn test_path_through_arrays() {
        let registry = range_registry();
        let ranges = Codec::var_array(Codec::from(registry.get("MyRange").unwrap()), 8);

        let good = untagged(vec![
            ("begin", Value::Int(1)),
            ("end", Value::Int(2)),
            ("inclusive", Value::Bool(false)),
        ]);
        let bad = untagged(vec![
            ("begin", Value::Absent),
            ("end", Value::Int(2)),
            ("inclusive", Value::Bool(false)),
        ]);
        let value = Value::Array(vec![good.clone(), good, bad]);

        let err = validate_value(&ranges, &value).unwrap_err();
        assert_eq!(err.path, "[2].begin");
        assert_eq!(err.to_string(), "[2].begin: expected int, found absent");
        assert!(!ranges.validate(&value));
    }

    #[test]
    fn test_agrees_with_validate() {
        let codec = Codec::option(Codec::array(Codec::UNSIGNED_HYPER, 2));
        let values = [
            Value::Absent,
            Value::Array(vec![Value::UnsignedHyper(1), Value::UnsignedHyper(2)]),
            Value::Array(vec![Value::UnsignedHyper(1)]),
            Value::Array(vec![Value::Hyper(1), Value::UnsignedHyper(2)]),
            Value::Bool(true),
        ];
        for value in &values {
            assert_eq!(validate_value(&codec, value).is_ok(), codec.validate(value));
        }
    }
}
