//! Struct instances: an owned field-name to value map plus the name of the
//! schema that produced it.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::SchemaError;
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::model::Value;

/// A value of some struct schema.
///
/// Instances created by a [`StructSchema`](crate::StructSchema) (by decoding
/// or through [`StructSchema::instance`](crate::StructSchema::instance)) carry
/// that schema's name as a tag. [`StructValue::untagged`] builds one without a
/// schema; such values are accepted by any schema whose fields they match.
#[derive(Clone)]
pub struct StructValue {
    name: Option<Arc<str>>,
    layout: Arc<[Arc<str>]>,
    values: FxHashMap<Arc<str>, Value>,
    max_depth: u32,
}

impl StructValue {
    pub(crate) fn tagged(
        name: Arc<str>,
        layout: Arc<[Arc<str>]>,
        values: FxHashMap<Arc<str>, Value>,
        max_depth: u32,
    ) -> Self {
        Self {
            name: Some(name),
            layout,
            values,
            max_depth,
        }
    }

    /// Builds an instance without a schema tag. Later duplicates of a field
    /// name overwrite earlier ones.
    pub fn untagged<N, I>(fields: I) -> Self
    where
        N: Into<Arc<str>>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let mut layout = Vec::new();
        let mut values = FxHashMap::default();
        for (name, value) in fields {
            let name = name.into();
            if values.insert(name.clone(), value).is_none() {
                layout.push(name);
            }
        }
        Self {
            name: None,
            layout: layout.into(),
            values,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Name of the schema this instance belongs to, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns the stored value of `field`, or `None` if no such field exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.values.get_mut(field)
    }

    /// Stores `value` in `field` and returns the stored value.
    ///
    /// No type checking happens here; a mismatched value is reported when the
    /// instance is validated or encoded.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&Value, SchemaError> {
        let Self { name, values, .. } = self;
        match values.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                Ok(slot)
            }
            None => Err(SchemaError::UnknownField {
                schema: display_name(name.as_deref()).to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layout.iter().map(|name| &**name)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.layout
            .iter()
            .filter_map(|name| self.values.get(name).map(|value| (&**name, value)))
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }
}

fn display_name(name: Option<&str>) -> &str {
    name.unwrap_or("<untagged struct>")
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(display_name(self.name()));
        for (name, value) in self.fields() {
            out.field(name, value);
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_layout() {
        let value = StructValue::untagged([
            ("begin", Value::Int(1)),
            ("end", Value::Int(2)),
            ("begin", Value::Int(3)),
        ]);
        assert_eq!(value.name(), None);
        assert_eq!(value.field_names().collect::<Vec<_>>(), ["begin", "end"]);
        assert_eq!(value.get("begin"), Some(&Value::Int(3)));
        assert_eq!(value.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_set_unknown_field() {
        let mut value = StructValue::untagged([("a", Value::Bool(true))]);
        let err = value.set("b", 1i32).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { ref field, .. } if field == "b"));
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn test_debug_in_declared_order() {
        let value = StructValue::untagged([("z", Value::Int(1)), ("a", Value::Absent)]);
        let rendered = format!("{:?}", value);
        assert!(rendered.find("z").unwrap() < rendered.find("a:").unwrap());
    }
}
