//! In-memory values produced by decoding and consumed by encoding.

use crate::model::StructValue;

/// A decoded XDR value.
///
/// Values are untyped on their own; the codec they are decoded with or
/// encoded through decides whether a given variant is acceptable.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value: an empty optional, or a struct field that was never set.
    #[default]
    Absent,
    Bool(bool),
    /// 32-bit signed `int`.
    Int(i32),
    /// 32-bit `unsigned int`.
    UnsignedInt(u32),
    /// 64-bit signed `hyper`.
    Hyper(i64),
    /// 64-bit `unsigned hyper`.
    UnsignedHyper(u64),
    String(String),
    /// Fixed or variable-length opaque data.
    Opaque(Vec<u8>),
    /// Elements of a fixed or variable-length array.
    Array(Vec<Value>),
    Struct(StructValue),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UnsignedInt(_) => "unsigned int",
            Value::Hyper(_) => "hyper",
            Value::UnsignedHyper(_) => "unsigned hyper",
            Value::String(_) => "string",
            Value::Opaque(_) => "opaque",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }

    /// Returns true for the absent sentinel.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_unsigned_int(&self) -> Option<u32> {
        match self {
            Value::UnsignedInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_hyper(&self) -> Option<i64> {
        match self {
            Value::Hyper(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_unsigned_hyper(&self) -> Option<u64> {
        match self {
            Value::UnsignedHyper(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&[u8]> {
        match self {
            Value::Opaque(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UnsignedInt(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Hyper(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UnsignedHyper(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Opaque(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Value::Struct(v)
    }
}

/// `None` becomes [`Value::Absent`], so optionals encode as not present.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Absent);
        assert_eq!(Value::from(Some(7i32)), Value::Int(7));
        assert!(Value::default().is_absent());
    }

    #[test]
    fn test_accessors_are_strict() {
        let v = Value::from(5u32);
        assert_eq!(v.as_unsigned_int(), Some(5));
        assert_eq!(v.as_int(), None);
        assert_eq!(v.kind(), "unsigned int");
    }
}
