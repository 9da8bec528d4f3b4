//! Leaf codecs: fixed-width numbers, bools, strings and opaque data.
//!
//! None of these recurse, so they ignore the depth budget.

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Mismatch, ValidationError};
use crate::model::Value;

/// A non-recursive XDR type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int,
    UnsignedInt,
    Hyper,
    UnsignedHyper,
    Bool,
    /// `string<max_len>`, UTF-8 on the Rust side.
    String { max_len: u32 },
    /// `opaque[len]`
    Opaque { len: u32 },
    /// `opaque<max_len>`
    VarOpaque { max_len: u32 },
}

impl Scalar {
    /// XDR name of the type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Int => "int",
            Scalar::UnsignedInt => "unsigned int",
            Scalar::Hyper => "hyper",
            Scalar::UnsignedHyper => "unsigned hyper",
            Scalar::Bool => "bool",
            Scalar::String { .. } => "string",
            Scalar::Opaque { .. } | Scalar::VarOpaque { .. } => "opaque",
        }
    }

    pub fn decode(&self, reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
        let value = match *self {
            Scalar::Int => Value::Int(reader.read_i32("int")?),
            Scalar::UnsignedInt => Value::UnsignedInt(reader.read_u32("unsigned int")?),
            Scalar::Hyper => Value::Hyper(reader.read_i64("hyper")?),
            Scalar::UnsignedHyper => Value::UnsignedHyper(reader.read_u64("unsigned hyper")?),
            Scalar::Bool => Value::Bool(reader.read_bool("bool")?),
            Scalar::String { max_len } => {
                let bytes = reader.read_var_opaque(max_len, "string")?;
                // Validate UTF-8 on the borrowed slice, then allocate once
                let s = std::str::from_utf8(bytes)
                    .map_err(|_| DecodeError::InvalidUtf8 { field: "string" })?;
                Value::String(s.to_string())
            }
            Scalar::Opaque { len } => {
                Value::Opaque(reader.read_padded(len as usize, "opaque")?.to_vec())
            }
            Scalar::VarOpaque { max_len } => {
                Value::Opaque(reader.read_var_opaque(max_len, "opaque")?.to_vec())
            }
        };
        Ok(value)
    }

    pub fn encode(&self, value: &Value, writer: &mut Writer) -> Result<(), EncodeError> {
        self.check(value).map_err(|err| self.encode_error(err.mismatch))?;
        match value {
            Value::Int(v) => writer.write_i32(*v),
            Value::UnsignedInt(v) => writer.write_u32(*v),
            Value::Hyper(v) => writer.write_i64(*v),
            Value::UnsignedHyper(v) => writer.write_u64(*v),
            Value::Bool(v) => writer.write_bool(*v),
            Value::String(s) => writer.write_var_opaque(s.as_bytes()),
            Value::Opaque(bytes) => match self {
                Scalar::Opaque { .. } => writer.write_padded(bytes),
                _ => writer.write_var_opaque(bytes),
            },
            // check() only admits the variants above
            Value::Absent | Value::Array(_) | Value::Struct(_) => {
                return Err(self.type_mismatch(value));
            }
        }
        Ok(())
    }

    pub fn validate(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let (len, max) = match (self, value) {
            (Scalar::Int, Value::Int(_))
            | (Scalar::UnsignedInt, Value::UnsignedInt(_))
            | (Scalar::Hyper, Value::Hyper(_))
            | (Scalar::UnsignedHyper, Value::UnsignedHyper(_))
            | (Scalar::Bool, Value::Bool(_)) => return Ok(()),
            (Scalar::String { max_len }, Value::String(s)) => (s.len(), *max_len),
            (Scalar::VarOpaque { max_len }, Value::Opaque(b)) => (b.len(), *max_len),
            (Scalar::Opaque { len }, Value::Opaque(b)) => {
                if b.len() != *len as usize {
                    return Err(ValidationError::new(Mismatch::Length {
                        len: b.len(),
                        expected: *len as usize,
                    }));
                }
                return Ok(());
            }
            _ => {
                return Err(ValidationError::new(Mismatch::Type {
                    expected: self.type_name(),
                    found: value.kind(),
                }));
            }
        };
        if len > max as usize {
            return Err(ValidationError::new(Mismatch::TooLong {
                len,
                max: max as usize,
            }));
        }
        Ok(())
    }

    fn type_mismatch(&self, value: &Value) -> EncodeError {
        EncodeError::TypeMismatch {
            expected: self.type_name(),
            found: value.kind(),
        }
    }

    fn encode_error(&self, mismatch: Mismatch) -> EncodeError {
        match mismatch {
            Mismatch::Length { len, expected } => EncodeError::LengthMismatch { len, expected },
            Mismatch::TooLong { len, max } => EncodeError::LengthExceedsLimit {
                field: self.type_name(),
                len,
                max,
            },
            Mismatch::Type { expected, found } => EncodeError::TypeMismatch { expected, found },
            other => EncodeError::InvalidStruct {
                expected: self.type_name().to_string(),
                source: ValidationError::new(other),
            },
        }
    }
}
