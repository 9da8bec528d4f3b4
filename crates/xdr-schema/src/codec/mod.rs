//! XDR codecs.
//!
//! A [`Codec`] is an immutable schema node. Leaves are [`Scalar`]s; the
//! composite kinds ([`FixedArray`], [`VarArray`], [`Optional`] and struct
//! schemas) recurse into children and share one depth budget per decode.

pub mod array;
pub mod depth;
pub mod option;
pub mod primitives;
pub mod scalar;
pub mod text;
pub mod var_array;

use std::sync::Arc;

pub use array::FixedArray;
pub use depth::{Depth, check_depth};
pub use option::Optional;
pub use primitives::{Reader, Writer, padding_for};
pub use scalar::Scalar;
pub use text::TextEncoding;
pub use var_array::VarArray;

use crate::error::{DecodeError, EncodeError, Mismatch, ValidationError};
use crate::limits::{DEFAULT_MAX_DEPTH, MAX_LENGTH};
use crate::model::Value;
use crate::schema::{Reference, StructRef, StructSchema};

/// Any XDR type this crate can encode, decode and validate.
#[derive(Debug, Clone)]
pub enum Codec {
    Scalar(Scalar),
    Array(FixedArray),
    VarArray(VarArray),
    Option(Optional),
    Struct(StructRef),
    /// A forward reference by schema name. Only meaningful inside a field
    /// declaration handed to [`Registry::create`](crate::Registry::create),
    /// which replaces it with the resolved schema.
    Reference(Reference),
}

impl Codec {
    pub const INT: Codec = Codec::Scalar(Scalar::Int);
    pub const UNSIGNED_INT: Codec = Codec::Scalar(Scalar::UnsignedInt);
    pub const HYPER: Codec = Codec::Scalar(Scalar::Hyper);
    pub const UNSIGNED_HYPER: Codec = Codec::Scalar(Scalar::UnsignedHyper);
    pub const BOOL: Codec = Codec::Scalar(Scalar::Bool);

    /// `string<max_len>`
    pub fn string(max_len: u32) -> Codec {
        Codec::Scalar(Scalar::String { max_len })
    }

    /// `opaque[len]`
    pub fn opaque(len: u32) -> Codec {
        Codec::Scalar(Scalar::Opaque { len })
    }

    /// `opaque<max_len>`
    pub fn var_opaque(max_len: u32) -> Codec {
        Codec::Scalar(Scalar::VarOpaque { max_len })
    }

    /// `T name[len]`
    pub fn array(child: Codec, len: u32) -> Codec {
        FixedArray::new(child, len).into()
    }

    /// `T name<max_len>`
    pub fn var_array(child: Codec, max_len: u32) -> Codec {
        VarArray::with_max_len(child, max_len).into()
    }

    /// `T name<>`
    pub fn unbounded_array(child: Codec) -> Codec {
        VarArray::with_max_len(child, MAX_LENGTH).into()
    }

    /// `T *name`
    pub fn option(child: Codec) -> Codec {
        Optional::new(child).into()
    }

    /// Forward reference to the struct schema registered under `name`.
    pub fn reference(name: &str) -> Codec {
        Codec::Reference(Reference::new(name))
    }

    /// Depth budget seeded when this codec is decoded as an entry point.
    pub fn max_depth(&self) -> u32 {
        match self {
            Codec::Array(a) => a.max_depth(),
            Codec::VarArray(a) => a.max_depth(),
            Codec::Option(o) => o.max_depth(),
            Codec::Struct(r) => r.schema().map_or(DEFAULT_MAX_DEPTH, |s| s.max_depth()),
            Codec::Scalar(_) | Codec::Reference(_) => DEFAULT_MAX_DEPTH,
        }
    }

    /// Decodes one value with a budget seeded from [`max_depth`](Self::max_depth).
    pub fn decode(&self, reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
        self.decode_at(reader, Depth::seeded(self.max_depth()))
    }

    /// Decodes one value with an explicit budget.
    pub fn decode_with_depth(
        &self,
        reader: &mut Reader<'_>,
        remaining_depth: i64,
    ) -> Result<Value, DecodeError> {
        self.decode_at(reader, Depth::new(remaining_depth))
    }

    /// Recursive form: composites call this on their children with the
    /// already decremented budget.
    pub(crate) fn decode_at(
        &self,
        reader: &mut Reader<'_>,
        depth: Depth,
    ) -> Result<Value, DecodeError> {
        match self {
            Codec::Scalar(s) => s.decode(reader),
            Codec::Array(a) => a.decode_at(reader, depth),
            Codec::VarArray(a) => a.decode_at(reader, depth),
            Codec::Option(o) => o.decode_at(reader, depth),
            Codec::Struct(r) => {
                let schema = r.schema().ok_or_else(|| DecodeError::UnresolvedReference {
                    name: r.name().to_string(),
                })?;
                schema.decode_at(reader, depth).map(Value::Struct)
            }
            Codec::Reference(r) => Err(DecodeError::UnresolvedReference {
                name: r.name().to_string(),
            }),
        }
    }

    pub fn encode(&self, value: &Value, writer: &mut Writer) -> Result<(), EncodeError> {
        match self {
            Codec::Scalar(s) => s.encode(value, writer),
            Codec::Array(a) => a.encode(value, writer),
            Codec::VarArray(a) => a.encode(value, writer),
            Codec::Option(o) => o.encode(value, writer),
            Codec::Struct(r) => {
                let schema = r.schema().ok_or_else(|| EncodeError::UnresolvedReference {
                    name: r.name().to_string(),
                })?;
                schema.encode(value, writer)
            }
            Codec::Reference(r) => Err(EncodeError::UnresolvedReference {
                name: r.name().to_string(),
            }),
        }
    }

    /// Returns true if `value` has the shape this codec encodes. Never fails.
    pub fn validate(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Codec::Scalar(s) => s.check(value),
            Codec::Array(a) => a.check(value),
            Codec::VarArray(a) => a.check(value),
            Codec::Option(o) => o.check(value),
            Codec::Struct(r) => match r.schema() {
                Some(schema) => schema.check(value),
                None => Err(ValidationError::new(Mismatch::DeadReference {
                    name: r.name().to_string(),
                })),
            },
            Codec::Reference(r) => Err(ValidationError::new(Mismatch::DeadReference {
                name: r.name().to_string(),
            })),
        }
    }

    // =========================================================================
    // WHOLE BUFFERS
    // =========================================================================

    /// Encodes `value` into a fresh buffer.
    pub fn to_xdr(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.encode(value, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decodes exactly one value from `input`; leftover bytes are an error.
    pub fn from_xdr(&self, input: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(input);
        let value = self.decode(&mut reader)?;
        if !reader.is_empty() {
            let count = reader.remaining_len();
            tracing::debug!(count, consumed = reader.position(), "trailing bytes after XDR value");
            return Err(DecodeError::TrailingBytes { count });
        }
        Ok(value)
    }

    /// Returns true if `input` is exactly one valid encoding of this codec.
    pub fn validate_xdr(&self, input: &[u8]) -> bool {
        self.from_xdr(input).is_ok()
    }

    pub fn to_xdr_text(
        &self,
        value: &Value,
        encoding: TextEncoding,
    ) -> Result<String, EncodeError> {
        Ok(encoding.encode(&self.to_xdr(value)?))
    }

    pub fn from_xdr_text(&self, text: &str, encoding: TextEncoding) -> Result<Value, DecodeError> {
        self.from_xdr(&encoding.decode(text)?)
    }

    /// Like [`validate_xdr`](Self::validate_xdr) for text input; malformed
    /// text is simply invalid.
    pub fn validate_xdr_text(&self, text: &str, encoding: TextEncoding) -> bool {
        self.from_xdr_text(text, encoding).is_ok()
    }
}

impl From<Scalar> for Codec {
    fn from(scalar: Scalar) -> Self {
        Codec::Scalar(scalar)
    }
}

impl From<StructRef> for Codec {
    fn from(r: StructRef) -> Self {
        Codec::Struct(r)
    }
}

impl From<Arc<StructSchema>> for Codec {
    fn from(schema: Arc<StructSchema>) -> Self {
        Codec::Struct(StructRef::from(schema))
    }
}

impl From<&Arc<StructSchema>> for Codec {
    fn from(schema: &Arc<StructSchema>) -> Self {
        Codec::Struct(StructRef::from(Arc::clone(schema)))
    }
}

impl From<Reference> for Codec {
    fn from(r: Reference) -> Self {
        Codec::Reference(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_xdr_rejects_trailing_bytes() {
        assert_eq!(Codec::INT.from_xdr(&[0, 0, 0, 7]).unwrap(), Value::Int(7));
        assert_eq!(
            Codec::INT.from_xdr(&[0, 0, 0, 7, 0]).unwrap_err(),
            DecodeError::TrailingBytes { count: 1 }
        );
        assert!(!Codec::INT.validate_xdr(&[0]));
        assert!(Codec::INT.validate_xdr(&[0, 0, 0, 0]));
    }

    #[test]
    fn test_text_roundtrip() {
        let codec = Codec::var_array(Codec::UNSIGNED_INT, 4);
        let value = Value::Array(vec![Value::UnsignedInt(1), Value::UnsignedInt(2)]);

        let hex = codec.to_xdr_text(&value, TextEncoding::Hex).unwrap();
        assert_eq!(hex, "000000020000000100000002");
        assert_eq!(codec.from_xdr_text(&hex, TextEncoding::Hex).unwrap(), value);

        let b64 = codec.to_xdr_text(&value, TextEncoding::Base64).unwrap();
        assert_eq!(codec.from_xdr_text(&b64, TextEncoding::Base64).unwrap(), value);

        assert!(!codec.validate_xdr_text("00", TextEncoding::Hex));
        assert!(!codec.validate_xdr_text("AA==", TextEncoding::Base64));
        assert!(!codec.validate_xdr_text("not hex", TextEncoding::Hex));
    }

    #[test]
    fn test_entry_point_seeds_from_own_max_depth() {
        let shallow = Codec::from(FixedArray::new(Codec::INT, 1).with_max_depth(0));
        assert_eq!(shallow.max_depth(), 0);
        assert_eq!(
            shallow.from_xdr(&[0, 0, 0, 1]).unwrap(),
            Value::Array(vec![Value::Int(1)])
        );

        // Three levels need a budget of 2 at the root
        let nested = |root_depth| {
            let inner = Codec::option(Codec::INT);
            let middle = Codec::option(inner);
            Codec::from(Optional::new(middle).with_max_depth(root_depth))
        };
        let bytes = [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 9];
        assert_eq!(nested(2).from_xdr(&bytes).unwrap(), Value::Int(9));
        let err = nested(1).from_xdr(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    }

    #[test]
    fn test_unresolved_reference_is_inert() {
        let codec = Codec::reference("Missing");
        assert!(!codec.validate(&Value::Absent));
        assert_eq!(
            codec.from_xdr(&[]).unwrap_err().kind(),
            ErrorKind::ReferenceResolution
        );
        assert_eq!(
            codec.to_xdr(&Value::Absent).unwrap_err().kind(),
            ErrorKind::ReferenceResolution
        );
    }
}
