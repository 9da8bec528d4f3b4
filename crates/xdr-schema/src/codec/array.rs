//! Fixed-length arrays: exactly N child encodings, no length prefix.

use crate::codec::Codec;
use crate::codec::depth::Depth;
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Mismatch, ValidationError};
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::model::Value;

/// `T name[N]`
#[derive(Debug, Clone)]
pub struct FixedArray {
    child: Box<Codec>,
    len: u32,
    max_depth: u32,
}

impl FixedArray {
    pub fn new(child: Codec, len: u32) -> Self {
        Self {
            child: Box::new(child),
            len,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the depth budget used when this array is decoded as an entry point.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn child(&self) -> &Codec {
        &self.child
    }

    /// Number of elements every value must have.
    pub fn length(&self) -> u32 {
        self.len
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Decodes with a budget seeded from [`max_depth`](Self::max_depth).
    pub fn decode(&self, reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
        self.decode_at(reader, Depth::seeded(self.max_depth))
    }

    /// Decodes with an explicit budget, ignoring the configured maximum.
    pub fn decode_with_depth(
        &self,
        reader: &mut Reader<'_>,
        remaining_depth: i64,
    ) -> Result<Value, DecodeError> {
        self.decode_at(reader, Depth::new(remaining_depth))
    }

    pub(crate) fn decode_at(
        &self,
        reader: &mut Reader<'_>,
        depth: Depth,
    ) -> Result<Value, DecodeError> {
        depth.check()?;

        // Every element takes at least one byte, so this rejects absurd
        // lengths before anything is allocated.
        let len = self.len as usize;
        if len > reader.remaining_len() {
            return Err(DecodeError::CapacityExceeded {
                field: "array",
                len,
                remaining: reader.remaining_len(),
            });
        }

        let child_depth = depth.descend();
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.child.decode_at(reader, child_depth)?);
        }
        Ok(Value::Array(items))
    }

    pub fn encode(&self, value: &Value, writer: &mut Writer) -> Result<(), EncodeError> {
        let Value::Array(items) = value else {
            return Err(EncodeError::TypeMismatch {
                expected: "array",
                found: value.kind(),
            });
        };
        if items.len() != self.len as usize {
            return Err(EncodeError::LengthMismatch {
                len: items.len(),
                expected: self.len as usize,
            });
        }
        for item in items {
            self.child.encode(item, writer)?;
        }
        Ok(())
    }

    pub fn validate(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let Value::Array(items) = value else {
            return Err(ValidationError::new(Mismatch::Type {
                expected: "array",
                found: value.kind(),
            }));
        };
        if items.len() != self.len as usize {
            return Err(ValidationError::new(Mismatch::Length {
                len: items.len(),
                expected: self.len as usize,
            }));
        }
        for (i, item) in items.iter().enumerate() {
            self.child.check(item).map_err(|err| err.at_index(i))?;
        }
        Ok(())
    }

    pub(crate) fn try_map_child<E>(
        self,
        f: impl FnOnce(Codec) -> Result<Codec, E>,
    ) -> Result<Self, E> {
        Ok(Self {
            child: Box::new(f(*self.child)?),
            ..self
        })
    }
}

impl From<FixedArray> for Codec {
    fn from(array: FixedArray) -> Self {
        Codec::Array(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ints(values: &[i32]) -> Value {
        Value::Array(values.iter().copied().map(Value::Int).collect())
    }

    fn read(array: &FixedArray, bytes: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(bytes);
        array.decode(&mut reader)
    }

    fn write(array: &FixedArray, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::with_capacity(8);
        array.encode(value, &mut writer)?;
        Ok(writer.into_bytes())
    }

    #[test]
    fn test_decode() {
        let zero = FixedArray::new(Codec::INT, 0);
        let one = FixedArray::new(Codec::INT, 1);
        let many = FixedArray::new(Codec::INT, 2);

        assert_eq!(read(&zero, &[]).unwrap(), ints(&[]));
        assert_eq!(read(&zero, &[0, 0, 0, 0]).unwrap(), ints(&[]));
        assert_eq!(read(&one, &[0, 0, 0, 1]).unwrap(), ints(&[1]));
        assert_eq!(read(&many, &[0, 0, 0, 0, 0, 0, 0, 1]).unwrap(), ints(&[0, 1]));
    }

    #[test]
    fn test_decode_short_buffer() {
        let many = FixedArray::new(Codec::INT, 2);
        // Passes the loose capacity check, then runs out of bytes on element two
        let err = read(&many, &[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
        assert_eq!(err.kind(), ErrorKind::ReadBounds);
    }

    #[test]
    fn test_decode_length_exceeds_remaining() {
        let huge = FixedArray::new(Codec::INT, 1_000_000);
        let err = read(&huge, &[0; 16]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::CapacityExceeded { field: "array", len: 1_000_000, remaining: 16 }
        );
        assert_eq!(err.kind(), ErrorKind::ReadBounds);
    }

    #[test]
    fn test_depth() {
        let bytes = [0, 0, 0, 5, 0, 0, 0, 10];

        let array = FixedArray::new(Codec::INT, 2).with_max_depth(2);
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            array.decode_with_depth(&mut reader, -1),
            Err(DecodeError::DepthExceeded { .. })
        ));

        let array = FixedArray::new(Codec::INT, 2).with_max_depth(5);
        let mut reader = Reader::new(&bytes);
        assert_eq!(array.decode_with_depth(&mut reader, 4).unwrap(), ints(&[5, 10]));

        assert_eq!(FixedArray::new(Codec::INT, 2).max_depth(), 200);
    }

    #[test]
    fn test_outer_budget_governs_nested_arrays() {
        let inner = FixedArray::new(Codec::INT, 1).with_max_depth(2);
        let outer = FixedArray::new(inner.into(), 1).with_max_depth(5);
        let mut reader = Reader::new(&[0, 0, 0, 42]);
        assert_eq!(
            outer.decode_with_depth(&mut reader, 2).unwrap(),
            Value::Array(vec![ints(&[42])])
        );
    }

    #[test]
    fn test_encode() {
        let many = FixedArray::new(Codec::INT, 2);
        assert_eq!(write(&many, &ints(&[1, 2])).unwrap(), [0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(write(&many, &ints(&[3, 4])).unwrap(), [0, 0, 0, 3, 0, 0, 0, 4]);
    }

    #[test]
    fn test_encode_wrong_length() {
        let many = FixedArray::new(Codec::INT, 2);
        for value in [ints(&[]), ints(&[1]), ints(&[1, 2, 3])] {
            let err = write(&many, &value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::WriteLength);
        }
        let err = write(&many, &Value::Absent).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteType);
    }

    #[test]
    fn test_encode_wrong_child() {
        let many = FixedArray::new(Codec::INT, 2);
        for bad in [Value::Absent, Value::from("hi")] {
            let value = Value::Array(vec![Value::Int(1), bad]);
            assert!(matches!(
                write(&many, &value),
                Err(EncodeError::TypeMismatch { expected: "int", .. })
            ));
        }
    }

    #[test]
    fn test_validate() {
        let many = FixedArray::new(Codec::INT, 2);
        assert!(many.validate(&ints(&[1, 2])));
        assert!(!many.validate(&ints(&[])));
        assert!(!many.validate(&ints(&[1])));
        assert!(!many.validate(&ints(&[1, 2, 3])));
        assert!(!many.validate(&Value::Array(vec![Value::Int(1), Value::Absent])));
        assert!(!many.validate(&Value::Array(vec![Value::Int(1), Value::Array(vec![])])));
        assert!(!many.validate(&Value::Int(1)));

        let err = many
            .check(&Value::Array(vec![Value::Int(1), Value::from("hello")]))
            .unwrap_err();
        assert_eq!(err.path, "[1]");
    }
}
