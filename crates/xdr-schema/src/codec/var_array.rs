//! Variable-length arrays: a u32 count followed by that many child encodings.

use crate::codec::Codec;
use crate::codec::depth::Depth;
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Mismatch, ValidationError};
use crate::limits::{DEFAULT_MAX_DEPTH, MAX_LENGTH};
use crate::model::Value;

/// `T name<max_len>`
#[derive(Debug, Clone)]
pub struct VarArray {
    child: Box<Codec>,
    max_len: u32,
    max_depth: u32,
}

impl VarArray {
    /// An array bounded only by the u32 length prefix.
    pub fn new(child: Codec) -> Self {
        Self::with_max_len(child, MAX_LENGTH)
    }

    pub fn with_max_len(child: Codec, max_len: u32) -> Self {
        Self {
            child: Box::new(child),
            max_len,
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

    pub fn max_len(&self) -> u32 {
        self.max_len
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

        let len = reader.read_u32("var_array.length")?;
        if len > self.max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field: "var_array",
                len: len as usize,
                max: self.max_len as usize,
            });
        }

        let len = len as usize;
        if len > reader.remaining_len() {
            return Err(DecodeError::CapacityExceeded {
                field: "var_array",
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
        if items.len() > self.max_len as usize {
            return Err(EncodeError::LengthExceedsLimit {
                field: "var_array",
                len: items.len(),
                max: self.max_len as usize,
            });
        }
        writer.write_u32(items.len() as u32);
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
        if items.len() > self.max_len as usize {
            return Err(ValidationError::new(Mismatch::TooLong {
                len: items.len(),
                max: self.max_len as usize,
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

impl From<VarArray> for Codec {
    fn from(array: VarArray) -> Self {
        Codec::VarArray(array)
    }
}
