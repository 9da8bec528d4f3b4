//! Optional values: a bool presence flag, then the child iff present.

use crate::codec::Codec;
use crate::codec::depth::Depth;
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, ValidationError};
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::model::Value;

/// `T *name`
#[derive(Debug, Clone)]
pub struct Optional {
    child: Box<Codec>,
    max_depth: u32,
}

impl Optional {
    pub fn new(child: Codec) -> Self {
        Self {
            child: Box::new(child),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the depth budget used when this optional is decoded as an entry point.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn child(&self) -> &Codec {
        &self.child
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
        if reader.read_bool("option.present")? {
            self.child.decode_at(reader, depth.descend())
        } else {
            Ok(Value::Absent)
        }
    }

    pub fn encode(&self, value: &Value, writer: &mut Writer) -> Result<(), EncodeError> {
        let present = !value.is_absent();
        writer.write_bool(present);
        if present {
            self.child.encode(value, writer)?;
        }
        Ok(())
    }

    pub fn validate(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        if value.is_absent() {
            return Ok(());
        }
        self.child.check(value)
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

impl From<Optional> for Codec {
    fn from(option: Optional) -> Self {
        Codec::Option(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Optional {
        Optional::new(Codec::INT)
    }

    fn write(value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        subject().encode(value, &mut writer)?;
        Ok(writer.into_bytes())
    }

    #[test]
    fn test_decode_absent_consumes_only_flag() {
        let bytes = [0, 0, 0, 0, 0, 0, 0, 9];
        let mut reader = Reader::new(&bytes);
        assert_eq!(subject().decode(&mut reader).unwrap(), Value::Absent);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_decode_present() {
        let mut reader = Reader::new(&[0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(subject().decode(&mut reader).unwrap(), Value::Int(0));

        let mut reader = Reader::new(&[0, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(subject().decode(&mut reader).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_decode_bad_flag() {
        let mut reader = Reader::new(&[0, 0, 0, 2, 0, 0, 0, 1]);
        assert!(matches!(
            subject().decode(&mut reader),
            Err(DecodeError::InvalidBool { value: 2 })
        ));
    }

    #[test]
    fn test_depth() {
        let bytes = [0, 0, 0, 1, 0, 0, 0, 5];
        let option = Optional::new(Codec::INT).with_max_depth(2);
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            option.decode_with_depth(&mut reader, -1),
            Err(DecodeError::DepthExceeded { .. })
        ));

        let mut reader = Reader::new(&bytes);
        assert_eq!(option.decode_with_depth(&mut reader, 0).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_encode() {
        assert_eq!(write(&Value::Absent).unwrap(), [0, 0, 0, 0]);
        assert_eq!(write(&Value::from(None::<i32>)).unwrap(), [0, 0, 0, 0]);
        assert_eq!(write(&Value::Int(0)).unwrap(), [0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(write(&Value::Int(1)).unwrap(), [0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_wrong_child() {
        assert!(matches!(
            write(&Value::Bool(true)),
            Err(EncodeError::TypeMismatch { expected: "int", found: "bool" })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(subject().validate(&Value::Int(0)));
        assert!(subject().validate(&Value::Int(-1)));
        assert!(subject().validate(&Value::Absent));
        assert!(!subject().validate(&Value::Bool(false)));
        assert!(!subject().validate(&Value::from("hello")));
        assert!(!subject().validate(&Value::Array(vec![])));
    }
}
