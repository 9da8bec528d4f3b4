//! Struct schemas: named, ordered field lists and the codec for them.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use rustc_hash::FxHashMap;

use crate::codec::Codec;
use crate::codec::depth::Depth;
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, Mismatch, SchemaError, ValidationError};
use crate::model::{StructValue, Value};
use crate::validate::structurally_compatible;

static ABSENT: Value = Value::Absent;

/// One declared field.
#[derive(Debug, Clone)]
pub struct Field {
    name: Arc<str>,
    codec: Codec,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }
}

/// A registered struct type.
///
/// Fields are encoded back to back in declaration order with no tags, so the
/// order is part of the wire format and never changes after registration.
/// Schemas are created through [`Registry::create`](crate::Registry::create).
#[derive(Debug)]
pub struct StructSchema {
    name: Arc<str>,
    fields: Vec<Field>,
    layout: Arc<[Arc<str>]>,
    max_depth: u32,
}

impl StructSchema {
    pub(crate) fn new(name: Arc<str>, fields: Vec<(Arc<str>, Codec)>, max_depth: u32) -> Self {
        let layout = fields.iter().map(|(name, _)| Arc::clone(name)).collect();
        let fields = fields
            .into_iter()
            .map(|(name, codec)| Field { name, codec })
            .collect();
        Self {
            name,
            fields,
            layout,
            max_depth,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    // =========================================================================
    // INSTANCES
    // =========================================================================

    /// Builds an instance from a partial field map. Fields that are not given
    /// hold [`Value::Absent`]; names the schema does not declare are rejected.
    pub fn instance<N, I>(&self, values: I) -> Result<StructValue, SchemaError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        self.instance_with_max_depth(values, self.max_depth)
    }

    /// Like [`instance`](Self::instance), with an explicit maximum depth
    /// instead of the schema's.
    pub fn instance_with_max_depth<N, I>(
        &self,
        values: I,
        max_depth: u32,
    ) -> Result<StructValue, SchemaError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let mut map = self.empty_values();
        for (name, value) in values {
            let name = name.as_ref();
            let slot = map.get_mut(name).ok_or_else(|| SchemaError::UnknownField {
                schema: self.name.to_string(),
                field: name.to_string(),
            })?;
            *slot = value;
        }
        Ok(self.wrap(map, max_depth))
    }

    fn empty_values(&self) -> FxHashMap<Arc<str>, Value> {
        let mut map = FxHashMap::with_capacity_and_hasher(self.fields.len(), Default::default());
        for field in &self.fields {
            map.insert(Arc::clone(&field.name), Value::Absent);
        }
        map
    }

    fn wrap(&self, values: FxHashMap<Arc<str>, Value>, max_depth: u32) -> StructValue {
        StructValue::tagged(Arc::clone(&self.name), Arc::clone(&self.layout), values, max_depth)
    }

    // =========================================================================
    // CODEC
    // =========================================================================

    /// Decodes with a budget seeded from [`max_depth`](Self::max_depth).
    pub fn decode(&self, reader: &mut Reader<'_>) -> Result<StructValue, DecodeError> {
        self.decode_at(reader, Depth::seeded(self.max_depth))
    }

    /// Decodes with an explicit budget, ignoring the configured maximum.
    pub fn decode_with_depth(
        &self,
        reader: &mut Reader<'_>,
        remaining_depth: i64,
    ) -> Result<StructValue, DecodeError> {
        self.decode_at(reader, Depth::new(remaining_depth))
    }

    pub(crate) fn decode_at(
        &self,
        reader: &mut Reader<'_>,
        depth: Depth,
    ) -> Result<StructValue, DecodeError> {
        depth.check()?;
        let child_depth = depth.descend();
        let mut values = FxHashMap::with_capacity_and_hasher(self.fields.len(), Default::default());
        for field in &self.fields {
            let value = field.codec.decode_at(reader, child_depth)?;
            values.insert(Arc::clone(&field.name), value);
        }
        Ok(self.wrap(values, self.max_depth))
    }

    /// Encodes a [`Value::Struct`] that [validates](Self::validate) against
    /// this schema. Field values are written in declaration order and their
    /// errors are returned as is, with nothing of the struct left in `writer`.
    pub fn encode(&self, value: &Value, writer: &mut Writer) -> Result<(), EncodeError> {
        self.check(value).map_err(|source| EncodeError::InvalidStruct {
            expected: self.name.to_string(),
            source,
        })?;
        let Value::Struct(instance) = value else {
            return Err(EncodeError::TypeMismatch {
                expected: "struct",
                found: value.kind(),
            });
        };
        self.encode_fields(instance, writer)
    }

    /// Same as [`encode`](Self::encode) for a bare instance.
    pub fn encode_instance(
        &self,
        instance: &StructValue,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        self.check_instance(instance)
            .map_err(|source| EncodeError::InvalidStruct {
                expected: self.name.to_string(),
                source,
            })?;
        self.encode_fields(instance, writer)
    }

    /// On failure the writer is rolled back to where this struct started.
    fn encode_fields(
        &self,
        instance: &StructValue,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        let start = writer.len();
        for field in &self.fields {
            let value = instance.get(&field.name).unwrap_or(&ABSENT);
            if let Err(err) = field.codec.encode(value, writer) {
                writer.truncate(start);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns true if `value` is an instance tagged with this schema's name,
    /// or an untagged instance that is structurally compatible with it.
    pub fn validate(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match value {
            Value::Struct(instance) => self.check_instance(instance),
            other => Err(ValidationError::new(Mismatch::Type {
                expected: "struct",
                found: other.kind(),
            })),
        }
    }

    pub(crate) fn check_instance(&self, instance: &StructValue) -> Result<(), ValidationError> {
        match instance.name() {
            Some(name) if name == &*self.name => Ok(()),
            Some(name) => Err(ValidationError::new(Mismatch::StructName {
                expected: self.name.to_string(),
                found: name.to_string(),
            })),
            None => structurally_compatible(self, instance),
        }
    }

    // =========================================================================
    // WHOLE BUFFERS
    // =========================================================================

    pub fn to_xdr(&self, instance: &StructValue) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.encode_instance(instance, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decodes exactly one instance from `input`; leftover bytes are an error.
    pub fn from_xdr(&self, input: &[u8]) -> Result<StructValue, DecodeError> {
        let mut reader = Reader::new(input);
        let instance = self.decode(&mut reader)?;
        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes {
                count: reader.remaining_len(),
            });
        }
        Ok(instance)
    }

    pub fn validate_xdr(&self, input: &[u8]) -> bool {
        self.from_xdr(input).is_ok()
    }
}

// =============================================================================
// REFERENCES
// =============================================================================

/// Name reserved with [`Registry::declare`](crate::Registry::declare),
/// filled once the schema is created.
pub(crate) type Placeholder = OnceLock<Weak<StructSchema>>;

/// Handle to a struct schema held inside a [`Codec`].
///
/// References to schemas that were already registered own them. References
/// to the schema itself, or to a name that was only declared, are weak, so
/// cycles in a schema graph are never ownership cycles.
#[derive(Clone)]
pub struct StructRef {
    name: Arc<str>,
    target: Target,
}

#[derive(Clone)]
enum Target {
    Shared(Arc<StructSchema>),
    Recursive(Weak<StructSchema>),
    Declared(Arc<Placeholder>),
}

impl StructRef {
    pub(crate) fn recursive(name: Arc<str>, schema: Weak<StructSchema>) -> Self {
        Self {
            name,
            target: Target::Recursive(schema),
        }
    }

    pub(crate) fn declared(name: Arc<str>, placeholder: Arc<Placeholder>) -> Self {
        Self {
            name,
            target: Target::Declared(placeholder),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced schema. `None` while a declared name has no schema yet,
    /// or once a weakly held schema has been dropped.
    pub fn schema(&self) -> Option<Arc<StructSchema>> {
        match &self.target {
            Target::Shared(schema) => Some(Arc::clone(schema)),
            Target::Recursive(schema) => schema.upgrade(),
            Target::Declared(placeholder) => placeholder.get().and_then(Weak::upgrade),
        }
    }

    /// True if this handle does not keep its target alive.
    pub fn is_recursive(&self) -> bool {
        !matches!(self.target, Target::Shared(_))
    }
}

impl From<Arc<StructSchema>> for StructRef {
    fn from(schema: Arc<StructSchema>) -> Self {
        Self {
            name: Arc::clone(&schema.name),
            target: Target::Shared(schema),
        }
    }
}

impl fmt::Debug for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructRef").field(&self.name).finish()
    }
}
