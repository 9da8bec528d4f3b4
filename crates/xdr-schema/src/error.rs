//! Error types for XDR encoding/decoding, schema construction and validation.

use thiserror::Error;

/// Coarse error taxonomy shared by every error type in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Claimed size is inconsistent with the buffer, or a read ran past its end.
    ReadBounds,
    /// A variable-length item is longer than its configured maximum.
    LengthExceeded,
    /// The depth budget ran out before a required recursive step.
    DepthExceeded,
    /// A value is not shape-compatible with the codec it is written with.
    WriteType,
    /// A value has the wrong length for the codec it is written with.
    WriteLength,
    /// A forward reference names a schema that is not registered.
    ReferenceResolution,
    /// Bytes that are in bounds but not a legal encoding (bool, padding, UTF-8, ...).
    Malformed,
    /// A schema declaration or field access that does not fit the schema.
    InvalidSchema,
}

/// Error during XDR decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === Read bounds ===
    #[error(
        "read error: unexpected end of input while reading {context} (read outside the boundary)"
    )]
    UnexpectedEof { context: &'static str },

    #[error("read error: {field} length {len} exceeds remaining {remaining} bytes")]
    CapacityExceeded {
        field: &'static str,
        len: usize,
        remaining: usize,
    },

    // === Limits ===
    #[error("read error: saw {len} length {field}, max allowed is {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("exceeded max decoding depth (remaining budget {remaining})")]
    DepthExceeded { remaining: i64 },

    // === Malformed encoding ===
    #[error("read error: invalid bool value {value} (expected 0 or 1)")]
    InvalidBool { value: u32 },

    #[error("read error: non-zero padding after {context}")]
    InvalidPadding { context: &'static str },

    #[error("read error: invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("read error: {count} trailing bytes after value")]
    TrailingBytes { count: usize },

    #[error("read error: invalid {encoding} input: {message}")]
    InvalidText {
        encoding: &'static str,
        message: String,
    },

    // === References ===
    #[error("read error: struct reference {name:?} has no live schema")]
    UnresolvedReference { name: String },
}

impl DecodeError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnexpectedEof { .. } | DecodeError::CapacityExceeded { .. } => {
                ErrorKind::ReadBounds
            }
            DecodeError::LengthExceedsLimit { .. } => ErrorKind::LengthExceeded,
            DecodeError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            DecodeError::UnresolvedReference { .. } => ErrorKind::ReferenceResolution,
            DecodeError::InvalidBool { .. }
            | DecodeError::InvalidPadding { .. }
            | DecodeError::InvalidUtf8 { .. }
            | DecodeError::TrailingBytes { .. }
            | DecodeError::InvalidText { .. } => ErrorKind::Malformed,
        }
    }
}

/// Error during XDR encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("write error: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("write error: got array of size {len}, expected {expected}")]
    LengthMismatch { len: usize, expected: usize },

    #[error("write error: got {field} of size {len}, max allowed is {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("write error: value is not a valid {expected}: {source}")]
    InvalidStruct {
        expected: String,
        #[source]
        source: ValidationError,
    },

    #[error("write error: struct reference {name:?} has no live schema")]
    UnresolvedReference { name: String },
}

impl EncodeError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::TypeMismatch { .. } | EncodeError::InvalidStruct { .. } => {
                ErrorKind::WriteType
            }
            EncodeError::LengthMismatch { .. } | EncodeError::LengthExceedsLimit { .. } => {
                ErrorKind::WriteLength
            }
            EncodeError::UnresolvedReference { .. } => ErrorKind::ReferenceResolution,
        }
    }
}

/// Error while declaring schemas or touching struct fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("cannot resolve reference to {name:?} from {referrer:?}: schema is not registered")]
    UnresolvedReference { referrer: String, name: String },

    #[error("schema {name:?} is already registered")]
    DuplicateSchema { name: String },

    #[error("schema {schema:?} declares field {field:?} more than once")]
    DuplicateField { schema: String, field: String },

    #[error("{schema:?} has no field {field:?}")]
    UnknownField { schema: String, field: String },
}

impl SchemaError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchemaError::UnresolvedReference { .. } => ErrorKind::ReferenceResolution,
            SchemaError::DuplicateSchema { .. }
            | SchemaError::DuplicateField { .. }
            | SchemaError::UnknownField { .. } => ErrorKind::InvalidSchema,
        }
    }
}

/// Why a value failed validation against a codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Type {
        expected: &'static str,
        found: &'static str,
    },
    Length { len: usize, expected: usize },
    TooLong { len: usize, max: usize },
    StructName { expected: String, found: String },
    Fields { expected: Vec<String>, found: Vec<String> },
    DeadReference { name: String },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::Type { expected, found } => write!(f, "expected {expected}, found {found}"),
            Mismatch::Length { len, expected } => {
                write!(f, "length {len} does not match required length {expected}")
            }
            Mismatch::TooLong { len, max } => write!(f, "length {len} exceeds maximum {max}"),
            Mismatch::StructName { expected, found } => {
                write!(f, "struct {found} is not {expected}")
            }
            Mismatch::Fields { expected, found } => {
                write!(f, "fields {found:?} do not match {expected:?}")
            }
            Mismatch::DeadReference { name } => write!(f, "reference {name:?} has no live schema"),
        }
    }
}

/// A validation failure, located by a path such as `entries[2].begin`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {mismatch}", display_path(.path))]
pub struct ValidationError {
    pub path: String,
    pub mismatch: Mismatch,
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

impl ValidationError {
    pub(crate) fn new(mismatch: Mismatch) -> Self {
        Self {
            path: String::new(),
            mismatch,
        }
    }

    /// Prepends an array index to the path.
    pub(crate) fn at_index(mut self, index: usize) -> Self {
        self.path = if self.path.is_empty() || self.path.starts_with('[') {
            format!("[{index}]{}", self.path)
        } else {
            format!("[{index}].{}", self.path)
        };
        self
    }

    /// Prepends a struct field name to the path.
    pub(crate) fn at_field(mut self, field: &str) -> Self {
        self.path = if self.path.is_empty() {
            field.to_string()
        } else if self.path.starts_with('[') {
            format!("{field}{}", self.path)
        } else {
            format!("{field}.{}", self.path)
        };
        self
    }

    /// Returns the taxonomy bucket the failure would surface as on encode.
    pub fn kind(&self) -> ErrorKind {
        match self.mismatch {
            Mismatch::Length { .. } | Mismatch::TooLong { .. } => ErrorKind::WriteLength,
            Mismatch::DeadReference { .. } => ErrorKind::ReferenceResolution,
            _ => ErrorKind::WriteType,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let err = ValidationError::new(Mismatch::Type {
            expected: "int",
            found: "absent",
        })
        .at_field("begin")
        .at_index(2)
        .at_field("ranges");
        assert_eq!(err.path, "ranges[2].begin");

        let nested = ValidationError::new(Mismatch::Length { len: 1, expected: 2 })
            .at_index(0)
            .at_index(3);
        assert_eq!(nested.path, "[3][0]");
        assert_eq!(nested.kind(), ErrorKind::WriteLength);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            DecodeError::CapacityExceeded { field: "array", len: 3, remaining: 0 }.kind(),
            ErrorKind::ReadBounds
        );
        assert_eq!(
            DecodeError::DepthExceeded { remaining: -1 }.kind(),
            ErrorKind::DepthExceeded
        );
        assert_eq!(
            EncodeError::LengthMismatch { len: 1, expected: 2 }.kind(),
            ErrorKind::WriteLength
        );
        assert_eq!(
            SchemaError::UnresolvedReference { referrer: "A".into(), name: "B".into() }.kind(),
            ErrorKind::ReferenceResolution
        );
    }

    #[test]
    fn test_messages() {
        let err = DecodeError::DepthExceeded { remaining: -1 };
        assert!(err.to_string().contains("exceeded max decoding depth"));

        let err = EncodeError::TypeMismatch { expected: "array", found: "absent" };
        assert!(err.to_string().starts_with("write error"));
    }
}
