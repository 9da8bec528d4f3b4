//! Runtime XDR (RFC 4506) codecs with composable, depth-bounded struct schemas.
//!
//! Types are built at runtime from a handful of codec kinds and then used to
//! encode, decode and validate a dynamic [`Value`] tree.
//!
//! # Quick Start
//!
//! ```rust
//! use xdr_schema::{Codec, Registry, Value};
//!
//! let mut registry = Registry::new();
//! let range = registry
//!     .create(
//!         "MyRange",
//!         [
//!             ("begin", Codec::INT),
//!             ("end", Codec::INT),
//!             ("inclusive", Codec::BOOL),
//!         ],
//!     )
//!     .unwrap();
//!
//! let value = range
//!     .instance([
//!         ("begin", Value::Int(5)),
//!         ("end", Value::Int(255)),
//!         ("inclusive", Value::Bool(true)),
//!     ])
//!     .unwrap();
//!
//! let bytes = range.to_xdr(&value).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 5, 0, 0, 0, 0xff, 0, 0, 0, 1]);
//! assert_eq!(range.from_xdr(&bytes).unwrap(), value);
//! ```
//!
//! # Modules
//!
//! - [`codec`]: The [`Codec`] node and its array, optional and scalar kinds
//! - [`schema`]: Struct schemas and the [`Registry`] that resolves references
//! - [`model`]: Dynamic values and struct instances
//! - [`validate`]: Validation with error paths
//! - [`error`]: Error types
//! - [`limits`]: Default limits for decoding
//!
//! # Security
//!
//! Decoding is safe on untrusted input:
//! - Every composite decode spends one unit of a depth budget, and the
//!   budget of the outermost call governs the whole tree
//! - Claimed element counts are compared to the remaining input before
//!   anything is allocated
//! - Lengths are checked against their declared maximum

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod schema;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    Codec, Depth, FixedArray, Optional, Reader, Scalar, TextEncoding, VarArray, Writer,
    check_depth,
};
pub use error::{DecodeError, EncodeError, ErrorKind, Mismatch, SchemaError, ValidationError};
pub use model::{StructValue, Value};
pub use schema::{Field, Reference, Registry, StructRef, StructSchema};
pub use validate::validate_value;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
