//! Data model types for decoded XDR data.
//!
//! - Values (the untyped value tree)
//! - Struct instances (field maps tagged with their schema name)

pub mod instance;
pub mod value;

pub use instance::StructValue;
pub use value::Value;
