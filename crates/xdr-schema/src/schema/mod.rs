//! Struct schemas and the registry that names them.

pub mod registry;
pub mod structure;

pub use registry::{Reference, Registry};
pub use structure::{Field, StructRef, StructSchema};
