//! Default limits applied when decoding untrusted input.
//!
//! Every composite codec carries its own copy of these values and can be
//! configured per instance; the constants here are only the defaults.

/// Depth budget seeded at a top-level decode when the caller supplies none.
pub const DEFAULT_MAX_DEPTH: u32 = 200;

/// Largest length a variable array, string or opaque can declare on the wire.
pub const MAX_LENGTH: u32 = u32::MAX;

/// Size of one XDR unit; every item is padded to a multiple of this.
pub const XDR_UNIT: usize = 4;
