//! Utility functions and supporting infrastructure.
//!
//! Provides bit-level storage for packed formats, numeric
//! reconstruction helpers, and error types.

pub mod bitarray;
pub mod errors;
pub mod numeric;
