#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Decoder for the BLUE self-describing binary container used by
//! signal-processing tool chains.
//!
//! ### File Organization
//!
//! **Primary header**: fixed 512-byte region with explicit byte-order
//! tags, layout fields, and the two-character sample format code.
//! **Data segment**: sample payload described by `data_start`/`data_size`.
//! **Extension header**: optional length-prefixed keyword records.
//!
//! ### Decode Pipeline
//!
//! One synchronous pass over a caller-owned byte buffer:
//!
//! 1. Resolve header and payload byte order from the `head_rep`/
//!    `data_rep` tags ([`structs::header::ByteOrder`]).
//! 2. Derive sample geometry from the format code
//!    ([`structs::format::FormatCode`]).
//! 3. Build the typed (or bit-packed) payload view
//!    ([`structs::data::DataView`]).
//! 4. Decode extension-header keywords into the configured shape
//!    ([`structs::keyword::ExtHeader`]).
//!
//! Decoding never mutates the input buffer and shares no state
//! between calls.

/// Data structures representing BLUE file components.
///
/// - **Primary header** ([`structs::header`]): fixed-offset field
///   extraction and the public [`structs::header::BlueHeader`] entity
/// - **Format codes** ([`structs::format`]): sample geometry tables
/// - **Payload views** ([`structs::data`]): endianness-corrected
///   typed access to the data segment
/// - **Keywords** ([`structs::keyword`]): extension header tag/value
///   records
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Bit storage** ([`utils::bitarray`]): bit-addressable arrays
///   for packed sample formats
/// - **Numeric helpers** ([`utils::numeric`]): 64-bit reconstruction
///   and ASCII conversions
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;
