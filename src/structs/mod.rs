//! Data structures representing BLUE file components.
//!
//! Each structure owns the logic that decodes it from the byte
//! buffer: the primary header, format codes and sample geometry,
//! the typed payload view, and extension-header keywords.

pub mod data;
pub mod format;
pub mod header;
pub mod keyword;
