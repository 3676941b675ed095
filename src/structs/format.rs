//! Data format codes and sample geometry.
//!
//! A BLUE format code is two characters: the first selects the sample
//! organization within an atom (scalar, complex, vector, ...), the
//! second the sample type (byte, 16-bit int, 64-bit float, 1-bit
//! packed, ...). Unrecognized characters resolve to `None` so callers
//! can detect unsupported formats without a decode failure.

use std::fmt::{Display, Formatter};

/// Samples per atom selected by the first format character.
pub fn samples_per_atom(mode: u8) -> Option<u32> {
    match mode {
        b'S' => Some(1),
        b'C' => Some(2),
        b'V' => Some(3),
        b'Q' => Some(4),
        b'M' => Some(9),
        b'X' => Some(10),
        b'T' => Some(16),
        b'U' => Some(1),
        b'1'..=b'9' => Some((mode - b'0') as u32),
        _ => None,
    }
}

/// Bytes per sample selected by the second format character.
///
/// `P` is the packed 1-bit format, hence the fractional width.
pub fn bytes_per_sample(dtype: u8) -> Option<f64> {
    match dtype {
        b'P' => Some(0.125),
        b'A' => Some(1.0),
        b'O' => Some(1.0),
        b'B' => Some(1.0),
        b'I' => Some(2.0),
        b'L' => Some(4.0),
        b'X' => Some(8.0),
        b'F' => Some(4.0),
        b'D' => Some(8.0),
        _ => None,
    }
}

/// Two-character format code from primary header offset 52.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCode {
    pub mode: u8,
    pub dtype: u8,
}

impl FormatCode {
    pub fn new(mode: u8, dtype: u8) -> Self {
        Self { mode, dtype }
    }

    pub fn samples_per_atom(&self) -> Option<u32> {
        samples_per_atom(self.mode)
    }

    pub fn bytes_per_sample(&self) -> Option<f64> {
        bytes_per_sample(self.dtype)
    }

    /// Resolves the full sample geometry, `None` when either format
    /// character is unrecognized. `ape` is 1 for class 1 files and the
    /// frame subsize for class 2.
    pub fn geometry(&self, ape: u32) -> Option<Geometry> {
        let spa = self.samples_per_atom()?;
        let bps = self.bytes_per_sample()?;
        let bpa = spa as f64 * bps;

        Some(Geometry {
            spa,
            bps,
            bpa,
            ape,
            bpe: bpa * ape as f64,
        })
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.mode as char, self.dtype as char)
    }
}

/// Derived sample geometry for a format code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Samples per atom.
    pub spa: u32,
    /// Bytes per sample; fractional for packed formats.
    pub bps: f64,
    /// Bytes per atom, `spa * bps`.
    pub bpa: f64,
    /// Atoms per element.
    pub ape: u32,
    /// Bytes per element, `bpa * ape`.
    pub bpe: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_double() {
        let g = FormatCode::new(b'S', b'D').geometry(1).unwrap();
        assert_eq!(g.spa, 1);
        assert_eq!(g.bps, 8.0);
        assert_eq!(g.bpa, 8.0);
        assert_eq!(g.ape, 1);
        assert_eq!(g.bpe, 8.0);
    }

    #[test]
    fn complex_float() {
        let g = FormatCode::new(b'C', b'F').geometry(1).unwrap();
        assert_eq!(g.spa, 2);
        assert_eq!(g.bps, 4.0);
        assert_eq!(g.bpa, 8.0);
        assert_eq!(g.bpe, 8.0);
    }

    #[test]
    fn scalar_packed() {
        let g = FormatCode::new(b'S', b'P').geometry(1).unwrap();
        assert_eq!(g.bps, 0.125);
        assert_eq!(g.bpa, 0.125);
        assert_eq!(g.bpe, 0.125);
    }

    #[test]
    fn digit_mode_and_subsize_scaling() {
        let g = FormatCode::new(b'3', b'I').geometry(4).unwrap();
        assert_eq!(g.spa, 3);
        assert_eq!(g.bpa, 6.0);
        assert_eq!(g.bpe, 24.0);
    }

    #[test]
    fn geometry_invariants_hold_for_all_known_codes() {
        for mode in [b'S', b'C', b'V', b'Q', b'M', b'X', b'T', b'U', b'5'] {
            for dtype in [b'P', b'A', b'O', b'B', b'I', b'L', b'X', b'F', b'D'] {
                let g = FormatCode::new(mode, dtype).geometry(3).unwrap();
                assert_eq!(g.bpa, g.spa as f64 * g.bps);
                assert_eq!(g.bpe, g.bpa * g.ape as f64);
            }
        }
    }

    #[test]
    fn unknown_characters_are_undefined_not_errors() {
        assert_eq!(samples_per_atom(b'Z'), None);
        assert_eq!(bytes_per_sample(b'Z'), None);
        assert!(FormatCode::new(b'Z', b'D').geometry(1).is_none());
        assert!(FormatCode::new(b'S', b'Z').geometry(1).is_none());
    }

    #[test]
    fn renders_as_two_characters() {
        assert_eq!(FormatCode::new(b'S', b'B').to_string(), "SB");
    }
}
