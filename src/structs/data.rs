//! Typed views over the sample data segment.

use anyhow::{Result, bail};

use crate::structs::format::FormatCode;
use crate::structs::header::ByteOrder;
use crate::utils::bitarray::BitArray;
use crate::utils::errors::FormatError;

/// Sample payload decoded to host-native values.
///
/// The variant is selected by the second format character; multi-byte
/// elements are reinterpreted from the file's `data_rep` order at
/// construction time, so indexing never needs a byte swap. Packed
/// (`P`) payloads keep their bit-level layout behind a [`BitArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataView {
    /// `B` samples.
    Int8(Vec<i8>),
    /// `O` (offset byte) and `A` (ASCII) samples, raw and unswapped.
    Uint8(Vec<u8>),
    /// `I` samples.
    Int16(Vec<i16>),
    /// `L` samples.
    Int32(Vec<i32>),
    /// `X` samples.
    Int64(Vec<i64>),
    /// `F` samples.
    Float32(Vec<f32>),
    /// `D` samples.
    Float64(Vec<f64>),
    /// `P` samples, one bit each, MSB first.
    Packed(BitArray),
}

macro_rules! decode_elements {
    ($bytes:expr, $order:expr, $t:ty) => {
        $bytes
            .chunks_exact(size_of::<$t>())
            .map(|raw| {
                let raw = raw.try_into().expect("chunk size");
                match $order {
                    ByteOrder::Little => <$t>::from_le_bytes(raw),
                    ByteOrder::Big => <$t>::from_be_bytes(raw),
                }
            })
            .collect()
    };
}

impl DataView {
    /// Decodes the data segment `bytes` per the format's sample type.
    ///
    /// A trailing partial element is dropped rather than misread.
    /// Unrecognized sample types fail with [`FormatError::Unsupported`]
    /// instead of guessing a width.
    pub fn read(bytes: &[u8], format: FormatCode, order: ByteOrder) -> Result<Self> {
        let view = match format.dtype {
            b'P' => Self::Packed(BitArray::from_bytes(bytes)),
            b'B' => Self::Int8(bytes.iter().map(|&b| b as i8).collect()),
            b'O' | b'A' => Self::Uint8(bytes.to_vec()),
            b'I' => Self::Int16(decode_elements!(bytes, order, i16)),
            b'L' => Self::Int32(decode_elements!(bytes, order, i32)),
            b'X' => Self::Int64(decode_elements!(bytes, order, i64)),
            b'F' => Self::Float32(decode_elements!(bytes, order, f32)),
            b'D' => Self::Float64(decode_elements!(bytes, order, f64)),
            _ => bail!(FormatError::Unsupported(format.to_string())),
        };

        Ok(view)
    }

    /// Element count: samples for typed variants, bits for `Packed`.
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Packed(bits) => bits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(code: &[u8; 2]) -> FormatCode {
        FormatCode::new(code[0], code[1])
    }

    #[test]
    fn int16_big_endian() {
        let bytes = [0x00, 0x01, 0xFF, 0xFF, 0x02, 0x00];
        let view = DataView::read(&bytes, fmt(b"SI"), ByteOrder::Big).unwrap();
        assert_eq!(view, DataView::Int16(vec![1, -1, 512]));
    }

    #[test]
    fn int16_little_endian() {
        let bytes = [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x02];
        let view = DataView::read(&bytes, fmt(b"SI"), ByteOrder::Little).unwrap();
        assert_eq!(view, DataView::Int16(vec![1, -1, 512]));
    }

    #[test]
    fn float32_both_orders() {
        let le = 1.5f32.to_le_bytes();
        let be = 1.5f32.to_be_bytes();
        assert_eq!(
            DataView::read(&le, fmt(b"CF"), ByteOrder::Little).unwrap(),
            DataView::Float32(vec![1.5])
        );
        assert_eq!(
            DataView::read(&be, fmt(b"CF"), ByteOrder::Big).unwrap(),
            DataView::Float32(vec![1.5])
        );
    }

    #[test]
    fn bytes_never_swap() {
        let bytes = [0x00, 0x80, 0xFF];
        let view = DataView::read(&bytes, fmt(b"SO"), ByteOrder::Big).unwrap();
        assert_eq!(view, DataView::Uint8(vec![0, 128, 255]));

        let view = DataView::read(&bytes, fmt(b"SB"), ByteOrder::Little).unwrap();
        assert_eq!(view, DataView::Int8(vec![0, -128, -1]));
    }

    #[test]
    fn packed_exposes_bits_msb_first() {
        let view = DataView::read(&[0b0100_0010], fmt(b"SP"), ByteOrder::Big).unwrap();
        let DataView::Packed(bits) = &view else {
            panic!("expected packed view");
        };
        assert_eq!(view.len(), 8);
        assert_eq!(bits.to_vec(), vec![0, 1, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn trailing_partial_element_is_dropped() {
        let bytes = [0x00, 0x00, 0x00, 0x2A, 0xDE, 0xAD];
        let view = DataView::read(&bytes, fmt(b"SL"), ByteOrder::Big).unwrap();
        assert_eq!(view, DataView::Int32(vec![42]));
    }

    #[test]
    fn unsupported_type_is_an_error() {
        let err = DataView::read(&[0; 4], fmt(b"SZ"), ByteOrder::Big).unwrap_err();
        assert!(err.is::<FormatError>());
    }
}
