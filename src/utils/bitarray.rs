//! Bit-addressable array used for packed sub-byte sample formats.

use std::ops::Index;

/// Read/write bit array over an owned byte buffer.
///
/// Bit 0 of each byte is its most significant bit, matching the
/// packing order of BLUE `P` format payloads. Reads through
/// `arr[i]` dispatch to [`BitArray::get_bit`]; writes go through
/// [`BitArray::set_bit`] since a bit has no addressable `&mut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    bytes: Vec<u8>,
}

impl BitArray {
    /// Creates a zeroed array holding at least `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: vec![0; bits.div_ceil(8)],
        }
    }

    /// Wraps existing packed bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Number of addressable bits (byte length × 8).
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bit at `idx`, 0 or 1.
    ///
    /// Panics if `idx` is out of bounds.
    pub fn get_bit(&self, idx: usize) -> u8 {
        let byte = self.bytes[idx >> 3];
        let off = idx & 0x7;
        (byte >> (7 - off)) & 1
    }

    /// Sets the bit at `idx`; any nonzero `val` stores a 1.
    ///
    /// Panics if `idx` is out of bounds.
    pub fn set_bit(&mut self, idx: usize, val: u8) {
        let off = idx & 0x7;
        if val != 0 {
            self.bytes[idx >> 3] |= 0x80 >> off;
        } else {
            self.bytes[idx >> 3] &= !(0x80 >> off);
        }
    }

    /// Writes bits `0..vals.len()` from `vals` in order.
    pub fn set_array(&mut self, vals: &[u8]) {
        for (i, &v) in vals.iter().enumerate() {
            self.set_bit(i, v);
        }
    }

    /// Materializes the bits in `[start, stop)` as a 0/1 vector.
    ///
    /// Out-of-range bounds are clamped, never a panic: `start` clips
    /// to 0 and `stop` to [`BitArray::len`].
    pub fn subarray(&self, start: i64, stop: i64) -> Vec<u8> {
        let start = start.max(0) as usize;
        let stop = (stop.max(0) as usize).min(self.len());
        (start..stop.max(start)).map(|i| self.get_bit(i)).collect()
    }

    /// The whole array as a 0/1 vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.subarray(0, self.len() as i64)
    }

    /// The underlying packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Index<usize> for BitArray {
    type Output = u8;

    fn index(&self, idx: usize) -> &u8 {
        if self.get_bit(idx) == 0 { &0 } else { &1 }
    }
}
