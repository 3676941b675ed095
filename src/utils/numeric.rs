//! Numeric helpers shared by the header and keyword decoders.

use log::warn;

/// Largest integer magnitude an `f64` represents exactly (2^53).
pub const MAX_SAFE_INTEGER: i64 = 1 << 53;

/// Reconstructs a 64-bit integer from two 32-bit halves at `offset`.
///
/// The halves combine as `low + high * 2^32` with the low word kept
/// signed, in `f64` so no word combination can overflow. Results at or
/// beyond 2^53 cannot be carried exactly in the `f64` keyword value
/// domain, so they collapse to positive infinity with a warning rather
/// than a silently wrong finite number.
///
/// Panics if fewer than 8 bytes remain at `offset`.
pub fn get_int64(bytes: &[u8], offset: usize, little_endian: bool) -> f64 {
    let word = |at: usize| -> i32 {
        let raw: [u8; 4] = bytes[at..at + 4].try_into().expect("4-byte slice");
        if little_endian {
            i32::from_le_bytes(raw)
        } else {
            i32::from_be_bytes(raw)
        }
    };

    let (high_off, low_off) = if little_endian { (4, 0) } else { (0, 4) };
    let high = word(offset + high_off);
    let low = word(offset + low_off);

    let value = low as f64 + high as f64 * pow2(32);
    if value >= MAX_SAFE_INTEGER as f64 {
        warn!("64-bit value {value} exceeds exact f64 range, reporting infinity");
        f64::INFINITY
    } else {
        value
    }
}

/// Calculates 2^n as an `f64`.
///
/// Exact bit shift for `0 <= n < 31`, `powi` elsewhere since the shift
/// is not defined for negative or wide exponents.
pub fn pow2(n: i32) -> f64 {
    if (0..31).contains(&n) {
        (1u32 << n) as f64
    } else {
        2f64.powi(n)
    }
}

/// Converts a byte buffer to a string one character per byte.
///
/// Header tags and fixed-width fields are ASCII; bytes above 0x7F map
/// to the matching Latin-1 code point instead of failing.
pub fn ascii_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Inverse of [`ascii_to_string`]: one byte per character, code points
/// above 0xFF truncated.
///
/// ```
/// use bluefile::utils::numeric::string_to_ascii;
///
/// assert_eq!(string_to_ascii("EEEI"), b"EEEI");
/// ```
pub fn string_to_ascii(s: &str) -> Vec<u8> {
    s.chars().map(|c| c as u32 as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_int64_zero() {
        assert_eq!(get_int64(&[0u8; 8], 0, true), 0.0);
        assert_eq!(get_int64(&[0u8; 8], 0, false), 0.0);
    }

    #[test]
    fn get_int64_little_endian() {
        // 65536 in the low word, nothing in the high word.
        let bytes = [0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(get_int64(&bytes, 0, true), 65536.0);
    }

    #[test]
    fn get_int64_big_endian() {
        // Same bytes read big-endian put 256 in the high word.
        let bytes = [0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(get_int64(&bytes, 0, false), 1099511627776.0);
    }

    #[test]
    fn get_int64_negative() {
        let bytes = [0xFF; 8];
        assert_eq!(get_int64(&bytes, 0, true), -1.0);
        assert_eq!(get_int64(&bytes, 0, false), -1.0);
    }

    #[test]
    fn get_int64_reports_infinity_past_exact_range() {
        // Big-endian words 2 and 1337 reinterpreted little-endian land
        // far above 2^53.
        let bytes = [0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x05, 0x39];
        assert_eq!(get_int64(&bytes, 0, true), f64::INFINITY);
    }

    #[test]
    fn get_int64_negative_high_word_stays_finite() {
        // low = -1, high = i32::MIN: the most negative combination the
        // two words can express.
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x80];
        let expected = -1.0 + i32::MIN as f64 * 4294967296.0;
        assert_eq!(get_int64(&bytes, 0, true), expected);
        assert!(expected.is_finite() && expected < 0.0);
    }

    #[test]
    fn get_int64_honors_offset() {
        let mut bytes = vec![0xAA, 0xAA];
        bytes.extend_from_slice(&[7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(get_int64(&bytes, 2, true), 7.0);
    }

    #[test]
    fn pow2_values() {
        assert_eq!(pow2(-2), 0.25);
        assert_eq!(pow2(0), 1.0);
        assert_eq!(pow2(30), 1073741824.0);
        assert_eq!(pow2(32), 4294967296.0);
    }

    #[test]
    fn ascii_round_trip() {
        assert_eq!(ascii_to_string(b"BLUE"), "BLUE");
        assert_eq!(string_to_ascii("BLUE"), b"BLUE");
        assert_eq!(ascii_to_string(&[]), "");
    }
}
