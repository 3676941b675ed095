//! Extension header keyword decoding.
//!
//! The extension header is a linear run of length-prefixed records:
//!
//! | offset | field | width |
//! |--------|-------|-------|
//! | 0      | lkey  | i32, total record length incl. tag and padding |
//! | 4      | lext  | i16, 8 + tag length + padding |
//! | 6      | ltag  | i8, tag length |
//! | 7      | type  | 1 char |
//! | 8      | value | `lkey - lext` bytes |
//! | 8+len  | tag   | `ltag` chars, NUL/space padded |
//!
//! Records repeat until the extension byte range is exhausted. A
//! record whose length would overrun the range stops the scan; what
//! was decoded before it is kept.

use std::collections::HashMap;

use log::warn;
use serde_json::{Map, Value};

use crate::structs::format::bytes_per_sample;
use crate::structs::header::ByteOrder;
use crate::utils::errors::KeywordError;
use crate::utils::numeric::{ascii_to_string, get_int64};

/// Decoded keyword value.
///
/// Numeric types all widen to `f64`; a record carrying more than one
/// element of its type decodes as [`KeywordValue::Numbers`]. Payloads
/// with an unrecognized type character are kept as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<KeywordValue> for Value {
    fn from(value: KeywordValue) -> Self {
        match value {
            KeywordValue::Number(n) => json_number(n),
            KeywordValue::Numbers(v) => Value::Array(v.into_iter().map(json_number).collect()),
            KeywordValue::Text(s) => Value::from(s),
            KeywordValue::Bytes(b) => Value::from(b),
        }
    }
}

/// JSON has no non-finite numbers, so the precision-loss infinity
/// marker from 64-bit keywords is carried as the string `"Infinity"`
/// rather than degrading to null.
fn json_number(n: f64) -> Value {
    match serde_json::Number::from_f64(n) {
        Some(num) => Value::Number(num),
        None if n == f64::NEG_INFINITY => Value::String("-Infinity".into()),
        None => Value::String("Infinity".into()),
    }
}

/// One tag/value record in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub tag: String,
    pub value: KeywordValue,
}

/// Caller-supplied container fed each `(tag, value)` pair in order.
pub trait KeywordSink {
    fn accept(&mut self, tag: &str, value: KeywordValue);
}

/// Output shape for the decoded extension header.
#[derive(Default)]
pub enum ExtHeaderKind<'a> {
    /// Tag → value map, last tag wins.
    #[default]
    Dict,
    /// Same mapping semantics as `Dict`, held as JSON values. Numbers
    /// outside the exact `f64` integer range appear as the string
    /// `"Infinity"`, since JSON numbers cannot express them.
    Json,
    /// Ordered records, duplicates preserved.
    List,
    /// Every pair is handed to the caller's sink instead.
    Sink(&'a mut dyn KeywordSink),
}

/// Decoded extension header in the shape the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtHeader {
    Dict(HashMap<String, KeywordValue>),
    Json(Map<String, Value>),
    List(Vec<Keyword>),
    /// Records were delivered to the caller's [`KeywordSink`].
    Custom,
}

impl ExtHeader {
    /// Decodes keyword records from `bytes` (the extension header
    /// range, possibly empty) into the requested shape.
    ///
    /// Malformed records stop the scan with a warning; the records
    /// decoded before them are retained. Zero fill after the last
    /// record is skipped silently.
    pub fn read(bytes: &[u8], order: ByteOrder, kind: ExtHeaderKind<'_>) -> Self {
        let mut out = Collector::new(kind);
        let mut ii = 0usize;

        while ii < bytes.len() {
            let remaining = &bytes[ii..];
            if remaining.len() < 8 {
                if remaining.iter().any(|&b| b != 0) {
                    warn!("{}", KeywordError::TruncatedRecord(ii));
                }
                break;
            }

            let lkey = order.read_i32(&remaining[0..4]);
            let lext = order.read_i16(&remaining[4..6]);
            let ltag = remaining[6] as i8;
            let type_char = remaining[7];

            if lkey == 0 {
                // Zero fill to the end of the range.
                break;
            }
            if lkey < 0 || lkey as usize > remaining.len() {
                warn!("{}", KeywordError::RecordOverrun { offset: ii, lkey });
                break;
            }
            if lext < 8 || lkey < lext as i32 {
                warn!(
                    "{}",
                    KeywordError::RecordLengthInvalid {
                        offset: ii,
                        lkey,
                        lext,
                    }
                );
                break;
            }

            let ldata = (lkey - lext as i32) as usize;
            let tag_len = (ltag.max(0) as usize).min(lext as usize - 8);

            let value = decode_value(type_char, &remaining[8..8 + ldata], order);
            let tag_raw = &remaining[8 + ldata..8 + ldata + tag_len];
            let tag = ascii_to_string(tag_raw)
                .trim_end_matches(['\0', ' '])
                .to_string();

            out.push(tag, value);
            ii += lkey as usize;
        }

        out.finish()
    }

    /// Number of records held directly; `None` for the sink shape.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Dict(map) => Some(map.len()),
            Self::Json(map) => Some(map.len()),
            Self::List(list) => Some(list.len()),
            Self::Custom => None,
        }
    }
}

fn decode_value(type_char: u8, data: &[u8], order: ByteOrder) -> KeywordValue {
    if type_char == b'A' {
        return KeywordValue::Text(ascii_to_string(data));
    }

    // The keyword type characters reuse the sample-type table; only
    // whole-byte widths make sense here.
    let Some(width) = bytes_per_sample(type_char).filter(|&w| w >= 1.0) else {
        return KeywordValue::Bytes(data.to_vec());
    };
    let width = width as usize;

    let read_one = |off: usize| -> f64 {
        match type_char {
            b'B' => data[off] as i8 as f64,
            b'O' => data[off] as f64,
            b'I' => order.read_i16(&data[off..off + 2]) as f64,
            b'L' => order.read_i32(&data[off..off + 4]) as f64,
            b'X' => get_int64(data, off, order.is_little()),
            b'F' => order.read_f32(&data[off..off + 4]) as f64,
            b'D' => order.read_f64(&data[off..off + 8]),
            _ => unreachable!("width table covers the type characters"),
        }
    };

    match data.len() / width {
        0 => KeywordValue::Bytes(data.to_vec()),
        1 => KeywordValue::Number(read_one(0)),
        count => KeywordValue::Numbers((0..count).map(|i| read_one(i * width)).collect()),
    }
}

enum Collector<'a> {
    Dict(HashMap<String, KeywordValue>),
    Json(Map<String, Value>),
    List(Vec<Keyword>),
    Sink(&'a mut dyn KeywordSink),
}

impl<'a> Collector<'a> {
    fn new(kind: ExtHeaderKind<'a>) -> Self {
        match kind {
            ExtHeaderKind::Dict => Self::Dict(HashMap::new()),
            ExtHeaderKind::Json => Self::Json(Map::new()),
            ExtHeaderKind::List => Self::List(Vec::new()),
            ExtHeaderKind::Sink(sink) => Self::Sink(sink),
        }
    }

    fn push(&mut self, tag: String, value: KeywordValue) {
        match self {
            Self::Dict(map) => {
                map.insert(tag, value);
            }
            Self::Json(map) => {
                map.insert(tag, value.into());
            }
            Self::List(list) => list.push(Keyword { tag, value }),
            Self::Sink(sink) => sink.accept(&tag, value),
        }
    }

    fn finish(self) -> ExtHeader {
        match self {
            Self::Dict(map) => ExtHeader::Dict(map),
            Self::Json(map) => ExtHeader::Json(map),
            Self::List(list) => ExtHeader::List(list),
            Self::Sink(_) => ExtHeader::Custom,
        }
    }
}

/// Encodes one keyword record, padded to an 8-byte boundary. Test
/// fixture support; the crate has no public write path.
#[cfg(test)]
pub(crate) fn encode_record(tag: &str, type_char: u8, data: &[u8], order: ByteOrder) -> Vec<u8> {
    let base = 8 + data.len() + tag.len();
    let lkey = base.div_ceil(8) * 8;
    let pad = lkey - base;
    let lext = 8 + tag.len() + pad;

    let mut out = Vec::with_capacity(lkey);
    match order {
        ByteOrder::Little => {
            out.extend_from_slice(&(lkey as i32).to_le_bytes());
            out.extend_from_slice(&(lext as i16).to_le_bytes());
        }
        ByteOrder::Big => {
            out.extend_from_slice(&(lkey as i32).to_be_bytes());
            out.extend_from_slice(&(lext as i16).to_be_bytes());
        }
    }
    out.push(tag.len() as u8);
    out.push(type_char);
    out.extend_from_slice(data);
    out.extend_from_slice(tag.as_bytes());
    out.resize(lkey, 0);
    out
}

#[cfg(test)]
pub(crate) fn keyword_fixture(order: ByteOrder) -> Vec<u8> {
    let le = matches!(order, ByteOrder::Little);
    let i16b = |v: i16| if le { v.to_le_bytes() } else { v.to_be_bytes() };
    let i32b = |v: i32| if le { v.to_le_bytes() } else { v.to_be_bytes() };
    let i64b = |v: i64| if le { v.to_le_bytes() } else { v.to_be_bytes() };
    let f32b = |v: f32| if le { v.to_le_bytes() } else { v.to_be_bytes() };
    let f64b = |v: f64| if le { v.to_le_bytes() } else { v.to_be_bytes() };

    let mut buf = Vec::new();
    buf.extend(encode_record("B_TEST", b'B', &[123], order));
    buf.extend(encode_record("I_TEST", b'I', &i16b(1337), order));
    buf.extend(encode_record("L_TEST", b'L', &i32b(113355), order));
    buf.extend(encode_record("X_TEST", b'X', &i64b(987654321), order));
    buf.extend(encode_record("F_TEST", b'F', &f32b(0.12345), order));
    buf.extend(encode_record("D_TEST", b'D', &f64b(9.87654321), order));
    buf.extend(encode_record("O_TEST", b'O', &[255], order));
    buf.extend(encode_record("STRING_TEST", b'A', b"Hello World", order));
    buf.extend(encode_record("B_TEST2", b'B', &[99], order));
    buf.extend(encode_record("STRING_TEST2", b'A', b"Goodbye World", order));
    buf
}
