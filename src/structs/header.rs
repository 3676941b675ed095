//! BLUE primary header parsing.
//!
//! The primary header is a fixed 512-byte region at the start of the
//! file. Byte offsets below are the X-Midas wire contract:
//!
//! | offset | field | width |
//! |--------|-------|-------|
//! | 0   | version    | 4 chars, "BLUE" |
//! | 4   | head_rep   | 4 chars, "EEEI"/"IEEI" |
//! | 8   | data_rep   | 4 chars, "EEEI"/"IEEI" |
//! | 24  | ext_start  | i32, 512-byte blocks |
//! | 28  | ext_size   | i32, bytes |
//! | 32  | data_start | f64, byte offset |
//! | 40  | data_size  | f64, bytes |
//! | 48  | type       | i32 |
//! | 52  | format     | 2 chars |
//! | 56  | timecode   | f64 |
//! | 256 | adjunct    | class-dependent axis block |
//!
//! All scalar fields after `head_rep` are read in the byte order it
//! names; the sample payload is read in `data_rep` order.

use std::fmt::{Display, Formatter};

use anyhow::{Result, bail, ensure};
use log::{trace, warn};

use crate::structs::data::DataView;
use crate::structs::format::FormatCode;
use crate::structs::keyword::{ExtHeader, ExtHeaderKind};
use crate::utils::errors::{FormatError, HeaderError};
use crate::utils::numeric::ascii_to_string;

/// Primary header length in bytes.
pub const HEADER_SIZE: usize = 512;

/// Unit of the `ext_start` field.
pub const EXT_BLOCK_SIZE: usize = 512;

/// Byte order named by a `head_rep`/`data_rep` tag.
///
/// The tags spell the significance order of a 4-byte word:
/// `"EEEI"` is big-endian, `"IEEI"` little-endian. Any other tag is
/// unusable since no field can be read without a known order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "EEEI" => Ok(Self::Big),
            "IEEI" => Ok(Self::Little),
            _ => bail!(HeaderError::UnknownByteOrder(tag.to_string())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Big => "EEEI",
            Self::Little => "IEEI",
        }
    }

    pub fn is_little(self) -> bool {
        self == Self::Little
    }

    pub(crate) fn read_i16(self, bytes: &[u8]) -> i16 {
        let raw = bytes.try_into().expect("2-byte slice");
        match self {
            Self::Big => i16::from_be_bytes(raw),
            Self::Little => i16::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_i32(self, bytes: &[u8]) -> i32 {
        let raw = bytes.try_into().expect("4-byte slice");
        match self {
            Self::Big => i32::from_be_bytes(raw),
            Self::Little => i32::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_f32(self, bytes: &[u8]) -> f32 {
        let raw = bytes.try_into().expect("4-byte slice");
        match self {
            Self::Big => f32::from_be_bytes(raw),
            Self::Little => f32::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_f64(self, bytes: &[u8]) -> f64 {
        let raw = bytes.try_into().expect("8-byte slice");
        match self {
            Self::Big => f64::from_be_bytes(raw),
            Self::Little => f64::from_le_bytes(raw),
        }
    }
}

impl Display for ByteOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Decode configuration.
#[derive(Default)]
pub struct HeaderOptions<'a> {
    /// Output shape for the extension header.
    pub ext_header_type: ExtHeaderKind<'a>,
}

/// Fully decoded BLUE file header.
///
/// One instance per decoded buffer; immutable after construction.
/// `ystart`/`ydelta`/`yunits` are populated only for class 2 (type
/// 2000) files, where the frame axis exists.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueHeader {
    /// File magic, always "BLUE".
    pub version: String,
    /// Byte order of the header fields.
    pub head_rep: ByteOrder,
    /// Byte order of the sample payload.
    pub data_rep: ByteOrder,
    /// Extension header location in 512-byte blocks.
    pub ext_start: i32,
    /// Extension header length in bytes.
    pub ext_size: i32,
    /// Byte offset of the sample payload.
    pub data_start: f64,
    /// Sample payload length in bytes.
    pub data_size: f64,
    /// File type code, 1000 (1-D) or 2000 (2-D framed).
    pub file_type: i32,
    /// `file_type / 1000`.
    pub class: i32,
    /// Two-character sample format code.
    pub format: FormatCode,
    pub timecode: f64,

    pub xstart: f64,
    pub xdelta: f64,
    pub xunits: i32,
    /// Frame length; 1 for class 1 files.
    pub subsize: i32,
    pub ystart: Option<f64>,
    pub ydelta: Option<f64>,
    pub yunits: Option<i32>,

    /// Samples per atom.
    pub spa: u32,
    /// Bytes per sample; fractional for packed formats.
    pub bps: f64,
    /// Bytes per atom.
    pub bpa: f64,
    /// Atoms per element.
    pub ape: u32,
    /// Bytes per element.
    pub bpe: f64,
    /// Element count, `data_size / bpe`.
    pub size: f64,

    /// Typed view over the sample payload.
    pub dview: DataView,
    /// Decoded keyword metadata.
    pub ext_header: ExtHeader,
}

impl BlueHeader {
    /// Decodes a BLUE file held in `buf` in one synchronous pass.
    ///
    /// `buf` is never mutated; the returned header owns its decoded
    /// payload view. Payload and extension ranges that extend past the
    /// buffer are clamped with a warning rather than faulting, so a
    /// truncated file still yields the prefix that is present.
    pub fn from_bytes(buf: &[u8], options: HeaderOptions<'_>) -> Result<Self> {
        ensure!(
            buf.len() >= HEADER_SIZE,
            HeaderError::TruncatedHeader(buf.len())
        );

        let version = ascii_to_string(&buf[0..4]);
        if version != "BLUE" {
            bail!(HeaderError::InvalidVersion(version));
        }

        let head_rep = ByteOrder::from_tag(&ascii_to_string(&buf[4..8]))?;
        let data_rep = ByteOrder::from_tag(&ascii_to_string(&buf[8..12]))?;

        let ext_start = head_rep.read_i32(&buf[24..28]);
        let ext_size = head_rep.read_i32(&buf[28..32]);
        let data_start = head_rep.read_f64(&buf[32..40]);
        let data_size = head_rep.read_f64(&buf[40..48]);
        let file_type = head_rep.read_i32(&buf[48..52]);
        let format = FormatCode::new(buf[52], buf[53]);
        let timecode = head_rep.read_f64(&buf[56..64]);

        let class = file_type / 1000;

        // Class-dependent adjunct block at offset 256.
        let xstart = head_rep.read_f64(&buf[256..264]);
        let xdelta = head_rep.read_f64(&buf[264..272]);
        let xunits = head_rep.read_i32(&buf[272..276]);

        let (subsize, ystart, ydelta, yunits) = if class == 2 {
            (
                head_rep.read_i32(&buf[276..280]),
                Some(head_rep.read_f64(&buf[280..288])),
                Some(head_rep.read_f64(&buf[288..296])),
                Some(head_rep.read_i32(&buf[296..300])),
            )
        } else {
            (1, None, None, None)
        };

        // A class 2 element is a whole frame of atoms.
        let ape = if class == 2 { subsize.max(0) as u32 } else { 1 };
        let geometry = format
            .geometry(ape)
            .ok_or_else(|| FormatError::Unsupported(format.to_string()))?;
        let size = data_size / geometry.bpe;

        let data_begin = ((data_start.max(0.0)) as usize).min(buf.len());
        let data_end = ((data_start + data_size).max(0.0) as usize)
            .max(data_begin)
            .min(buf.len());
        if ((data_start + data_size) as usize) > buf.len() {
            warn!(
                "truncated file: data segment ends at {} but buffer holds {} bytes",
                data_start + data_size,
                buf.len()
            );
        }

        let dview = DataView::read(&buf[data_begin..data_end], format, data_rep)?;

        let ext_header = if ext_size > 0 {
            let ext_begin = (ext_start.max(0) as usize * EXT_BLOCK_SIZE).min(buf.len());
            let ext_end = (ext_begin + ext_size as usize).min(buf.len());
            if ext_begin + ext_size as usize > buf.len() {
                warn!(
                    "truncated file: extension header ends at {} but buffer holds {} bytes",
                    ext_start.max(0) as usize * EXT_BLOCK_SIZE + ext_size as usize,
                    buf.len()
                );
            }
            ExtHeader::read(&buf[ext_begin..ext_end], head_rep, options.ext_header_type)
        } else {
            ExtHeader::read(&[], head_rep, options.ext_header_type)
        };

        let header = Self {
            version,
            head_rep,
            data_rep,
            ext_start,
            ext_size,
            data_start,
            data_size,
            file_type,
            class,
            format,
            timecode,
            xstart,
            xdelta,
            xunits,
            subsize,
            ystart,
            ydelta,
            yunits,
            spa: geometry.spa,
            bps: geometry.bps,
            bpa: geometry.bpa,
            ape: geometry.ape,
            bpe: geometry.bpe,
            size,
            dview,
            ext_header,
        };

        trace!(
            "BLUE header: type {} format {} size {} data [{}, {}) ext [{} blocks, {} bytes)",
            header.file_type,
            header.format,
            header.size,
            header.data_start,
            header.data_start + header.data_size,
            header.ext_start,
            header.ext_size,
        );

        Ok(header)
    }
}
