#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    #[error("Buffer too short for primary header: {0} bytes, need 512")]
    TruncatedHeader(usize),

    #[error("Invalid version field. Read {0:?}, expected \"BLUE\"")]
    InvalidVersion(String),

    #[error("Unknown byte order tag {0:?}, expected \"EEEI\" or \"IEEI\"")]
    UnknownByteOrder(String),
}

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("Unsupported data format code {0:?}")]
    Unsupported(String),
}

#[derive(thiserror::Error, Debug)]
pub enum KeywordError {
    #[error("Keyword record header at offset {0} extends past the extension header")]
    TruncatedRecord(usize),

    #[error("Keyword length {lkey} at offset {offset} overruns the extension header")]
    RecordOverrun { offset: usize, lkey: i32 },

    #[error("Keyword length {lkey} at offset {offset} is shorter than its own header ({lext})")]
    RecordLengthInvalid { offset: usize, lkey: i32, lext: i16 },
}
