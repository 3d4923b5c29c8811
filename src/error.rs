use crate::boxes::FourCC;

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("truncated box header: need {needed} bytes, {available} available")]
    TruncatedHeader { needed: usize, available: usize },
    #[error("truncated box: need {needed} bytes, {available} available")]
    TruncatedChild { needed: u64, available: u64 },
    #[error("truncated input: expected {expected} more bytes, got {read}")]
    TruncatedInput { expected: u64, read: u64 },
    #[error("container size mismatch: children consume {consumed} bytes of declared {declared}")]
    SizeMismatch { consumed: u64, declared: u64 },
    #[error("malformed '{typ}' box: {reason}")]
    MalformedBox { typ: FourCC, reason: String },
    #[error("invalid descriptor tag: expected {expected:#04x}, found {found:#04x}")]
    InvalidDescriptorTag { expected: u8, found: u8 },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
