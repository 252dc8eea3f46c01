use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReactiveError {
    #[error("value contains a circular reference")]
    CircularReference,
    #[error("array has no settable property {key:?}")]
    UnsupportedArrayKey { key: String },
    #[error("classification flag {key} cannot be stored")]
    ReservedKey { key: String },
    #[error("growing an array of length {len} to {index} would pad too many slots")]
    GapTooLarge { index: usize, len: usize },
    #[error("array length must be a non-negative integer")]
    InvalidLength,
}
