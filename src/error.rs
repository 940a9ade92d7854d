//! Error types for IDX parsing and matrix construction.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while reading, validating, pairing or
/// exporting IDX data.
#[derive(Error, Debug)]
pub enum IdxError {
    #[error("Cannot read '{}'", path.display())]
    ReadFailed { path: PathBuf },

    #[error("IDX buffer too short: expected at least {minimum} bytes, got {len}")]
    TooShort { len: usize, minimum: usize },

    #[error("IDX header: bytes 0-1 must be 0x00 0x00 (reserved), got 0x{0:02X} 0x{1:02X}")]
    ReservedBytes(u8, u8),

    #[error("IDX header: byte 2 (dtype) must be 0x08 (uint8), got 0x{0:02X}")]
    UnsupportedDataType(u8),

    #[error("IDX header: byte 3 (dimensions) must be {expected}, got {found}")]
    DimensionMismatch { expected: u8, found: u8 },

    #[error("IDX header: magic must be {expected:#010x}, got {found:#010x}")]
    MagicMismatch { expected: u32, found: u32 },

    #[error("IDX payload truncated: header declares {declared} bytes, buffer holds {available}")]
    Truncated { declared: usize, available: usize },

    #[error("IDX payload has {extra} trailing bytes after the declared data")]
    TrailingBytes { extra: usize },

    #[error("IDX header: declared shape overflows usize")]
    Overflow,

    #[error("IDX count mismatch: {images} images but {labels} labels")]
    CountMismatch { images: usize, labels: usize },

    #[error("Label at index {index}: class {class} is out of range for n_classes={n_classes}")]
    ClassOutOfRange {
        index: usize,
        class: u8,
        n_classes: usize,
    },

    #[error("n_classes must be at least 2, got {0}")]
    TooFewClasses(usize),

    #[error("Image index {index} out of range for {count} images")]
    ImageOutOfRange { index: usize, count: usize },

    #[error("Pixel buffer of {len} bytes is not a whole number of {rows}x{cols} images")]
    RaggedPixels { len: usize, rows: u32, cols: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised by [`crate::Matrix`] constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Incompatible shapes ({0}, {1}) and ({2}, {3})")]
    ShapeMismatch(usize, usize, usize, usize),

    #[error("Matrix of {rows}x{cols} elements overflows usize")]
    Overflow { rows: usize, cols: usize },

    #[error("Allocation of a {rows}x{cols} matrix failed")]
    Allocation { rows: usize, cols: usize },

    #[error("Data of length {len} does not fill a {rows}x{cols} matrix")]
    DataLength { len: usize, rows: usize, cols: usize },
}
