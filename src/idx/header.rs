//! Big-endian header handling shared by the idx1 and idx3 containers.
//!
//! Every IDX file starts with a 32-bit big-endian magic number:
//! ```text
//! bytes 0-1:  0x00 0x00   (reserved, must be zero)
//! byte  2:    dtype       (0x08 = uint8, 0x09 = int8, 0x0B = i16,
//!                          0x0C = i32, 0x0D = f32, 0x0E = f64)
//! byte  3:    number of dimensions (0x01 labels, 0x03 images)
//! ```
//! followed by one big-endian u32 per dimension, then the payload.

use crate::config::LoadConfig;
use crate::error::IdxError;

/// Magic number of an idx1 unsigned-byte label file (2049).
pub const LABEL_MAGIC: u32 = 0x0000_0801;
/// Magic number of an idx3 unsigned-byte image file (2051).
pub const IMAGE_MAGIC: u32 = 0x0000_0803;

pub const LABEL_HEADER_LEN: usize = 8;
pub const IMAGE_HEADER_LEN: usize = 16;

/// Element type encoded in byte 2 of the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    UnsignedByte = 0x08,
    SignedByte = 0x09,
    Short = 0x0B,
    Int = 0x0C,
    Float = 0x0D,
    Double = 0x0E,
}

impl DataType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x08 => Some(DataType::UnsignedByte),
            0x09 => Some(DataType::SignedByte),
            0x0B => Some(DataType::Short),
            0x0C => Some(DataType::Int),
            0x0D => Some(DataType::Float),
            0x0E => Some(DataType::Double),
            _ => None,
        }
    }
}

/// Which container a buffer belongs to, judged by its dimensionality byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdxKind {
    Labels,
    Images,
}

impl IdxKind {
    pub fn sniff(bytes: &[u8]) -> Option<IdxKind> {
        match bytes.get(3)? {
            0x01 => Some(IdxKind::Labels),
            0x03 => Some(IdxKind::Images),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> u8 {
        match self {
            IdxKind::Labels => 0x01,
            IdxKind::Images => 0x03,
        }
    }

    pub fn header_len(&self) -> usize {
        match self {
            IdxKind::Labels => LABEL_HEADER_LEN,
            IdxKind::Images => IMAGE_HEADER_LEN,
        }
    }

    pub fn magic(&self) -> u32 {
        match self {
            IdxKind::Labels => LABEL_MAGIC,
            IdxKind::Images => IMAGE_MAGIC,
        }
    }
}

/// Decodes the big-endian u32 at `offset`. Caller guarantees 4 bytes exist.
#[inline]
pub fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
pub fn push_be_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Checks size floor, reserved/dtype bytes, dimensionality and the magic of
/// `bytes` against `kind`. Does not look at the payload.
pub fn validate_header(bytes: &[u8], kind: IdxKind, config: &LoadConfig) -> Result<u32, IdxError> {
    let minimum = config.min_file_size.max(kind.header_len());
    if bytes.len() < minimum {
        return Err(IdxError::TooShort { len: bytes.len(), minimum });
    }

    if bytes[3] != kind.dimensions() {
        return Err(IdxError::DimensionMismatch {
            expected: kind.dimensions(),
            found: bytes[3],
        });
    }

    let magic = read_be_u32(bytes, 0);
    if config.check_dtype {
        if bytes[0] != 0x00 || bytes[1] != 0x00 {
            return Err(IdxError::ReservedBytes(bytes[0], bytes[1]));
        }
        if DataType::from_u8(bytes[2]) != Some(DataType::UnsignedByte) {
            return Err(IdxError::UnsupportedDataType(bytes[2]));
        }
        if magic != kind.magic() {
            return Err(IdxError::MagicMismatch { expected: kind.magic(), found: magic });
        }
    }

    Ok(magic)
}

/// Checks that `header_len + payload_len` fits in `len`, honouring
/// `allow_trailing_bytes`.
pub fn validate_payload(
    len: usize,
    header_len: usize,
    payload_len: usize,
    config: &LoadConfig,
) -> Result<(), IdxError> {
    let declared = header_len.checked_add(payload_len).ok_or(IdxError::Overflow)?;
    if len < declared {
        return Err(IdxError::Truncated { declared, available: len });
    }
    if !config.allow_trailing_bytes && len > declared {
        return Err(IdxError::TrailingBytes { extra: len - declared });
    }
    Ok(())
}
