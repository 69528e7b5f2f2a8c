//! Errors raised while decoding the GeoTIFF container
//!
//! Anything wrong with the bytes of the file (header, directories, tags,
//! pixel chunks) ends up here. Problems with what the file means, such as
//! an unsupported CRS, are reported by `crate::errors::FloodError`.

use std::fmt;
use std::io;

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

/// TIFF decoding failures
#[derive(Debug)]
pub enum TiffError {
    IoError(io::Error),
    /// First IFD offset missing or outside the file
    InvalidHeader,
    /// First two bytes are neither `II` nor `MM`
    InvalidByteOrder(u16),
    /// BigTIFF offset size other than 8, or non-zero reserved field
    InvalidBigTIFFHeader,
    UnsupportedVersion(u16),
    TagNotFound(u16),
    UnsupportedFieldType(u16),
    UnsupportedCompression(u64),
    /// Pixel layout this decoder does not handle (samples, predictor, bit depth)
    UnsupportedLayout(String),
    /// ImageWidth or ImageLength missing or zero
    MissingDimensions,
    /// Structure that contradicts itself or the file size
    Malformed(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Required tag {} ({}) not found", tag, crate::tiff::ifd::tag_name(*tag)),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::UnsupportedLayout(msg) => write!(f, "Unsupported pixel layout: {}", msg),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::Malformed(msg) => write!(f, "Malformed TIFF: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}
