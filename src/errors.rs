//! Pipeline-level error type
//!
//! Container decoding failures stay `TiffError`; everything above the
//! GeoTIFF layer (georeferencing, reprojection, region lookup, output)
//! reports a `FloodError`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use arrow_schema::ArrowError;
use parquet::errors::ParquetError;

use crate::tiff::errors::TiffError;

/// Errors raised while converting a flood raster to a point table
#[derive(Debug)]
pub enum FloodError {
    /// File system error outside TIFF decoding
    Io(io::Error),
    /// Malformed or unsupported GeoTIFF
    Tiff(TiffError),
    /// Missing, unsupported or failing coordinate reference system
    Crs(String),
    /// Inconsistent table contents
    Validation(String),
    /// Region name that is not one of the fixed regions
    UnknownFilter {
        /// Name that was requested
        name: String,
        /// Every accepted region name
        valid: Vec<&'static str>,
    },
    /// Output path already exists
    OutputExists(PathBuf),
    /// Parquet encoding or decoding failure
    Parquet(ParquetError),
    /// Arrow array or schema failure
    Arrow(ArrowError),
}

impl fmt::Display for FloodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloodError::Io(e) => write!(f, "I/O error: {}", e),
            FloodError::Tiff(e) => write!(f, "GeoTIFF error: {}", e),
            FloodError::Crs(msg) => write!(f, "CRS error: {}", msg),
            FloodError::Validation(msg) => write!(f, "Validation error: {}", msg),
            FloodError::UnknownFilter { name, valid } => write!(
                f,
                "unrecognized filter: {}. must select from: {}",
                name,
                valid.join(", ")
            ),
            FloodError::OutputExists(path) => write!(f, "Output file already exists: {}", path.display()),
            FloodError::Parquet(e) => write!(f, "Parquet error: {}", e),
            FloodError::Arrow(e) => write!(f, "Arrow error: {}", e),
        }
    }
}

impl std::error::Error for FloodError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FloodError::Io(e) => Some(e),
            FloodError::Tiff(e) => Some(e),
            FloodError::Parquet(e) => Some(e),
            FloodError::Arrow(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FloodError {
    fn from(error: io::Error) -> Self {
        FloodError::Io(error)
    }
}

impl From<TiffError> for FloodError {
    fn from(error: TiffError) -> Self {
        FloodError::Tiff(error)
    }
}

impl From<proj4rs::errors::Error> for FloodError {
    fn from(error: proj4rs::errors::Error) -> Self {
        FloodError::Crs(error.to_string())
    }
}

impl From<ParquetError> for FloodError {
    fn from(error: ParquetError) -> Self {
        FloodError::Parquet(error)
    }
}

impl From<ArrowError> for FloodError {
    fn from(error: ArrowError) -> Self {
        FloodError::Arrow(error)
    }
}

/// Result type for pipeline operations
pub type FloodResult<T> = Result<T, FloodError>;
