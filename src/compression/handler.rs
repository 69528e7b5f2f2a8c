//! Compression handler trait definition

use crate::tiff::errors::{TiffError, TiffResult};

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip or tile
    ///
    /// `expected_len` is the decoded size the chunk must have; shorter
    /// output is an error, trailing bytes are discarded.
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}

/// Checks a decoded chunk against its expected size
pub(crate) fn fit_to_length(mut decoded: Vec<u8>, expected_len: usize, name: &str) -> TiffResult<Vec<u8>> {
    if decoded.len() < expected_len {
        return Err(TiffError::Malformed(format!(
            "{} chunk decoded to {} bytes, expected {}", name, decoded.len(), expected_len)));
    }
    decoded.truncate(expected_len);
    Ok(decoded)
}
