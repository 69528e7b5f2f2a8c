//! Handler for uncompressed data

use crate::tiff::errors::TiffResult;
use super::handler::{fit_to_length, CompressionHandler};

/// Uncompressed data handler (compression code 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        fit_to_length(data.to_vec(), expected_len, self.name())
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u64 {
        1
    }
}
