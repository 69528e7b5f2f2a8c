//! Handler for ZSTD compressed data

use log::{trace, warn};

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::{fit_to_length, CompressionHandler};

/// ZSTD compression handler (compression code 50000)
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let decompressed_data = zstd::decode_all(data).map_err(|e| {
            warn!("ZSTD decompression error: {}", e);
            TiffError::Malformed(format!("ZSTD decompression error: {}", e))
        })?;
        trace!("ZSTD: {} -> {} bytes", data.len(), decompressed_data.len());
        fit_to_length(decompressed_data, expected_len, self.name())
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        compression::ZSTD
    }
}
