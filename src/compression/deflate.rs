//! Handler for Adobe Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use log::trace;

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::{fit_to_length, CompressionHandler};

/// Adobe Deflate (Zlib) compression handler (compression codes 8 and 32946)
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::with_capacity(expected_len);
        decoder.read_to_end(&mut decompressed_data).map_err(TiffError::IoError)?;
        trace!("Deflate: {} -> {} bytes", data.len(), decompressed_data.len());
        fit_to_length(decompressed_data, expected_len, self.name())
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        8
    }
}
