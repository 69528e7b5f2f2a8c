//! Handler for LZW compressed data

use log::{trace, warn};
use weezl::decode::Decoder;
use weezl::BitOrder;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::{fit_to_length, CompressionHandler};

/// LZW compression handler (compression code 5)
///
/// TIFF writes LZW codes most significant bit first and widens the code
/// size one code early, which `weezl` calls the TIFF size switch.
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = Decoder::with_tiff_size_switch(BitOrder::Msb, 8);
        let decompressed_data = decoder.decode(data).map_err(|e| {
            warn!("LZW decompression error: {}", e);
            TiffError::Malformed(format!("LZW decompression error: {}", e))
        })?;
        trace!("LZW: {} -> {} bytes", data.len(), decompressed_data.len());
        fit_to_length(decompressed_data, expected_len, self.name())
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        compression::LZW
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weezl::encode::Encoder;

    fn lzw(data: &[u8]) -> Vec<u8> {
        Encoder::with_tiff_size_switch(BitOrder::Msb, 8).encode(data).unwrap()
    }

    #[test]
    fn test_decompress_strip() {
        // Long enough to push the code size past 9 bits
        let raw: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        assert_eq!(LzwHandler.decompress(&lzw(&raw), raw.len()).unwrap(), raw);
    }

    #[test]
    fn test_short_output_is_error() {
        let raw = vec![3u8; 16];
        assert!(LzwHandler.decompress(&lzw(&raw), 32).is_err());
    }
}
