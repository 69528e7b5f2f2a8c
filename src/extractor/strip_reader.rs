//! Strip-based band extraction
//!
//! Stripped TIFFs organize image data in horizontal strips across the
//! entire width of the image. Strips are decoded in order and appended,
//! which yields the band in row-major order.

use log::{debug, trace};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{predictor, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::TiffReader;

use super::layout::BandLayout;
use super::predictor::undo_horizontal_differencing;
use super::{read_chunk, BandExtractor};

/// Reads the band of a stripped TIFF
pub struct StripReader<'a> {
    /// Reader for accessing the TIFF file
    reader: &'a mut dyn SeekableReader,
    /// IFD containing the image metadata
    ifd: &'a IFD,
    /// TIFF reader for accessing tag values
    tiff_reader: &'a TiffReader,
    layout: BandLayout,
}

impl<'a> StripReader<'a> {
    pub fn new(
        reader: &'a mut dyn SeekableReader,
        ifd: &'a IFD,
        tiff_reader: &'a TiffReader,
        layout: BandLayout,
    ) -> Self {
        StripReader {
            reader,
            ifd,
            tiff_reader,
            layout,
        }
    }

    /// Rows per strip, defaulting to the full image height
    fn rows_per_strip(&self) -> usize {
        match self.ifd.get_tag_value(tags::ROWS_PER_STRIP) {
            Some(rows) if rows > 0 => (rows as usize).min(self.layout.height),
            _ => self.layout.height,
        }
    }

    /// Read and decode a single strip of `rows` rows
    fn read_strip(
        &mut self,
        offset: u64,
        byte_count: u64,
        handler: &dyn CompressionHandler,
        rows: usize,
    ) -> TiffResult<Vec<u8>> {
        let row_bytes = self.layout.width * self.layout.bytes_per_sample();
        let compressed = read_chunk(self.reader, offset, byte_count)?;
        let mut strip = handler.decompress(&compressed, rows * row_bytes)?;

        if self.layout.predictor == predictor::HORIZONTAL_DIFFERENCING {
            undo_horizontal_differencing(
                &mut strip,
                self.layout.width,
                self.layout.bytes_per_sample(),
                self.layout.byte_order,
            );
        }

        Ok(strip)
    }
}

impl<'a> BandExtractor for StripReader<'a> {
    fn extract_band(&mut self) -> TiffResult<Vec<u8>> {
        let rows_per_strip = self.rows_per_strip();
        let strip_count = (self.layout.height + rows_per_strip - 1) / rows_per_strip;

        let handler = CompressionFactory::create_handler(self.layout.compression)?;
        debug!("Using compression: {} ({})", handler.name(), handler.code());

        let offsets = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::STRIP_BYTE_COUNTS)?;

        if offsets.len() < strip_count || byte_counts.len() < strip_count {
            return Err(TiffError::Malformed(format!(
                "Expected {} strips, found {} offsets and {} byte counts",
                strip_count, offsets.len(), byte_counts.len())));
        }

        debug!("Rows per strip: {}, total strips: {}", rows_per_strip, strip_count);

        let mut band = Vec::with_capacity(self.layout.band_bytes()?);
        for strip in 0..strip_count {
            let rows = rows_per_strip.min(self.layout.height - strip * rows_per_strip);
            trace!("Reading strip {} at offset {} with {} bytes", strip, offsets[strip], byte_counts[strip]);
            let data = self.read_strip(offsets[strip], byte_counts[strip], handler.as_ref(), rows)?;
            band.extend_from_slice(&data);
        }

        Ok(band)
    }
}
