//! Tile-based band extraction
//!
//! Tiled TIFFs split the image into fixed-size rectangles. Every tile is
//! decoded at full tile size and its visible part copied into the band;
//! tiles along the right and bottom edges are padded in the file.

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

/// Reads the band of a tiled TIFF
pub struct TileReader<'a> {
    /// Reader for accessing the TIFF file
    reader: &'a mut dyn SeekableReader,
    /// IFD containing the image metadata
    ifd: &'a IFD,
    /// TIFF reader for accessing tag values
    tiff_reader: &'a TiffReader,
    layout: BandLayout,
}

impl<'a> TileReader<'a> {
    pub fn new(
        reader: &'a mut dyn SeekableReader,
        ifd: &'a IFD,
        tiff_reader: &'a TiffReader,
        layout: BandLayout,
    ) -> Self {
        TileReader {
            reader,
            ifd,
            tiff_reader,
            layout,
        }
    }

    /// Tile width and height in pixels
    fn get_tile_dimensions(&self) -> TiffResult<(usize, usize)> {
        let tile_width = self.ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0) as usize;
        let tile_height = self.ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0) as usize;

        if tile_width == 0 || tile_height == 0 {
            return Err(TiffError::Malformed(format!(
                "Invalid tile dimensions {}x{}", tile_width, tile_height)));
        }

        Ok((tile_width, tile_height))
    }

    /// Read and decode a single full-size tile
    fn read_tile(
        &mut self,
        offset: u64,
        byte_count: u64,
        handler: &dyn CompressionHandler,
        tile_width: usize,
        tile_height: usize,
    ) -> TiffResult<Vec<u8>> {
        let bytes_per_sample = self.layout.bytes_per_sample();
        let compressed = read_chunk(self.reader, offset, byte_count)?;
        let mut tile = handler.decompress(&compressed, tile_width * tile_height * bytes_per_sample)?;

        if self.layout.predictor == predictor::HORIZONTAL_DIFFERENCING {
            undo_horizontal_differencing(&mut tile, tile_width, bytes_per_sample, self.layout.byte_order);
        }

        Ok(tile)
    }
}

impl<'a> BandExtractor for TileReader<'a> {
    fn extract_band(&mut self) -> TiffResult<Vec<u8>> {
        let (tile_width, tile_height) = self.get_tile_dimensions()?;
        let width = self.layout.width;
        let height = self.layout.height;
        let bytes_per_sample = self.layout.bytes_per_sample();

        let tiles_across = (width + tile_width - 1) / tile_width;
        let tiles_down = (height + tile_height - 1) / tile_height;
        let tile_count = tiles_across * tiles_down;

        let handler = CompressionFactory::create_handler(self.layout.compression)?;
        debug!("Tile dimensions: {}x{}, {} tiles, compression: {} ({})",
               tile_width, tile_height, tile_count, handler.name(), handler.code());

        let offsets = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::TILE_OFFSETS)?;
        let byte_counts = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::TILE_BYTE_COUNTS)?;

        if offsets.len() < tile_count || byte_counts.len() < tile_count {
            return Err(TiffError::Malformed(format!(
                "Expected {} tiles, found {} offsets and {} byte counts",
                tile_count, offsets.len(), byte_counts.len())));
        }

        let row_bytes = width * bytes_per_sample;
        let tile_row_bytes = tile_width * bytes_per_sample;
        let mut band = vec![0u8; self.layout.band_bytes()?];

        for tile_y in 0..tiles_down {
            for tile_x in 0..tiles_across {
                let index = tile_y * tiles_across + tile_x;
                trace!("Reading tile ({},{}) at offset {} with {} bytes",
                       tile_x, tile_y, offsets[index], byte_counts[index]);

                let tile = self.read_tile(offsets[index], byte_counts[index], handler.as_ref(), tile_width, tile_height)?;

                let start_x = tile_x * tile_width;
                let start_y = tile_y * tile_height;
                let visible_cols = tile_width.min(width - start_x);
                let visible_rows = tile_height.min(height - start_y);
                let copy_bytes = visible_cols * bytes_per_sample;

                for row in 0..visible_rows {
                    let src = row * tile_row_bytes;
                    let dst = (start_y + row) * row_bytes + start_x * bytes_per_sample;
                    band[dst..dst + copy_bytes].copy_from_slice(&tile[src..src + copy_bytes]);
                }
            }
        }

        Ok(band)
    }
}
