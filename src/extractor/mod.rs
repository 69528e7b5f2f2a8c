//! Band extraction from GeoTIFF pixel data
//!
//! The first IFD's samples are decoded into one row-major byte buffer in
//! file byte order, using a strip or tile strategy depending on how the
//! file is organized.

mod layout;
mod predictor;
mod strip_reader;
mod tile_reader;

pub use layout::BandLayout;
pub use predictor::undo_horizontal_differencing;
pub use strip_reader::StripReader;
pub use tile_reader::TileReader;

use std::io::SeekFrom;

use log::debug;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::tiff::TiffReader;

/// Strategy for decoding a complete band
pub trait BandExtractor {
    /// Decoded samples of the whole band, row-major
    fn extract_band(&mut self) -> TiffResult<Vec<u8>>;
}

/// Picks the strip or tile strategy for `ifd`
pub fn create_extractor<'a>(
    reader: &'a mut dyn SeekableReader,
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
    layout: BandLayout,
) -> Box<dyn BandExtractor + 'a> {
    if ifd.is_tiled() {
        debug!("Using tile reader");
        Box::new(TileReader::new(reader, ifd, tiff_reader, layout))
    } else {
        debug!("Using strip reader");
        Box::new(StripReader::new(reader, ifd, tiff_reader, layout))
    }
}

/// Reads `byte_count` raw bytes at `offset`
pub(crate) fn read_chunk(reader: &mut dyn SeekableReader, offset: u64, byte_count: u64) -> TiffResult<Vec<u8>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut data = vec![0u8; byte_count as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}
