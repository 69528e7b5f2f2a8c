//! Pixel layout of the band to decode

use log::debug;

use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::raster::band::SampleType;
use crate::tiff::constants::{compression, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Everything needed to turn strips or tiles into a sample buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    pub width: usize,
    pub height: usize,
    pub sample_type: SampleType,
    pub compression: u64,
    pub predictor: u64,
    pub byte_order: ByteOrder,
}

impl BandLayout {
    /// Reads and validates the layout tags of `ifd`
    ///
    /// Only single-sample, chunky rasters are accepted. Horizontal
    /// differencing is supported for integer samples; the floating point
    /// predictor is not.
    pub fn from_ifd(tiff_reader: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        if width == 0 || height == 0 {
            return Err(TiffError::MissingDimensions);
        }

        let samples_per_pixel = ifd.get_samples_per_pixel();
        if samples_per_pixel != 1 {
            return Err(TiffError::UnsupportedLayout(format!(
                "{} samples per pixel, only single-band rasters are supported", samples_per_pixel)));
        }

        let planar = ifd.get_tag_value(tags::PLANAR_CONFIGURATION).unwrap_or(planar_config::CHUNKY);
        debug!("Planar configuration: {}", planar);

        let bits = if ifd.has_tag(tags::BITS_PER_SAMPLE) {
            tiff_reader.read_tag_values(reader, ifd, tags::BITS_PER_SAMPLE)?
                .first()
                .copied()
                .unwrap_or(1)
        } else {
            1
        };
        let format = if ifd.has_tag(tags::SAMPLE_FORMAT) {
            tiff_reader.read_tag_values(reader, ifd, tags::SAMPLE_FORMAT)?
                .first()
                .copied()
                .unwrap_or(sample_format::UNSIGNED)
        } else {
            sample_format::UNSIGNED
        };
        let sample_type = SampleType::from_tiff(format, bits)?;

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE);
        let predictor = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE);
        match predictor {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING if !sample_type.is_float() => {}
            predictor::HORIZONTAL_DIFFERENCING => {
                return Err(TiffError::UnsupportedLayout(
                    "horizontal predictor on floating point samples".to_string()));
            }
            predictor::FLOATING_POINT => {
                return Err(TiffError::UnsupportedLayout("floating point predictor".to_string()));
            }
            other => return Err(TiffError::UnsupportedLayout(format!("predictor {}", other))),
        }

        let layout = BandLayout {
            width: width as usize,
            height: height as usize,
            sample_type,
            compression,
            predictor,
            byte_order: tiff_reader.byte_order()?,
        };
        layout.band_bytes()?;

        debug!("Band layout: {}x{} {}, compression {}, predictor {}",
               layout.width, layout.height, sample_type.name(), compression, predictor);
        Ok(layout)
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.sample_type.bytes()
    }

    /// Size of the decoded band in bytes
    pub fn band_bytes(&self) -> TiffResult<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.bytes_per_sample()))
            .ok_or_else(|| TiffError::Malformed(format!(
                "Raster of {}x{} pixels is too large", self.width, self.height)))
    }
}
