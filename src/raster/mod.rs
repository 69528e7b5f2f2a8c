//! Georeferenced single-band raster
//!
//! `RasterSource` is the decoded form of a flood GeoTIFF: the first band's
//! samples plus everything needed to place them on the map.

pub mod affine;
pub mod band;

pub use affine::AffineTransform;
pub use band::{BandData, SampleType};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info, warn};

use crate::coordinate::{CoordinateSystem, CoordinateSystemFactory};
use crate::errors::{FloodError, FloodResult};
use crate::extractor::{create_extractor, BandLayout};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{tags, USER_DEFINED};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geo_key_parser::{GeoInfo, GeoKeyParser};
use crate::tiff::ifd::IFD;
use crate::tiff::TiffReader;

/// One band of a GeoTIFF with its georeferencing
#[derive(Debug, Clone)]
pub struct RasterSource {
    pub width: usize,
    pub height: usize,
    /// Samples in row-major order
    pub band: BandData,
    /// No-data sentinel of the band, if the file declares one
    pub nodata: Option<f64>,
    pub crs: CoordinateSystem,
    pub transform: AffineTransform,
}

impl RasterSource {
    /// Opens and decodes the raster at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - GeoTIFF or BigTIFF file, any byte order
    ///
    /// # Returns
    ///
    /// The first band of the full resolution image with its CRS, affine
    /// transform and no-data value, or an error if the file cannot be
    /// decoded or its CRS is not supported
    pub fn open<P: AsRef<Path>>(path: P) -> FloodResult<Self> {
        let path = path.as_ref();
        info!("Reading raster {}", path.display());
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        Self::from_reader(&mut reader)
    }

    /// Decodes a raster from any seekable source
    pub fn from_reader(reader: &mut dyn SeekableReader) -> FloodResult<Self> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.read(reader)?;
        debug!("{}", tiff);

        if tiff.ifd_count() > 1 {
            debug!("Ignoring {} additional IFDs ({} overviews)", tiff.ifd_count() - 1, tiff.overview_count());
        }
        let ifd = tiff.main_ifd().ok_or(TiffError::MissingDimensions)?;

        let geo_info = GeoKeyParser::extract_geo_info(&tiff_reader, reader, ifd)?;
        let crs = resolve_crs(&geo_info)?;
        let transform = AffineTransform::from_geo_info(&geo_info)?;
        let nodata = read_nodata(&tiff_reader, reader, ifd)?;

        let layout = BandLayout::from_ifd(&tiff_reader, reader, ifd)?;
        let bytes = create_extractor(reader, ifd, &tiff_reader, layout).extract_band()?;
        let band = BandData::from_bytes(layout.sample_type, &bytes, layout.byte_order);

        info!("Raster {}x{} {} in {}, nodata {:?}",
              layout.width, layout.height, layout.sample_type.name(), crs.description(), nodata);

        Ok(RasterSource {
            width: layout.width,
            height: layout.height,
            band,
            nodata,
            crs,
            transform,
        })
    }

    /// Number of pixels in the band
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// CRS from ProjectedCSTypeGeoKey, falling back to GeographicTypeGeoKey
fn resolve_crs(geo_info: &GeoInfo) -> FloodResult<CoordinateSystem> {
    match geo_info.epsg_code() {
        Some(USER_DEFINED) => Err(FloodError::Crs(
            "Raster uses a user-defined coordinate system".to_string())),
        Some(code) => CoordinateSystemFactory::from_epsg(code as u32),
        None => Err(FloodError::Crs("Raster declares no coordinate system".to_string())),
    }
}

/// GDAL_NODATA of the band, parsed as f64
fn read_nodata(tiff_reader: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> TiffResult<Option<f64>> {
    if !ifd.has_tag(tags::GDAL_NODATA) {
        warn!("Raster has no nodata value, every pixel is treated as valid");
        return Ok(None);
    }

    let text = tiff_reader.read_tag_ascii(reader, ifd, tags::GDAL_NODATA)?;
    let value = text.trim().parse::<f64>().map_err(|_| {
        TiffError::Malformed(format!("Invalid GDAL_NODATA value: {:?}", text))
    })?;

    Ok(Some(value))
}
