//! GeoTIFF Metadata and GeoKey parsing functionality
//!
//! This module provides utilities for parsing and interpreting
//! geographic metadata stored in TIFF files according to the GeoTIFF standard.

use log::debug;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{geo_keys, raster_type, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// One key of the GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    /// GeoKey identifier
    pub key_id: u16,
    /// Tag holding the value, 0 when the value is stored in `value_offset`
    pub tiff_tag_location: u16,
    /// Number of values
    pub count: u16,
    /// Value, or index into the tag named by `tiff_tag_location`
    pub value_offset: u16,
}

impl GeoKeyEntry {
    /// Value of a key stored directly in the directory
    pub fn short_value(&self) -> Option<u16> {
        if self.tiff_tag_location == 0 {
            Some(self.value_offset)
        } else {
            None
        }
    }
}

/// Parser for GeoTIFF geographic metadata
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parse the GeoKey directory from an IFD
    ///
    /// The directory is a SHORT array: a four-value header (version, revision,
    /// minor revision, key count) followed by four values per key. Returns an
    /// empty list when the IFD has no GeoKey directory.
    pub fn parse_geo_key_directory(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let values = tiff_reader.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
        if values.len() < 4 {
            return Err(TiffError::Malformed("Invalid GeoKey directory header".to_string()));
        }

        let num_keys = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], num_keys);

        let key_values = &values[4..];
        if key_values.len() < num_keys * 4 {
            return Err(TiffError::Malformed(format!(
                "GeoKey directory declares {} keys but holds {} values", num_keys, key_values.len())));
        }

        let geo_keys = key_values
            .chunks_exact(4)
            .take(num_keys)
            .map(|key| GeoKeyEntry {
                key_id: key[0] as u16,
                tiff_tag_location: key[1] as u16,
                count: key[2] as u16,
                value_offset: key[3] as u16,
            })
            .inspect(|key| debug!("GeoKey: id={}, location={}, count={}, value={}",
                                  key.key_id, key.tiff_tag_location, key.count, key.value_offset))
            .collect();

        Ok(geo_keys)
    }

    /// Extract geospatial information from a TIFF IFD
    ///
    /// Collects the CRS keys, raster type and the model tags needed to build
    /// an affine transform. Tags that are absent stay `None`; deciding whether
    /// the result is usable is left to the caller.
    pub fn extract_geo_info(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<GeoInfo> {
        let mut geo_info = GeoInfo::default();

        for key in Self::parse_geo_key_directory(tiff_reader, reader, ifd)? {
            match key.key_id {
                geo_keys::PROJECTED_CS_TYPE => geo_info.projected_cs_code = key.short_value(),
                geo_keys::GEOGRAPHIC_TYPE => geo_info.geographic_cs_code = key.short_value(),
                geo_keys::RASTER_TYPE => {
                    if let Some(value) = key.short_value() {
                        geo_info.raster_type = value;
                    }
                }
                _ => {}
            }
        }

        if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
            geo_info.model_transformation =
                Some(tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?);
        }
        if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) {
            geo_info.pixel_scale =
                Some(tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?);
        }
        if ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
            geo_info.tie_points =
                Some(tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TIEPOINT_TAG)?);
        }

        Ok(geo_info)
    }
}

/// Structure to hold geospatial information extracted from a GeoTIFF
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    /// ProjectedCSTypeGeoKey value
    pub projected_cs_code: Option<u16>,
    /// GeographicTypeGeoKey value
    pub geographic_cs_code: Option<u16>,
    /// GTRasterTypeGeoKey value, PixelIsArea when absent
    pub raster_type: u16,
    /// ModelPixelScaleTag values (sx, sy, sz)
    pub pixel_scale: Option<Vec<f64>>,
    /// ModelTiepointTag values (i, j, k, x, y, z, ...)
    pub tie_points: Option<Vec<f64>>,
    /// ModelTransformationTag, 4x4 row-major
    pub model_transformation: Option<Vec<f64>>,
}

impl Default for GeoInfo {
    fn default() -> Self {
        GeoInfo {
            projected_cs_code: None,
            geographic_cs_code: None,
            raster_type: raster_type::PIXEL_IS_AREA,
            pixel_scale: None,
            tie_points: None,
            model_transformation: None,
        }
    }
}

impl GeoInfo {
    /// EPSG code of the raster CRS, projected code first
    pub fn epsg_code(&self) -> Option<u16> {
        self.projected_cs_code.or(self.geographic_cs_code)
    }

    /// True when pixel coordinates refer to pixel centers
    pub fn is_pixel_is_point(&self) -> bool {
        self.raster_type == raster_type::PIXEL_IS_POINT
    }
}
