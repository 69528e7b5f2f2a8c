//! Raster loading stage
//!
//! Turns a flood GeoTIFF into a `GeoTable` of its valid pixels with point
//! geometry in EPSG:4326.

use std::path::Path;

use log::info;

use crate::coordinate::CoordinateSystem;
use crate::errors::FloodResult;
use crate::raster::RasterSource;
use crate::table::{GeoTable, PointColumns};

/// Loads the raster at `path` and reprojects its valid pixels to EPSG:4326
///
/// # Arguments
///
/// * `path` - Flood GeoTIFF to read
///
/// # Returns
///
/// One row per valid pixel in row-major order, keeping the raw `x`/`y`
/// coordinates next to the reprojected geometry
pub fn load_flood_data<P: AsRef<Path>>(path: P) -> FloodResult<GeoTable> {
    let raster = RasterSource::open(path)?;
    let columns = PointColumns::from_raster(&raster);
    info!("Loaded {} valid pixels of {}", columns.len(), raster.pixel_count());

    let table = GeoTable::from_columns(columns, raster.crs)?;
    if table.crs != CoordinateSystem::WGS84 {
        info!("Reprojecting {} points from {} to {}", table.len(), table.crs, CoordinateSystem::WGS84);
    }
    table.to_crs(CoordinateSystem::WGS84)
}
