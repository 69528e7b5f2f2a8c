//! In-memory point tables
//!
//! The pipeline moves through three shapes: `PointColumns` (raw x, y and
//! value of every valid pixel), `GeoTable` (the same rows with point
//! geometry in a known CRS) and `PointTable` (value, longitude, latitude),
//! which is what gets filtered and written.

use std::collections::BTreeMap;

use log::debug;

use crate::coordinate::{CoordinateSystem, CoordinateTransformer, Point};
use crate::errors::{FloodError, FloodResult};
use crate::raster::{BandData, RasterSource};

/// Metadata key naming the raster's original CRS
pub const SOURCE_CRS_KEY: &str = "floodkit:source_crs";

/// Metadata key naming the region a table was cropped to
pub const REGION_KEY: &str = "floodkit:region";

/// Parallel x, y and value columns of the valid pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PointColumns {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub value: BandData,
}

impl PointColumns {
    /// Collects every pixel whose value differs from the raster's no-data
    ///
    /// Rows follow the band's row-major order; coordinates are those of the
    /// pixel's upper-left corner.
    pub fn from_raster(raster: &RasterSource) -> Self {
        let indices = raster.band.valid_indices(raster.nodata);
        debug!("{} of {} pixels are valid", indices.len(), raster.pixel_count());

        let (x, y): (Vec<f64>, Vec<f64>) = indices
            .iter()
            .map(|i| {
                let row = (i / raster.width) as f64;
                let col = (i % raster.width) as f64;
                raster.transform.apply(col, row)
            })
            .unzip();

        PointColumns {
            x,
            y,
            value: raster.band.take(&indices),
        }
    }

    /// Fails unless the three columns have the same length
    pub fn validate(&self) -> FloodResult<()> {
        let (x, y, value) = (self.x.len(), self.y.len(), self.value.len());
        if x != y || y != value {
            return Err(FloodError::Validation(format!(
                "Column lengths differ: x={}, y={}, value={}", x, y, value)));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Valid pixels with point geometry tagged with a CRS
#[derive(Debug, Clone)]
pub struct GeoTable {
    /// Raw x in the raster's native CRS
    pub x: Vec<f64>,
    /// Raw y in the raster's native CRS
    pub y: Vec<f64>,
    /// Point geometry in `crs`
    pub geometry: Vec<Point>,
    pub value: BandData,
    /// CRS of `geometry`
    pub crs: CoordinateSystem,
    /// CRS the raster was stored in
    pub source_crs: CoordinateSystem,
}

impl GeoTable {
    /// Builds geometry from the x and y columns
    pub fn from_columns(columns: PointColumns, crs: CoordinateSystem) -> FloodResult<Self> {
        columns.validate()?;

        let geometry = columns.x.iter()
            .zip(&columns.y)
            .map(|(x, y)| Point::new(*x, *y))
            .collect();

        Ok(GeoTable {
            x: columns.x,
            y: columns.y,
            geometry,
            value: columns.value,
            crs,
            source_crs: crs,
        })
    }

    /// Reprojects the geometry column to `target`
    ///
    /// Raw x and y keep their native values.
    pub fn to_crs(self, target: CoordinateSystem) -> FloodResult<Self> {
        if self.crs == target {
            return Ok(self);
        }

        let transformer = CoordinateTransformer::new(self.crs, target)?;
        let geometry = transformer.transform_points(&self.geometry)?;

        Ok(GeoTable {
            geometry,
            crs: target,
            ..self
        })
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces geometry and raw coordinates by longitude/latitude columns
    ///
    /// Longitude is the geometry's x, latitude its y. The row count and
    /// value column are unchanged.
    pub fn normalize(self) -> PointTable {
        let (longitude, latitude) = self.geometry.iter().map(|p| (p.x, p.y)).unzip();

        let mut metadata = BTreeMap::new();
        metadata.insert(SOURCE_CRS_KEY.to_string(), self.source_crs.to_string());

        PointTable {
            value: self.value,
            longitude,
            latitude,
            metadata,
        }
    }
}

/// Normalized table: value, longitude, latitude
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    pub value: BandData,
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    /// Key-value metadata stored alongside the table
    pub metadata: BTreeMap<String, String>,
}

impl PointTable {
    pub fn new(value: BandData, longitude: Vec<f64>, latitude: Vec<f64>) -> FloodResult<Self> {
        let table = PointTable {
            value,
            longitude,
            latitude,
            metadata: BTreeMap::new(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Fails unless the three columns have the same length
    pub fn validate(&self) -> FloodResult<()> {
        let (value, lon, lat) = (self.value.len(), self.longitude.len(), self.latitude.len());
        if value != lon || lon != lat {
            return Err(FloodError::Validation(format!(
                "Column lengths differ: value={}, longitude={}, latitude={}", value, lon, lat)));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the rows whose mask entry is true, in order
    pub fn filter(self, mask: &[bool]) -> PointTable {
        let keep = |column: Vec<f64>| -> Vec<f64> {
            column.into_iter().zip(mask).filter(|(_, k)| **k).map(|(v, _)| v).collect()
        };

        PointTable {
            value: self.value.filter(mask),
            longitude: keep(self.longitude),
            latitude: keep(self.latitude),
            metadata: self.metadata,
        }
    }
}
