//! Coordinate transformation functionality
//!
//! Reprojection goes through `proj4rs`, which expects geographic
//! coordinates in radians; degrees are converted on the way in and out.

use log::{debug, warn};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::crs::CoordinateSystem;
use super::point::Point;
use crate::errors::{FloodError, FloodResult};
use crate::utils::progress::ProgressTracker;

/// Points handed to proj4rs per call; progress is reported per batch
const BATCH_SIZE: usize = 65_536;

/// Below this many points no progress bar is drawn
const PROGRESS_THRESHOLD: usize = 1_000_000;

/// Transformer for converting between two coordinate systems
pub struct CoordinateTransformer {
    from_crs: CoordinateSystem,
    to_crs: CoordinateSystem,
    source_proj: Proj,
    target_proj: Proj,
}

impl CoordinateTransformer {
    /// Create a transformer from `from_crs` to `to_crs`
    pub fn new(from_crs: CoordinateSystem, to_crs: CoordinateSystem) -> FloodResult<Self> {
        let source_proj = Proj::from_proj_string(&from_crs.proj_string())
            .map_err(|e| FloodError::Crs(format!("Invalid source projection {}: {}", from_crs, e)))?;
        let target_proj = Proj::from_proj_string(&to_crs.proj_string())
            .map_err(|e| FloodError::Crs(format!("Invalid target projection {}: {}", to_crs, e)))?;

        Ok(CoordinateTransformer {
            from_crs,
            to_crs,
            source_proj,
            target_proj,
        })
    }

    /// Transform a set of points, in order
    ///
    /// A projection failure fails the whole call. Points that land on no
    /// finite position are kept as they are and counted in a warning.
    pub fn transform_points(&self, points: &[Point]) -> FloodResult<Vec<Point>> {
        if self.from_crs == self.to_crs {
            return Ok(points.to_vec());
        }

        debug!("Reprojecting {} points from {} to {}",
               points.len(), self.from_crs.description(), self.to_crs.description());

        let progress = if points.len() >= PROGRESS_THRESHOLD {
            ProgressTracker::new(points.len() as u64, "Reprojecting")
        } else {
            ProgressTracker::hidden()
        };

        let mut result = Vec::with_capacity(points.len());
        for batch in points.chunks(BATCH_SIZE) {
            let mut coords: Vec<(f64, f64)> = batch.iter().map(|p| (p.x, p.y)).collect();
            self.transform_in_place(&mut coords)?;
            result.extend(coords.into_iter().map(Point::from));
            progress.increment(batch.len() as u64);
        }
        progress.finish();

        let non_finite = result.iter().filter(|p| !p.is_finite()).count();
        if non_finite > 0 {
            warn!("{} of {} points have no finite position in {}", non_finite, points.len(), self.to_crs);
        }

        Ok(result)
    }

    fn transform_in_place(&self, coords: &mut [(f64, f64)]) -> FloodResult<()> {
        if self.from_crs == self.to_crs {
            return Ok(());
        }

        if self.source_proj.is_latlong() {
            for c in coords.iter_mut() {
                *c = (c.0.to_radians(), c.1.to_radians());
            }
        }

        transform(&self.source_proj, &self.target_proj, coords).map_err(|e| {
            FloodError::Crs(format!("Transform from {} to {} failed: {}", self.from_crs, self.to_crs, e))
        })?;

        if self.target_proj.is_latlong() {
            for c in coords.iter_mut() {
                *c = (c.0.to_degrees(), c.1.to_degrees());
            }
        }

        Ok(())
    }
}
