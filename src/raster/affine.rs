//! Pixel-to-world affine transform

use crate::errors::{FloodError, FloodResult};
use crate::tiff::geo_key_parser::GeoInfo;

/// Six-coefficient affine transform mapping (col, row) to (x, y)
///
/// `x = c + a*col + b*row`, `y = f + d*col + e*row`, with (col, row) the
/// upper-left corner of a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        AffineTransform { a, b, c, d, e, f }
    }

    /// Builds the transform from the GeoTIFF model tags
    ///
    /// ModelTransformationTag wins over tiepoint + pixel scale. Rasters
    /// flagged PixelIsPoint are shifted half a pixel so the result always
    /// addresses pixel corners.
    pub fn from_geo_info(info: &GeoInfo) -> FloodResult<Self> {
        let transform = if let Some(m) = &info.model_transformation {
            if m.len() < 8 {
                return Err(FloodError::Crs(format!(
                    "ModelTransformationTag holds {} values, expected 16", m.len())));
            }
            AffineTransform::new(m[0], m[1], m[3], m[4], m[5], m[7])
        } else {
            let (tie, scale) = match (&info.tie_points, &info.pixel_scale) {
                (Some(tie), Some(scale)) if tie.len() >= 6 && scale.len() >= 2 => (tie, scale),
                _ => return Err(FloodError::Crs(
                    "Raster has no georeferencing (model transformation or tiepoint and pixel scale)".to_string())),
            };
            let (sx, sy) = (scale[0], scale[1]);
            if sx == 0.0 || sy == 0.0 {
                return Err(FloodError::Crs(format!("Invalid pixel scale {} x {}", sx, sy)));
            }
            AffineTransform::new(sx, 0.0, tie[3] - tie[0] * sx, 0.0, -sy, tie[4] + tie[1] * sy)
        };

        if info.is_pixel_is_point() {
            Ok(transform.shifted_to_corner())
        } else {
            Ok(transform)
        }
    }

    /// Moves the origin from a pixel center to its upper-left corner
    pub fn shifted_to_corner(&self) -> Self {
        AffineTransform {
            c: self.c - self.a / 2.0 - self.b / 2.0,
            f: self.f - self.d / 2.0 - self.e / 2.0,
            ..*self
        }
    }

    /// World coordinates of pixel index (col, row)
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.c + self.a * col + self.b * row,
            self.f + self.d * col + self.e * row,
        )
    }
}
