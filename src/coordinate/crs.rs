//! Coordinate Reference System handling

use std::fmt;

use crate::errors::{FloodError, FloodResult};

/// Coordinate systems flood rasters are delivered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// WGS 84 (EPSG:4326)
    WGS84,
    /// ETRS89 geographic (EPSG:4258)
    ETRS89,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// WGS 84 UTM Zone (EPSG:326xx for northern hemisphere, 327xx for southern)
    UTM(u8, bool),
    /// ETRS89 UTM Zone (EPSG:258xx)
    EtrsUTM(u8),
    /// ETRS89 Lambert Azimuthal Equal Area, Europe (EPSG:3035)
    EtrsLAEA,
    /// RGF93 Lambert-93 (EPSG:2154)
    Lambert93,
}

impl CoordinateSystem {
    /// Get the EPSG code for this coordinate system
    pub fn epsg_code(&self) -> u32 {
        match self {
            CoordinateSystem::WGS84 => 4326,
            CoordinateSystem::ETRS89 => 4258,
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    32600 + *zone as u32
                } else {
                    32700 + *zone as u32
                }
            },
            CoordinateSystem::EtrsUTM(zone) => 25800 + *zone as u32,
            CoordinateSystem::EtrsLAEA => 3035,
            CoordinateSystem::Lambert93 => 2154,
        }
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS 84 (EPSG:4326)".to_string(),
            CoordinateSystem::ETRS89 => "ETRS89 (EPSG:4258)".to_string(),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::UTM(zone, is_northern) => {
                let hemisphere = if *is_northern { 'N' } else { 'S' };
                format!("WGS 84 / UTM Zone {}{} (EPSG:{})", zone, hemisphere, self.epsg_code())
            },
            CoordinateSystem::EtrsUTM(zone) => format!("ETRS89 / UTM Zone {}N (EPSG:{})", zone, self.epsg_code()),
            CoordinateSystem::EtrsLAEA => "ETRS89-extended / LAEA Europe (EPSG:3035)".to_string(),
            CoordinateSystem::Lambert93 => "RGF93 / Lambert-93 (EPSG:2154)".to_string(),
        }
    }

    /// PROJ.4 definition understood by `proj4rs`
    pub fn proj_string(&self) -> String {
        const GRS80_WGS84: &str = "+ellps=GRS80 +towgs84=0,0,0,0,0,0,0";
        match self {
            CoordinateSystem::WGS84 => "+proj=longlat +datum=WGS84 +no_defs".to_string(),
            CoordinateSystem::ETRS89 => format!("+proj=longlat {} +no_defs", GRS80_WGS84),
            CoordinateSystem::WebMercator => {
                "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +no_defs"
                    .to_string()
            },
            CoordinateSystem::UTM(zone, is_northern) => format!(
                "+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs",
                zone,
                if *is_northern { "" } else { " +south" }
            ),
            CoordinateSystem::EtrsUTM(zone) => {
                format!("+proj=utm +zone={} {} +units=m +no_defs", zone, GRS80_WGS84)
            },
            CoordinateSystem::EtrsLAEA => format!(
                "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 {} +units=m +no_defs",
                GRS80_WGS84
            ),
            CoordinateSystem::Lambert93 => format!(
                "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 {} +units=m +no_defs",
                GRS80_WGS84
            ),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg_code())
    }
}

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> FloodResult<CoordinateSystem> {
        match epsg {
            4326 => Ok(CoordinateSystem::WGS84),
            4258 => Ok(CoordinateSystem::ETRS89),
            3857 => Ok(CoordinateSystem::WebMercator),
            32601..=32660 => Ok(CoordinateSystem::UTM((epsg - 32600) as u8, true)),
            32701..=32760 => Ok(CoordinateSystem::UTM((epsg - 32700) as u8, false)),
            25828..=25838 => Ok(CoordinateSystem::EtrsUTM((epsg - 25800) as u8)),
            3035 => Ok(CoordinateSystem::EtrsLAEA),
            2154 => Ok(CoordinateSystem::Lambert93),
            _ => Err(FloodError::Crs(format!("Unsupported coordinate system EPSG:{}", epsg))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_round_trip() {
        for code in [4326, 4258, 3857, 32632, 32733, 25832, 3035, 2154] {
            let crs = CoordinateSystemFactory::from_epsg(code).unwrap();
            assert_eq!(crs.epsg_code(), code);
        }
    }

    #[test]
    fn test_unsupported_code_is_crs_error() {
        match CoordinateSystemFactory::from_epsg(27700) {
            Err(FloodError::Crs(msg)) => assert!(msg.contains("27700")),
            other => panic!("expected Crs error, got {:?}", other),
        }
    }

    #[test]
    fn test_south_utm_proj_string() {
        assert!(CoordinateSystem::UTM(33, false).proj_string().contains("+south"));
        assert!(!CoordinateSystem::UTM(33, true).proj_string().contains("+south"));
    }
}
