//! Named regions of interest
//!
//! Six fixed latitude/longitude boxes. A row is inside a region when both
//! coordinates lie strictly between the bounds.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::errors::FloodError;
use crate::table::{PointTable, REGION_KEY};

/// Bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_long: f64,
    pub max_long: f64,
}

impl RegionBounds {
    /// Strict containment on both axes
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat < lat && lat < self.max_lat && self.min_long < lon && lon < self.max_long
    }
}

/// The regions a table can be cropped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Germany,
    /// Rhine area
    NwGermany,
    NorthGermany,
    France,
    Belgium,
    Spain,
}

impl Region {
    /// Every region, in the order they are listed to users
    pub fn all() -> [Region; 6] {
        [
            Region::Germany,
            Region::NwGermany,
            Region::NorthGermany,
            Region::France,
            Region::Belgium,
            Region::Spain,
        ]
    }

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Region::Germany => "Germany",
            Region::NwGermany => "NW_Germany",
            Region::NorthGermany => "North_Germany",
            Region::France => "France",
            Region::Belgium => "Belgium",
            Region::Spain => "Spain",
        }
    }

    /// Names of every region
    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(Region::name).collect()
    }

    pub fn bounds(&self) -> RegionBounds {
        let (min_lat, max_lat, min_long, max_long) = match self {
            Region::Germany => (46.0, 56.0, 4.0, 17.0),
            Region::NwGermany => (50.8, 52.2, 5.8, 8.3),
            Region::NorthGermany => (53.18, 54.09, 8.74, 10.62),
            Region::France => (41.28, 51.05, -5.50, 10.67),
            Region::Belgium => (49.25, 51.55, 2.19, 6.62),
            Region::Spain => (35.50, 44.31, -9.98, 4.71),
        };
        RegionBounds { min_lat, max_lat, min_long, max_long }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.bounds().contains(lat, lon)
    }

    /// Keeps the rows strictly inside this region
    pub fn filter(&self, table: PointTable) -> PointTable {
        let bounds = self.bounds();
        let mask: Vec<bool> = table.latitude.iter()
            .zip(&table.longitude)
            .map(|(lat, lon)| bounds.contains(*lat, *lon))
            .collect();

        let before = table.len();
        let mut filtered = table.filter(&mask);
        filtered.metadata.insert(REGION_KEY.to_string(), self.name().to_string());

        debug!("Region {} kept {} of {} rows", self.name(), filtered.len(), before);
        filtered
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = FloodError;

    /// Exact, case-sensitive name match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::all()
            .into_iter()
            .find(|region| region.name() == s)
            .ok_or_else(|| FloodError::UnknownFilter {
                name: s.to_string(),
                valid: Region::names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BandData;

    fn table(points: &[(f64, f64)]) -> PointTable {
        PointTable::new(
            BandData::U16((0..points.len() as u16).collect()),
            points.iter().map(|p| p.1).collect(),
            points.iter().map(|p| p.0).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_every_name() {
        for region in Region::all() {
            assert_eq!(region.name().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_unknown_name_lists_all_six() {
        match "Italy".parse::<Region>() {
            Err(FloodError::UnknownFilter { name, valid }) => {
                assert_eq!(name, "Italy");
                assert_eq!(valid, vec!["Germany", "NW_Germany", "North_Germany", "France", "Belgium", "Spain"]);
            }
            other => panic!("expected UnknownFilter, got {:?}", other),
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("germany".parse::<Region>().is_err());
        assert!("North_GermanyFrance".parse::<Region>().is_err());
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let germany = Region::Germany;
        assert!(!germany.contains(46.0, 10.0));
        assert!(!germany.contains(56.0, 10.0));
        assert!(!germany.contains(50.0, 4.0));
        assert!(!germany.contains(50.0, 17.0));
        assert!(germany.contains(46.0001, 4.0001));
    }

    #[test]
    fn test_filter_keeps_order_and_tags_region() {
        let t = table(&[(50.0, 10.0), (60.0, 10.0), (47.0, 5.0), (46.0, 5.0)]);
        let filtered = Region::Germany.filter(t);
        assert_eq!(filtered.value, BandData::U16(vec![0, 2]));
        assert_eq!(filtered.metadata.get(REGION_KEY).map(String::as_str), Some("Germany"));
    }

    #[test]
    fn test_filter_drops_non_finite_positions() {
        let t = table(&[(f64::NAN, 10.0), (50.0, f64::INFINITY), (50.0, 10.0)]);
        assert_eq!(Region::Germany.filter(t).value, BandData::U16(vec![2]));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let t = table(&[(50.0, 10.0), (43.0, 1.0), (51.0, 7.0), (53.5, 9.0), (50.0, 4.5)]);
        for region in Region::all() {
            let once = region.filter(t.clone());
            let twice = region.filter(once.clone());
            assert_eq!(once, twice);
            for (lat, lon) in once.latitude.iter().zip(&once.longitude) {
                assert!(region.contains(*lat, *lon));
            }
        }
    }
}
