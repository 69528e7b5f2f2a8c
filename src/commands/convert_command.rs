//! Raster to Parquet conversion command
//!
//! Runs the whole pipeline: load the raster, normalize coordinates, crop to
//! a region and write the rows to Parquet.

use std::path::PathBuf;

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::errors::{FloodError, FloodResult};
use crate::loader::load_flood_data;
use crate::region::Region;
use crate::writer::write_point_table;

/// Region used when `--filter` is not given
pub const DEFAULT_REGION: Region = Region::Germany;

/// Command converting a flood raster into a regional point table
#[derive(Debug, Clone)]
pub struct ConvertCommand {
    /// Path to the input GeoTIFF
    raw: PathBuf,
    /// Path of the Parquet file to create
    output: PathBuf,
    region: Region,
}

impl ConvertCommand {
    /// Create a new convert command from CLI arguments
    ///
    /// The region name is resolved here, so an unknown filter fails before
    /// anything is read or written.
    pub fn new(args: &ArgMatches) -> FloodResult<Self> {
        let raw = args.get_one::<String>("raw")
            .ok_or_else(|| FloodError::Validation("Missing raster path (--raw)".to_string()))?;

        let output = args.get_one::<String>("output")
            .ok_or_else(|| FloodError::Validation("Missing output path (--output)".to_string()))?;

        let region = match args.get_one::<String>("filter") {
            Some(name) => name.parse::<Region>()?,
            None => DEFAULT_REGION,
        };

        Ok(Self::with_region(raw, output, region))
    }

    /// Create a command from already resolved parts
    pub fn with_region<P: Into<PathBuf>, Q: Into<PathBuf>>(raw: P, output: Q, region: Region) -> Self {
        ConvertCommand {
            raw: raw.into(),
            output: output.into(),
            region,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

impl Command for ConvertCommand {
    fn execute(&self) -> FloodResult<()> {
        if self.output.exists() {
            return Err(FloodError::OutputExists(self.output.clone()));
        }

        info!("Converting {} to {} (region {})", self.raw.display(), self.output.display(), self.region);

        let geo_table = load_flood_data(&self.raw)?;
        let table = geo_table.normalize();
        debug!("Normalized {} rows", table.len());

        let table = self.region.filter(table);
        write_point_table(&table, &self.output)?;

        Ok(())
    }
}
