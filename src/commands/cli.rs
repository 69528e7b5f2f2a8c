//! Command-line interface definition

use clap::{Arg, ArgAction, Command as ClapCommand};

use crate::region::Region;

/// Builds the `floodkit` argument parser
pub fn build_cli() -> ClapCommand {
    let filter_help = format!(
        "Region to keep: one of {} (default: Germany)",
        Region::names().join(", ")
    );

    ClapCommand::new("floodkit")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Convert a flood return-period GeoTIFF into a regional Parquet point table")
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Input flood raster (GeoTIFF)")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Parquet file to create")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .help(filter_help)
                .value_name("REGION")
                .default_value("Germany")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
}
