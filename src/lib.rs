pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod coordinate;
pub mod raster;
pub mod table;
pub mod region;
pub mod writer;
pub mod loader;
pub mod errors;
pub mod commands;

pub use errors::{FloodError, FloodResult};
pub use loader::load_flood_data;
pub use raster::{BandData, RasterSource, SampleType};
pub use region::{Region, RegionBounds};
pub use table::{GeoTable, PointColumns, PointTable};
pub use tiff::TiffReader;
pub use writer::{read_point_table, write_point_table};
pub use coordinate::{CoordinateSystem, CoordinateTransformer, Point};
