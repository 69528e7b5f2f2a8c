//! Parquet output
//!
//! Tables are written as a single Arrow record batch with the columns
//! `value`, `longitude`, `latitude`. The value column keeps the band's
//! sample type.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{
    new_empty_array, Array, ArrayRef, Float32Array, Float64Array, Int16Array, Int32Array, Int8Array, RecordBatch,
    UInt16Array, UInt32Array, UInt8Array,
};
use arrow_schema::{DataType, Field, Schema};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;

use crate::errors::{FloodError, FloodResult};
use crate::raster::{BandData, SampleType};
use crate::table::PointTable;

pub const VALUE_COLUMN: &str = "value";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";

/// Arrow type used for a band sample type
pub fn arrow_type(sample_type: SampleType) -> DataType {
    match sample_type {
        SampleType::U8 => DataType::UInt8,
        SampleType::U16 => DataType::UInt16,
        SampleType::U32 => DataType::UInt32,
        SampleType::I8 => DataType::Int8,
        SampleType::I16 => DataType::Int16,
        SampleType::I32 => DataType::Int32,
        SampleType::F32 => DataType::Float32,
        SampleType::F64 => DataType::Float64,
    }
}

fn value_array(band: &BandData) -> ArrayRef {
    match band {
        BandData::U8(v) => Arc::new(UInt8Array::from(v.clone())),
        BandData::U16(v) => Arc::new(UInt16Array::from(v.clone())),
        BandData::U32(v) => Arc::new(UInt32Array::from(v.clone())),
        BandData::I8(v) => Arc::new(Int8Array::from(v.clone())),
        BandData::I16(v) => Arc::new(Int16Array::from(v.clone())),
        BandData::I32(v) => Arc::new(Int32Array::from(v.clone())),
        BandData::F32(v) => Arc::new(Float32Array::from(v.clone())),
        BandData::F64(v) => Arc::new(Float64Array::from(v.clone())),
    }
}

/// Arrow record batch holding the table's three columns
pub fn to_record_batch(table: &PointTable) -> FloodResult<RecordBatch> {
    table.validate()?;

    let schema = Schema::new(vec![
        Field::new(VALUE_COLUMN, arrow_type(table.value.sample_type()), false),
        Field::new(LONGITUDE_COLUMN, DataType::Float64, false),
        Field::new(LATITUDE_COLUMN, DataType::Float64, false),
    ]);

    let columns: Vec<ArrayRef> = vec![
        value_array(&table.value),
        Arc::new(Float64Array::from(table.longitude.clone())),
        Arc::new(Float64Array::from(table.latitude.clone())),
    ];

    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Writes `table` to a new Parquet file at `path`
///
/// The file must not exist yet. Rows keep their order; the table's
/// metadata is stored as file key-value metadata.
///
/// # Arguments
///
/// * `table` - Rows to write, possibly none
/// * `path` - Destination of the Parquet file
///
/// # Returns
///
/// `FloodError::OutputExists` if `path` is already taken, otherwise any
/// I/O, Arrow or Parquet error raised while writing
pub fn write_point_table<P: AsRef<Path>>(table: &PointTable, path: P) -> FloodResult<()> {
    let path = path.as_ref();
    let batch = to_record_batch(table)?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => FloodError::OutputExists(path.to_path_buf()),
            _ => FloodError::Io(e),
        })?;

    let metadata: Vec<KeyValue> = table.metadata.iter()
        .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
        .collect();

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_key_value_metadata(Some(metadata))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Reads a Parquet file written by `write_point_table`
pub fn read_point_table<P: AsRef<Path>>(path: P) -> FloodResult<PointTable> {
    let path = path.as_ref();
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;

    let metadata: BTreeMap<String, String> = builder.metadata()
        .file_metadata()
        .key_value_metadata()
        .map(|entries| {
            entries.iter()
                .filter(|kv| !kv.key.starts_with("ARROW:"))
                .filter_map(|kv| kv.value.clone().map(|value| (kv.key.clone(), value)))
                .collect()
        })
        .unwrap_or_default();

    // An empty table has no row groups, so the value type comes from the schema
    let value_type = builder.schema().field_with_name(VALUE_COLUMN)?.data_type().clone();
    let mut value = band_from_array(new_empty_array(&value_type).as_ref())?;
    let mut longitude = Vec::new();
    let mut latitude = Vec::new();

    for batch in builder.build()? {
        let batch = batch?;
        let chunk = band_from_array(column(&batch, VALUE_COLUMN)?.as_ref())?;
        value = append_band(value, chunk)?;
        longitude.extend_from_slice(float_column(&batch, LONGITUDE_COLUMN)?.values());
        latitude.extend_from_slice(float_column(&batch, LATITUDE_COLUMN)?.values());
    }

    debug!("Read {} rows from {}", value.len(), path.display());

    let mut table = PointTable::new(value, longitude, latitude)?;
    table.metadata = metadata;
    Ok(table)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> FloodResult<&'a ArrayRef> {
    batch.column_by_name(name)
        .ok_or_else(|| FloodError::Validation(format!("Missing column {}", name)))
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> FloodResult<&'a Float64Array> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| FloodError::Validation(format!("Column {} is not Float64", name)))
}

fn band_from_array(array: &dyn Array) -> FloodResult<BandData> {
    fn values<T: Array + 'static>(array: &dyn Array) -> FloodResult<&T> {
        array.as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| FloodError::Validation(format!("Unexpected value column type {}", array.data_type())))
    }

    let band = match array.data_type() {
        DataType::UInt8 => BandData::U8(values::<UInt8Array>(array)?.values().to_vec()),
        DataType::UInt16 => BandData::U16(values::<UInt16Array>(array)?.values().to_vec()),
        DataType::UInt32 => BandData::U32(values::<UInt32Array>(array)?.values().to_vec()),
        DataType::Int8 => BandData::I8(values::<Int8Array>(array)?.values().to_vec()),
        DataType::Int16 => BandData::I16(values::<Int16Array>(array)?.values().to_vec()),
        DataType::Int32 => BandData::I32(values::<Int32Array>(array)?.values().to_vec()),
        DataType::Float32 => BandData::F32(values::<Float32Array>(array)?.values().to_vec()),
        DataType::Float64 => BandData::F64(values::<Float64Array>(array)?.values().to_vec()),
        other => return Err(FloodError::Validation(format!("Unsupported value column type {}", other))),
    };

    Ok(band)
}

fn append_band(existing: BandData, chunk: BandData) -> FloodResult<BandData> {
    let band = match (existing, chunk) {
        (BandData::U8(mut a), BandData::U8(b)) => { a.extend(b); BandData::U8(a) }
        (BandData::U16(mut a), BandData::U16(b)) => { a.extend(b); BandData::U16(a) }
        (BandData::U32(mut a), BandData::U32(b)) => { a.extend(b); BandData::U32(a) }
        (BandData::I8(mut a), BandData::I8(b)) => { a.extend(b); BandData::I8(a) }
        (BandData::I16(mut a), BandData::I16(b)) => { a.extend(b); BandData::I16(a) }
        (BandData::I32(mut a), BandData::I32(b)) => { a.extend(b); BandData::I32(a) }
        (BandData::F32(mut a), BandData::F32(b)) => { a.extend(b); BandData::F32(a) }
        (BandData::F64(mut a), BandData::F64(b)) => { a.extend(b); BandData::F64(a) }
        _ => return Err(FloodError::Validation("Value column changes type between batches".to_string())),
    };
    Ok(band)
}
