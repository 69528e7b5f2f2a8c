//! Typed band samples
//!
//! A band keeps the sample type it was stored with so the output table
//! carries the same value type as the raster.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};

/// Storage type of one band sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl SampleType {
    /// Maps SampleFormat and BitsPerSample to a sample type
    pub fn from_tiff(format: u64, bits: u64) -> TiffResult<Self> {
        match (format, bits) {
            (sample_format::UNSIGNED, 8) => Ok(SampleType::U8),
            (sample_format::UNSIGNED, 16) => Ok(SampleType::U16),
            (sample_format::UNSIGNED, 32) => Ok(SampleType::U32),
            (sample_format::SIGNED, 8) => Ok(SampleType::I8),
            (sample_format::SIGNED, 16) => Ok(SampleType::I16),
            (sample_format::SIGNED, 32) => Ok(SampleType::I32),
            (sample_format::IEEEFP, 32) => Ok(SampleType::F32),
            (sample_format::IEEEFP, 64) => Ok(SampleType::F64),
            _ => Err(TiffError::UnsupportedLayout(format!(
                "sample format {} with {} bits per sample", format, bits))),
        }
    }

    /// Size of one sample in bytes
    pub fn bytes(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::U32 => "uint32",
            SampleType::I8 => "int8",
            SampleType::I16 => "int16",
            SampleType::I32 => "int32",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        }
    }
}

/// Samples of one band in row-major order
#[derive(Debug, Clone, PartialEq)]
pub enum BandData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Evaluates `$body` with `$values` bound to the inner vector
macro_rules! with_values {
    ($band:expr, $values:ident => $body:expr) => {
        match $band {
            BandData::U8($values) => $body,
            BandData::U16($values) => $body,
            BandData::U32($values) => $body,
            BandData::I8($values) => $body,
            BandData::I16($values) => $body,
            BandData::I32($values) => $body,
            BandData::F32($values) => $body,
            BandData::F64($values) => $body,
        }
    };
}

/// Like `with_values!`, rewrapping the result in the same variant
macro_rules! map_values {
    ($band:expr, $values:ident => $body:expr) => {
        match $band {
            BandData::U8($values) => BandData::U8($body),
            BandData::U16($values) => BandData::U16($body),
            BandData::U32($values) => BandData::U32($body),
            BandData::I8($values) => BandData::I8($body),
            BandData::I16($values) => BandData::I16($body),
            BandData::I32($values) => BandData::I32($body),
            BandData::F32($values) => BandData::F32($body),
            BandData::F64($values) => BandData::F64($body),
        }
    };
}

impl BandData {
    /// Decodes a row-major sample buffer stored in `byte_order`
    pub fn from_bytes(sample_type: SampleType, bytes: &[u8], byte_order: ByteOrder) -> Self {
        match sample_type {
            SampleType::U8 => BandData::U8(bytes.to_vec()),
            SampleType::I8 => BandData::I8(bytes.iter().map(|b| *b as i8).collect()),
            SampleType::U16 => BandData::U16(bytes.chunks_exact(2).map(|c| byte_order.u16_from(c)).collect()),
            SampleType::I16 => BandData::I16(bytes.chunks_exact(2).map(|c| byte_order.u16_from(c) as i16).collect()),
            SampleType::U32 => BandData::U32(bytes.chunks_exact(4).map(|c| byte_order.u32_from(c)).collect()),
            SampleType::I32 => BandData::I32(bytes.chunks_exact(4).map(|c| byte_order.u32_from(c) as i32).collect()),
            SampleType::F32 => BandData::F32(bytes.chunks_exact(4).map(|c| byte_order.f32_from(c)).collect()),
            SampleType::F64 => BandData::F64(bytes.chunks_exact(8).map(|c| byte_order.f64_from(c)).collect()),
        }
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            BandData::U8(_) => SampleType::U8,
            BandData::U16(_) => SampleType::U16,
            BandData::U32(_) => SampleType::U32,
            BandData::I8(_) => SampleType::I8,
            BandData::I16(_) => SampleType::I16,
            BandData::I32(_) => SampleType::I32,
            BandData::F32(_) => SampleType::F32,
            BandData::F64(_) => SampleType::F64,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices of samples that differ from `nodata`, in order
    ///
    /// Samples are widened to f64 before the exact comparison. Without a
    /// sentinel, or with a NaN sentinel, every index is returned.
    pub fn valid_indices(&self, nodata: Option<f64>) -> Vec<usize> {
        match nodata {
            Some(sentinel) if !sentinel.is_nan() => with_values!(self, values => values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v as f64 != sentinel)
                .map(|(i, _)| i)
                .collect()),
            _ => (0..self.len()).collect(),
        }
    }

    /// New band holding the samples at `indices`, in that order
    ///
    /// Every index must be below `len()`.
    pub fn take(&self, indices: &[usize]) -> BandData {
        map_values!(self, values => indices.iter().map(|i| values[*i]).collect())
    }

    /// New band holding the samples whose mask entry is true
    pub fn filter(&self, mask: &[bool]) -> BandData {
        map_values!(self, values => values
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(v, _)| *v)
            .collect())
    }
}
