//! Image File Directory (IFD) structures and methods
//!
//! This module implements the core TIFF IFD (Image File Directory) structures
//! that store metadata about images in a TIFF file. IFDs are organized as
//! collections of tag entries, with each tag describing an aspect of the image.

use std::collections::HashMap;
use std::fmt;
use log::{debug, trace};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents an Image File Directory (IFD) in a TIFF file
///
/// An IFD contains metadata about an image, stored as a series of tag entries.
/// Only the first IFD of a file describes the full-resolution band; the
/// others are overviews or masks.
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Index into `entries` by tag
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// The value field of an entry is 4 bytes wide in classic TIFF and 8 bytes
/// in BigTIFF. Values that fit are stored there directly, left-justified and
/// in file byte order; larger values live at the offset the field encodes.
/// The raw field bytes are kept so inline arrays and short values decode
/// correctly under both byte orders.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value field read as an offset
    pub value_offset: u64,
    /// Raw bytes of the value field
    pub raw_value: Vec<u8>,
    /// Byte order of the file this entry came from
    pub byte_order: ByteOrder,
}

impl IFDEntry {
    /// Creates a new IFD entry from the raw value field
    pub fn new(tag: u16, field_type: u16, count: u64, raw_value: Vec<u8>, byte_order: ByteOrder) -> Self {
        let value_offset = if raw_value.len() >= 8 {
            byte_order.u64_from(&raw_value)
        } else {
            byte_order.u32_from(&raw_value) as u64
        };

        trace!("IFD entry: tag={} ({}), type={}, count={}, offset/value={}",
               tag, tag_name(tag), field_type, count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            raw_value,
            byte_order,
        }
    }

    /// Size in bytes of one value of this entry's field type
    pub fn field_type_size(&self) -> Option<usize> {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => Some(1),
            field_types::SHORT | field_types::SSHORT => Some(2),
            field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => Some(4),
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => Some(8),
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => Some(8),
            _ => None,
        }
    }

    /// Total size in bytes of this entry's values
    pub fn byte_len(&self) -> TiffResult<u64> {
        let size = self.field_type_size()
            .ok_or(TiffError::UnsupportedFieldType(self.field_type))?;
        self.count.checked_mul(size as u64)
            .ok_or_else(|| TiffError::Malformed(format!(
                "Value count {} of tag {} overflows", self.count, self.tag)))
    }

    /// Determines if the value is stored inline in the value field
    pub fn is_value_inline(&self) -> bool {
        match self.byte_len() {
            Ok(len) => len <= self.raw_value.len() as u64,
            Err(_) => false,
        }
    }

    /// Returns the inline value bytes, trimmed to the entry's length
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        if !self.is_value_inline() {
            return None;
        }
        let len = self.byte_len().ok()? as usize;
        Some(&self.raw_value[..len])
    }

    /// Decodes unsigned integer values from `bytes`
    pub fn decode_integers(&self, bytes: &[u8]) -> TiffResult<Vec<u64>> {
        let order = self.byte_order;
        let values = match self.field_type {
            field_types::BYTE | field_types::UNDEFINED => bytes.iter().map(|b| *b as u64).collect(),
            field_types::SHORT => bytes.chunks_exact(2).map(|c| order.u16_from(c) as u64).collect(),
            field_types::LONG | field_types::IFD => bytes.chunks_exact(4).map(|c| order.u32_from(c) as u64).collect(),
            field_types::LONG8 | field_types::IFD8 => bytes.chunks_exact(8).map(|c| order.u64_from(c)).collect(),
            other => return Err(TiffError::UnsupportedFieldType(other)),
        };
        Ok(values)
    }

    /// Decodes numeric values of any type from `bytes` as f64
    pub fn decode_floats(&self, bytes: &[u8]) -> TiffResult<Vec<f64>> {
        let order = self.byte_order;
        let values = match self.field_type {
            field_types::BYTE | field_types::UNDEFINED => bytes.iter().map(|b| *b as f64).collect(),
            field_types::SBYTE => bytes.iter().map(|b| *b as i8 as f64).collect(),
            field_types::SHORT => bytes.chunks_exact(2).map(|c| order.u16_from(c) as f64).collect(),
            field_types::SSHORT => bytes.chunks_exact(2).map(|c| order.u16_from(c) as i16 as f64).collect(),
            field_types::LONG | field_types::IFD => bytes.chunks_exact(4).map(|c| order.u32_from(c) as f64).collect(),
            field_types::SLONG => bytes.chunks_exact(4).map(|c| order.u32_from(c) as i32 as f64).collect(),
            field_types::LONG8 | field_types::IFD8 => bytes.chunks_exact(8).map(|c| order.u64_from(c) as f64).collect(),
            field_types::SLONG8 => bytes.chunks_exact(8).map(|c| order.u64_from(c) as i64 as f64).collect(),
            field_types::FLOAT => bytes.chunks_exact(4).map(|c| order.f32_from(c) as f64).collect(),
            field_types::DOUBLE => bytes.chunks_exact(8).map(|c| order.f64_from(c)).collect(),
            field_types::RATIONAL => bytes.chunks_exact(8)
                .map(|c| order.u32_from(&c[..4]) as f64 / order.u32_from(&c[4..]) as f64)
                .collect(),
            field_types::SRATIONAL => bytes.chunks_exact(8)
                .map(|c| order.u32_from(&c[..4]) as i32 as f64 / order.u32_from(&c[4..]) as i32 as f64)
                .collect(),
            other => return Err(TiffError::UnsupportedFieldType(other)),
        };
        Ok(values)
    }

    /// First integer value, when it is stored inline
    pub fn first_value(&self) -> Option<u64> {
        let bytes = self.inline_bytes()?;
        self.decode_integers(bytes).ok()?.first().copied()
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating new IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets the first inline integer value of a tag
    ///
    /// Returns None when the tag is absent or its values live elsewhere in
    /// the file; use `TiffReader::read_tag_values` for those.
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        let value = self.get_entry(tag).and_then(|entry| entry.first_value());
        trace!("Tag {} ({}) in IFD #{}: {:?}", tag, tag_name(tag), self.number, value);
        value
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|index| &self.entries[*index])
    }

    /// Gets the dimensions of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Returns true if pixel data is organized in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_OFFSETS)
    }
}

/// Human-readable name for the tags this crate interprets
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::PREDICTOR => "Predictor",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::SAMPLE_FORMAT => "SampleFormat",
        tags::MODEL_PIXEL_SCALE_TAG => "ModelPixelScaleTag",
        tags::MODEL_TIEPOINT_TAG => "ModelTiepointTag",
        tags::MODEL_TRANSFORMATION_TAG => "ModelTransformationTag",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectoryTag",
        tags::GEO_DOUBLE_PARAMS_TAG => "GeoDoubleParamsTag",
        tags::GEO_ASCII_PARAMS_TAG => "GeoAsciiParamsTag",
        tags::GDAL_NODATA => "GDAL_NODATA",
        _ => "Unknown",
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            match entry.first_value() {
                Some(value) => writeln!(f, "    {} ({}): {}", entry.tag, tag_name(entry.tag), value)?,
                None => writeln!(f, "    {} ({}): {} values at offset {}",
                                 entry.tag, tag_name(entry.tag), entry.count, entry.value_offset)?,
            }
        }

        Ok(())
    }
}
