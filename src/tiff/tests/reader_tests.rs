//! Tests for the directory reader

extern crate std;

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::errors::TiffError;
use crate::tiff::reader::TiffReader;
use super::test_utils::*;

#[test]
fn test_read_classic_tiff() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.byte_order, ByteOrder::LittleEndian);
    std::assert_eq!(tiff.ifd_count(), 1);
    std::assert_eq!(tiff.main_ifd().unwrap().get_dimensions(), Some((800, 600)));
}

#[test]
fn test_read_bigtiff() {
    let mut cursor = create_test_bigtiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert!(tiff.is_big_tiff);
    std::assert!(reader.is_big_tiff());
    std::assert_eq!(tiff.main_ifd().unwrap().get_dimensions(), Some((1024, 768)));
}

#[test]
fn test_read_ifd_chain() {
    let mut cursor = create_tiff_with_overview_buffer();
    let tiff = TiffReader::new().read(&mut cursor).unwrap();

    std::assert_eq!(tiff.ifd_count(), 2);
    std::assert_eq!(tiff.overview_count(), 1);
    std::assert_eq!(tiff.ifds[1].get_dimensions(), Some((400, 300)));
}

#[test]
fn test_ifd_cycle_stops_chain() {
    let mut buffer = create_test_tiff_buffer().into_inner();
    // Point the next-IFD link back at the first IFD
    let link = buffer.len() - 4;
    buffer[link..].copy_from_slice(&8u32.to_le_bytes());

    let tiff = TiffReader::new().read(&mut Cursor::new(buffer)).unwrap();
    std::assert_eq!(tiff.ifd_count(), 1);
}

#[test]
fn test_big_endian_values() {
    let mut cursor = build_classic_tiff::<BigEndian>(&[
        TestEntry::new(tags::IMAGE_WIDTH, field_types::SHORT, 1, shorts::<BigEndian>(&[300])),
        TestEntry::new(tags::IMAGE_LENGTH, field_types::SHORT, 1, shorts::<BigEndian>(&[200])),
        TestEntry::new(tags::BITS_PER_SAMPLE, field_types::SHORT, 2, shorts::<BigEndian>(&[16, 16])),
        TestEntry::new(tags::MODEL_PIXEL_SCALE_TAG, field_types::DOUBLE, 3, doubles::<BigEndian>(&[0.5, 0.25, 0.0])),
        TestEntry::new(tags::GDAL_NODATA, field_types::ASCII, 6, ascii("-9999")),
    ]);

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    std::assert_eq!(reader.byte_order().unwrap(), ByteOrder::BigEndian);
    std::assert_eq!(ifd.get_dimensions(), Some((300, 200)));
    std::assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![16, 16]);
    std::assert_eq!(
        reader.read_tag_doubles(&mut cursor, ifd, tags::MODEL_PIXEL_SCALE_TAG).unwrap(),
        vec![0.5, 0.25, 0.0]
    );
    std::assert_eq!(reader.read_tag_ascii(&mut cursor, ifd, tags::GDAL_NODATA).unwrap(), "-9999");
}

#[test]
fn test_out_of_line_longs() {
    let mut cursor = build_classic_tiff::<LittleEndian>(&[
        TestEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, longs::<LittleEndian>(&[4])),
        TestEntry::new(tags::IMAGE_LENGTH, field_types::LONG, 1, longs::<LittleEndian>(&[3])),
        TestEntry::new(tags::STRIP_OFFSETS, field_types::LONG, 3, longs::<LittleEndian>(&[100, 200, 300])),
    ]);

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    std::assert_eq!(ifd.get_tag_value(tags::STRIP_OFFSETS), None);
    std::assert_eq!(reader.read_tag_values(&mut cursor, ifd, tags::STRIP_OFFSETS).unwrap(), vec![100, 200, 300]);
}

#[test]
fn test_missing_tag() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    match reader.read_tag_values(&mut cursor, tiff.main_ifd().unwrap(), tags::STRIP_OFFSETS) {
        Err(TiffError::TagNotFound(tag)) => std::assert_eq!(tag, tags::STRIP_OFFSETS),
        other => std::panic!("expected TagNotFound, got {:?}", other),
    }
}

#[test]
fn test_values_beyond_end_of_file() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();
    buffer.write_u16::<LittleEndian>(1).unwrap();
    buffer.write_u16::<LittleEndian>(tags::STRIP_OFFSETS).unwrap();
    buffer.write_u16::<LittleEndian>(field_types::LONG).unwrap();
    buffer.write_u32::<LittleEndian>(10).unwrap();
    buffer.write_u32::<LittleEndian>(1000).unwrap();
    buffer.write_u32::<LittleEndian>(0).unwrap();
    let mut cursor = Cursor::new(buffer);

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    std::assert!(reader.read_tag_values(&mut cursor, tiff.main_ifd().unwrap(), tags::STRIP_OFFSETS).is_err());
}

#[test]
fn test_invalid_byte_order() {
    let mut cursor = Cursor::new(vec![0x12, 0x34, 42, 0, 8, 0, 0, 0]);
    std::assert!(std::matches!(TiffReader::new().read(&mut cursor), Err(TiffError::InvalidByteOrder(_))));
}

#[test]
fn test_unsupported_version() {
    let mut cursor = Cursor::new(vec![0x49, 0x49, 41, 0, 8, 0, 0, 0]);
    std::assert!(std::matches!(TiffReader::new().read(&mut cursor), Err(TiffError::UnsupportedVersion(41))));
}

#[test]
fn test_invalid_bigtiff_header() {
    let mut buffer = create_test_bigtiff_buffer().into_inner();
    buffer[4] = 4; // offset size must be 8
    std::assert!(std::matches!(
        TiffReader::new().read(&mut Cursor::new(buffer)),
        Err(TiffError::InvalidBigTIFFHeader)
    ));
}

#[test]
fn test_first_ifd_beyond_end_of_file() {
    let mut buffer = create_test_tiff_buffer().into_inner();
    buffer[4..8].copy_from_slice(&5000u32.to_le_bytes());
    std::assert!(std::matches!(TiffReader::new().read(&mut Cursor::new(buffer)), Err(TiffError::InvalidHeader)));
}

#[test]
fn test_truncated_ifd() {
    let mut buffer = create_test_tiff_buffer().into_inner();
    buffer.truncate(20);
    std::assert!(TiffReader::new().read(&mut Cursor::new(buffer)).is_err());
}
