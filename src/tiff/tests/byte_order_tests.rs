//! Tests for the byte order module

extern crate std;

use std::io::Cursor;
use byteorder::{LittleEndian, BigEndian, WriteBytesExt};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler, LittleEndianHandler, BigEndianHandler};

#[test]
fn test_byte_order_detection_little_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_ok());
    std::assert_eq!(result.unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x4D4D).unwrap(); // MM
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_ok());
    std::assert_eq!(result.unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap(); // Invalid
    let mut cursor = Cursor::new(buffer);

    let result = ByteOrder::detect(&mut cursor);
    std::assert!(result.is_err());
}

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_u64::<LittleEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u64::<BigEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    std::assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    std::assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    std::assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}
#[test]
fn test_slice_decoders() {
    let bytes = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];

    std::assert_eq!(ByteOrder::LittleEndian.u16_from(&bytes), 0x3412);
    std::assert_eq!(ByteOrder::BigEndian.u16_from(&bytes), 0x1234);
    std::assert_eq!(ByteOrder::LittleEndian.u32_from(&bytes), 0x78563412);
    std::assert_eq!(ByteOrder::BigEndian.u32_from(&bytes), 0x12345678);
    std::assert_eq!(ByteOrder::BigEndian.u64_from(&bytes), 0x123456789ABCDEF0);
}

#[test]
fn test_float_decoders() {
    let mut le = Vec::new();
    le.write_f32::<LittleEndian>(-3.5).unwrap();
    le.write_f64::<LittleEndian>(51.25).unwrap();

    let mut be = Vec::new();
    be.write_f32::<BigEndian>(-3.5).unwrap();
    be.write_f64::<BigEndian>(51.25).unwrap();

    std::assert_eq!(ByteOrder::LittleEndian.f32_from(&le[..4]), -3.5);
    std::assert_eq!(ByteOrder::LittleEndian.f64_from(&le[4..]), 51.25);
    std::assert_eq!(ByteOrder::BigEndian.f32_from(&be[..4]), -3.5);
    std::assert_eq!(ByteOrder::BigEndian.f64_from(&be[4..]), 51.25);
}

#[test]
fn test_handler_reports_its_order() {
    std::assert_eq!(ByteOrder::BigEndian.create_handler().byte_order(), ByteOrder::BigEndian);
    std::assert_eq!(ByteOrder::LittleEndian.create_handler().byte_order(), ByteOrder::LittleEndian);
}

#[test]
fn test_handlers_read_f64() {
    let mut le = Vec::new();
    le.write_f64::<LittleEndian>(4_321_000.5).unwrap();
    let mut be = Vec::new();
    be.write_f64::<BigEndian>(4_321_000.5).unwrap();

    std::assert_eq!(LittleEndianHandler.read_f64(&mut Cursor::new(le)).unwrap(), 4_321_000.5);
    std::assert_eq!(BigEndianHandler.read_f64(&mut Cursor::new(be)).unwrap(), 4_321_000.5);
}
