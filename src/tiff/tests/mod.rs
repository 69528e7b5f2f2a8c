//! Reader tests on in-memory TIFF buffers

mod byte_order_tests;
mod reader_tests;
