//! Seekable reader trait
//!
//! The TIFF decoder jumps between the header, the IFDs and the pixel
//! chunks, so every source it reads from must support both reading
//! and seeking.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
///
/// Implemented for `File`, `BufReader<File>` and `Cursor<Vec<u8>>` alike,
/// which lets the reader tests run on in-memory buffers.
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
