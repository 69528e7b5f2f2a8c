//! TIFF file reader implementation
//!
//! This module implements the TIFF/BigTIFF directory reader that uses the
//! Strategy pattern to handle different byte orders. The reader never
//! reopens the file: every method takes the same `SeekableReader` the
//! header was parsed from.

use log::{debug, warn};
use std::io::SeekFrom;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;

/// Upper bound on the IFD chain length, guards against offset cycles
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF directory structures
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
    /// Size of the underlying stream, used to validate offsets
    file_size: u64,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
            file_size: u64::MAX,
        }
    }

    /// Returns the byte order handler, failing if no header was read yet
    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::Malformed("Byte order not yet determined".to_string()))
    }

    /// Byte order of the file read by `read`
    pub fn byte_order(&self) -> TiffResult<ByteOrder> {
        Ok(self.handler()?.byte_order())
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Reads the header and every IFD from the given reader
    ///
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Walk the IFD chain
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        self.file_size = stream_size(reader)?;
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let version = self.handler()?.read_u16(reader)?;
        self.is_big_tiff = match version {
            header::TIFF_VERSION => false,
            header::BIG_TIFF_VERSION => {
                self.validate_bigtiff_header(reader)?;
                true
            }
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };
        debug!("TIFF version {} ({})", version, if self.is_big_tiff { "BigTIFF" } else { "classic" });

        let first_ifd_offset = self.read_offset(reader)?;
        if first_ifd_offset < 8 || first_ifd_offset >= self.file_size {
            return Err(TiffError::InvalidHeader);
        }

        let mut tiff = TIFF::new(self.is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::Malformed("TIFF file contains no readable IFD".to_string()));
        }

        debug!("Read {} IFDs from TIFF file", tiff.ifds.len());
        Ok(tiff)
    }

    /// BigTIFF header continues with offset size (8) and a reserved zero
    fn validate_bigtiff_header(&self, reader: &mut dyn SeekableReader) -> TiffResult<()> {
        let handler = self.handler()?;
        let offset_size = handler.read_u16(reader)?;
        let zeros = handler.read_u16(reader)?;

        if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
            return Err(TiffError::InvalidBigTIFFHeader);
        }

        Ok(())
    }

    /// Reads a 4-byte or 8-byte offset depending on the format
    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u32(reader)? as u64)
        }
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// A broken link after the first IFD ends the chain with a warning;
    /// only the first IFD is needed to decode the band.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds: Vec<IFD> = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= self.file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, self.file_size);
                break;
            }
            if ifds.iter().any(|ifd| ifd.offset == ifd_offset) {
                warn!("IFD offset {} already visited, stopping IFD chain", ifd_offset);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if !ifds.is_empty() => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
                Err(e) => return Err(e),
            };

            // read_ifd leaves the reader on the next-IFD link
            let next_ifd_offset = match self.read_offset(reader) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD from the reader
    ///
    /// An IFD consists of an entry count followed by fixed-size entries.
    /// On return the reader is positioned at the next-IFD offset.
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };

        let entry_size = if self.is_big_tiff { 20 } else { 12 };
        if offset.saturating_add(entry_count.saturating_mul(entry_size)) > self.file_size {
            return Err(TiffError::Malformed(format!(
                "IFD at offset {} declares {} entries beyond end of file", offset, entry_count)));
        }

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }

        debug!("Read IFD #{} with {} entries", number, ifd.entries.len());
        Ok(ifd)
    }

    /// Reads a single IFD entry, keeping its value field verbatim
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut raw_value = vec![0u8; if self.is_big_tiff { 8 } else { 4 }];
        reader.read_exact(&mut raw_value)?;

        Ok(IFDEntry::new(tag, field_type, count, raw_value, handler.byte_order()))
    }

    /// Reads the raw value bytes of an entry, inline or at its offset
    pub fn read_tag_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        if let Some(bytes) = entry.inline_bytes() {
            return Ok(bytes.to_vec());
        }

        let len = entry.byte_len()?;
        if entry.value_offset.saturating_add(len) > self.file_size {
            return Err(TiffError::Malformed(format!(
                "Values of tag {} extend beyond end of file (offset {}, {} bytes)",
                entry.tag, entry.value_offset, len)));
        }

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut buffer = vec![0u8; len as usize];
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads a tag's value as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.read_tag_bytes(reader, entry)?;
        entry.decode_integers(&bytes)
    }

    /// Reads a numeric tag's values converted to f64
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.read_tag_bytes(reader, entry)?;
        entry.decode_floats(&bytes)
    }

    /// Reads an ASCII tag, with trailing NUL bytes removed
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        let mut buffer = self.read_tag_bytes(reader, entry)?;
        while buffer.last() == Some(&0) {
            buffer.pop();
        }

        String::from_utf8(buffer)
            .map_err(|e| TiffError::Malformed(format!("Invalid UTF-8 string in tag {}: {}", tag, e)))
    }
}

/// Determines the stream length without moving the caller's position
fn stream_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(current_position))?;
    Ok(size)
}
