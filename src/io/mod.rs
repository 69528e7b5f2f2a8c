//! I/O utilities for file handling
//!
//! This module provides the reader abstraction and byte order strategies
//! used by the GeoTIFF decoder.

pub mod seekable;
pub mod byte_order;
