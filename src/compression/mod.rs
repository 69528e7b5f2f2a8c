//! Compression handling for TIFF files
//!
//! This module implements strategies for decoding the compression
//! methods found in flood-hazard GeoTIFFs.

mod handler;
mod uncompressed;
mod deflate;
mod lzw;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use lzw::LzwHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
