//! Compression used by OCAD files.
//!
//! Only v8 toolbox icons are compressed, with a 9-bit LZW variant.

pub mod lzw;

use crate::error::Result;

/// Trait for compressing into a fixed-capacity buffer.
pub trait Compressor {
    /// Compress `source` into `destination`, returning the bytes used.
    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize>;
}

/// Trait for expanding into a fixed-capacity buffer.
pub trait Decompressor {
    /// Expand `source` into `destination`, returning the bytes produced.
    fn expand(&self, source: &[u8], destination: &mut [u8]) -> Result<usize>;
}

pub use lzw::Lzw;
