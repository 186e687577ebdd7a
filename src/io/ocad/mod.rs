//! OCAD map file reading and writing (versions 6 through 12)
//!
//! # Module Structure
//!
//! - `stream` - little-endian byte cursor and ANSI text
//! - `coord` - packed coordinates with their flag bits
//! - `records` - fixed-layout records (header, symbols, objects, parameters)
//! - `block_chain` - linked blocks of 256 entries
//! - `ids` - symbol number encoding and write-side assignment
//! - `icon` - toolbox icon encodings
//! - `metrics` - fixed text proportions for boxes and grid labels
//! - `compression` - LZW used by v8 icons
//! - `collaborators` - font and path services of the host
//! - `reader` - file to [`MapDocument`](crate::document::MapDocument)
//! - `writer` - [`MapDocument`](crate::document::MapDocument) to file

pub mod block_chain;
pub mod collaborators;
pub mod compression;
pub mod constants;
pub mod coord;
pub mod icon;
pub mod ids;
mod metrics;
pub mod records;
pub mod stream;

mod reader;
mod writer;

pub use collaborators::{
    AssumeInstalled, FontOracle, IdentityResolver, InstalledFonts, PathResolver,
};
pub use reader::{read_ocad, OcadReader, OcadReaderConfiguration};
pub use writer::{write_ocad, OcadWriter, OcadWriterConfiguration};
