//! I/O module for reading and writing OCAD map files

pub mod ocad;

pub use ocad::{OcadReader, OcadReaderConfiguration, OcadWriter, OcadWriterConfiguration};
