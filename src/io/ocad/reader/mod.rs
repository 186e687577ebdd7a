//! OCAD file reader
//!
//! # Module Structure
//!
//! - `params` - map settings, colors and templates (setup or string parameters)
//! - `symbols` - symbol records to definitions
//! - `objects` - object records to instances
//! - `rectangle` - expansion of legacy rectangle objects
//! - `paths` - stored coordinates to paths, with repair

mod objects;
mod params;
mod paths;
mod rectangle;
mod symbols;

use super::block_chain::{read_chain, ChainRead};
use super::collaborators::{AssumeInstalled, FontOracle, IdentityResolver, PathResolver};
use super::ids::SyntheticIdAllocator;
use super::records::FileHeader;
use super::stream::OcadStreamReader;
use crate::document::MapDocument;
use crate::error::{OcadError, Result};
use crate::notification::DiagnosticsCollector;
use crate::types::{ColorId, FormatVersion, SymbolId};
use ahash::AHashMap;
use rectangle::RectangleInfo;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Configuration for the OCAD reader.
#[derive(Debug, Clone)]
pub struct OcadReaderConfiguration {
    /// When `true`, damaged records, blocks and parameters are reported as
    /// notifications and skipped instead of aborting the read.
    ///
    /// Default: `true`.
    pub failsafe: bool,
    /// Repair bezier runs and hole starts of stored paths.
    ///
    /// Default: `true`.
    pub fix_paths: bool,
}

impl Default for OcadReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: true,
            fix_paths: true,
        }
    }
}

/// OCAD file reader
pub struct OcadReader {
    data: Vec<u8>,
    config: OcadReaderConfiguration,
    fonts: Box<dyn FontOracle>,
    paths: Box<dyn PathResolver>,
}

impl OcadReader {
    /// Create a reader over an in-memory file
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            config: OcadReaderConfiguration::default(),
            fonts: Box::new(AssumeInstalled),
            paths: Box::new(IdentityResolver),
        }
    }

    /// Create a reader from any byte source
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    /// Create a reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Set the reader configuration.
    pub fn with_config(mut self, config: OcadReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Font lookup used for missing-font diagnostics.
    pub fn with_font_oracle(mut self, fonts: impl FontOracle + 'static) -> Self {
        self.fonts = Box::new(fonts);
        self
    }

    /// Resolver for template file names.
    pub fn with_path_resolver(mut self, paths: impl PathResolver + 'static) -> Self {
        self.paths = Box::new(paths);
        self
    }

    /// Read the file and return the map document
    pub fn read(self) -> Result<MapDocument> {
        let mut r = OcadStreamReader::new(&self.data);
        let header = FileHeader::read(&mut r)?;
        let version = header.format_version()?;
        log::debug!("reading OCAD {} file of {} bytes", version, self.data.len());

        let mut session = ReadSession {
            r,
            version,
            config: &self.config,
            fonts: self.fonts.as_ref(),
            paths: self.paths.as_ref(),
            doc: MapDocument::new(),
            diagnostics: DiagnosticsCollector::default(),
            synthetic: SyntheticIdAllocator::new(version),
            notes: AHashMap::new(),
        };
        session.doc.version = Some(version);

        if version.is_legacy() {
            session.read_legacy_header(&header)?;
        }
        if version.has_string_params() {
            session.read_string_params(header.first_string_block)?;
        }
        session.read_symbols(header.first_symbol_block)?;
        session.read_objects(header.first_index_block)?;

        let ReadSession {
            mut doc, diagnostics, ..
        } = session;
        doc.diagnostics = diagnostics.finish();
        Ok(doc)
    }
}

/// Read the OCAD file at `path`.
pub fn read_ocad<P: AsRef<Path>>(path: P) -> Result<MapDocument> {
    OcadReader::from_file(path)?.read()
}

/// Read-side facts about a definition that the model does not hold.
#[derive(Debug, Default)]
struct SymbolNotes {
    /// Features this codec cannot reproduce, reported per object.
    reasons: Vec<String>,
    rectangle: Option<RectangleInfo>,
}

/// State of one read.
struct ReadSession<'a> {
    r: OcadStreamReader<'a>,
    version: FormatVersion,
    config: &'a OcadReaderConfiguration,
    fonts: &'a dyn FontOracle,
    paths: &'a dyn PathResolver,
    doc: MapDocument,
    diagnostics: DiagnosticsCollector,
    synthetic: SyntheticIdAllocator,
    notes: AHashMap<SymbolId, SymbolNotes>,
}

impl<'a> ReadSession<'a> {
    /// Apply the tolerate policy: fatal errors always propagate, malformed
    /// structures only without `failsafe`; everything else becomes a
    /// notification and `None`.
    fn tolerate<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err @ OcadError::MalformedStructure(_)) if !self.config.failsafe => Err(err),
            Err(err) => {
                self.doc.notifications.notify_error(&err);
                Ok(None)
            }
        }
    }

    /// Walk a block chain and apply the tolerate policy to any damage.
    fn chain<T>(
        &mut self,
        first: i32,
        entry_size: usize,
        read_entry: impl FnMut(&mut OcadStreamReader<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let ChainRead {
            entries, damage, ..
        } = read_chain(&mut self.r, first, entry_size, read_entry);
        if let Some(err) = damage {
            self.tolerate::<()>(Err(err))?;
        }
        Ok(entries)
    }

    /// Whether a record offset lies inside the file.
    fn in_file(&self, pos: i32) -> bool {
        self.r.contains(pos as i64, 1)
    }

    /// Resolve a stored color number against the palette.
    fn color(&self, number: i16) -> Option<ColorId> {
        self.doc.resolve_color(ColorId(number))
    }

    fn fix_paths(&self) -> bool {
        self.config.fix_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = OcadReaderConfiguration::default();
        assert!(config.failsafe);
        assert!(config.fix_paths);
    }

    #[test]
    fn test_bad_magic_is_fatal() {
        let err = OcadReader::from_bytes(vec![0u8; 64]).read().unwrap_err();
        assert!(matches!(err, OcadError::InvalidMagic(_)));
    }

    #[test]
    fn test_unsupported_version_is_fatal() {
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0xAD;
        bytes[1] = 0x0C;
        bytes[4] = 13;
        let err = OcadReader::from_bytes(bytes).read().unwrap_err();
        assert!(matches!(err, OcadError::UnsupportedVersion(13)));
    }
}
