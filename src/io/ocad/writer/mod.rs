//! OCAD file writer
//!
//! # Module Structure
//!
//! - `params` - symbol header, setup, file info and string parameters
//! - `symbols` - definitions to symbol records
//! - `objects` - instances to object records and index entries
//! - `text` - fixed text metrics for text object boxes
//! - `paths` - paths to stored coordinates

mod objects;
mod params;
mod paths;
mod symbols;
mod text;

use super::ids::SymbolNumbering;
use super::records::FileHeader;
use super::stream::OcadStreamWriter;
use crate::document::MapDocument;
use crate::error::{OcadError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::FormatVersion;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Configuration for the OCAD writer.
#[derive(Debug, Clone)]
pub struct OcadWriterConfiguration {
    /// Target format version.
    ///
    /// Default: [`FormatVersion::V12`].
    pub version: FormatVersion,
}

impl Default for OcadWriterConfiguration {
    fn default() -> Self {
        Self {
            version: FormatVersion::V12,
        }
    }
}

/// OCAD file writer
///
/// Features the target version cannot store are dropped and reported in
/// [`OcadWriter::notifications`]; only I/O failures abort a write.
pub struct OcadWriter {
    config: OcadWriterConfiguration,
    notifications: NotificationCollection,
}

impl OcadWriter {
    /// Create a writer for `version`
    pub fn new(version: FormatVersion) -> Self {
        Self {
            config: OcadWriterConfiguration { version },
            notifications: NotificationCollection::new(),
        }
    }

    /// Set the writer configuration.
    pub fn with_config(mut self, config: OcadWriterConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn version(&self) -> FormatVersion {
        self.config.version
    }

    /// Notifications raised by the last write.
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Encode `doc` into a byte vector
    pub fn write_to_vec(&mut self, doc: &MapDocument) -> Result<Vec<u8>> {
        let mut session = WriteSession {
            w: OcadStreamWriter::new(),
            version: self.config.version,
            doc,
            numbering: SymbolNumbering::new(self.config.version),
            notifications: NotificationCollection::new(),
        };
        log::debug!("writing OCAD {} file", session.version);
        let result = session.write_document();
        let WriteSession {
            w, notifications, ..
        } = session;
        self.notifications = notifications;
        result?;
        Ok(w.into_inner())
    }

    /// Encode `doc` into any byte sink
    pub fn write_to_writer<W: Write>(&mut self, doc: &MapDocument, mut writer: W) -> Result<()> {
        let bytes = self.write_to_vec(doc)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode `doc` into a file
    pub fn write_to_file<P: AsRef<Path>>(&mut self, doc: &MapDocument, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(doc, BufWriter::new(file))
    }
}

/// Write `doc` to `path` as an OCAD `version` file.
pub fn write_ocad<P: AsRef<Path>>(doc: &MapDocument, path: P, version: FormatVersion) -> Result<()> {
    OcadWriter::new(version).write_to_file(doc, path)
}

/// State of one write.
struct WriteSession<'a> {
    w: OcadStreamWriter,
    version: FormatVersion,
    doc: &'a MapDocument,
    numbering: SymbolNumbering,
    notifications: NotificationCollection,
}

impl<'a> WriteSession<'a> {
    /// Fatal errors propagate; everything else becomes a notification and `None`.
    fn tolerate<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                self.notifications.notify_error(&err);
                Ok(None)
            }
        }
    }

    fn not_supported(&mut self, message: impl Into<String>) {
        self.notifications.notify(NotificationType::NotSupported, message);
    }

    /// Sections are appended in order; the header is written twice, first as
    /// a placeholder and again once every offset is known.
    fn write_document(&mut self) -> Result<()> {
        let v = self.version;
        let mut header = FileHeader::new(v);
        header.write(&mut self.w)?;

        if v.is_legacy() {
            self.write_symbol_header()?;
            let (pos, size) = self.write_setup()?;
            header.setup_pos = pos;
            header.setup_size = size;
        }

        self.assign_numbers()?;
        header.first_symbol_block = self.write_symbols()?;
        header.first_index_block = self.write_objects()?;

        if v.has_string_params() {
            header.first_string_block = self.write_string_params()?;
        }
        if v.is_legacy() && !self.doc.file_info.is_empty() {
            let (pos, size) = self.write_file_info()?;
            header.info_pos = pos;
            header.info_size = size;
        }

        let end = self.w.position();
        self.w.seek(0)?;
        header.write(&mut self.w)?;
        self.w.seek_end()?;
        log::debug!("wrote {} bytes", end);
        Ok(())
    }

    /// Offset of the next byte, as stored in headers and block chains.
    fn offset(&self) -> Result<i32> {
        let pos = self.w.position();
        i32::try_from(pos)
            .map_err(|_| OcadError::NumericOverflow(format!("file offset {} exceeds 2 GiB", pos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ocad::stream::OcadStreamReader;

    #[test]
    fn test_default_configuration() {
        assert_eq!(OcadWriterConfiguration::default().version, FormatVersion::V12);
    }

    #[test]
    fn test_empty_document_header() {
        let doc = MapDocument::new();
        for version in FormatVersion::ALL {
            let bytes = OcadWriter::new(version).write_to_vec(&doc).unwrap();
            let header = FileHeader::read(&mut OcadStreamReader::new(&bytes)).unwrap();
            assert_eq!(header.format_version().unwrap(), version);
            // Symbol and object chains always get one (empty) block.
            assert!(header.first_symbol_block > 0);
            assert!(header.first_index_block > 0);
            // v9+ always store scale, print and view parameters.
            assert_eq!(header.first_string_block > 0, version >= FormatVersion::V9);
        }
    }

    #[test]
    fn test_writer_notifications_reset_per_write() {
        let doc = MapDocument::new();
        let mut writer = OcadWriter::new(FormatVersion::V9);
        writer.write_to_vec(&doc).unwrap();
        assert!(writer.notifications().is_empty());
    }
}
