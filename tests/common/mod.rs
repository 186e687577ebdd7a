//! Shared test utilities for ocadrust integration tests.
//!
//! Collects the helpers every test crate needs (version lists, read and
//! write helpers, instance histograms, output paths) into a single module
//! imported via `mod common;`.

#![allow(dead_code)]

pub mod builders;
pub mod comparison;

use ocadrust::io::ocad::OcadReaderConfiguration;
use ocadrust::{FormatVersion, MapDocument, NotificationCollection, OcadReader, OcadWriter, SymbolInstance};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ===========================================================================
// Paths
// ===========================================================================

/// Resolve path into the `test_output/` directory, creating it if needed.
pub fn test_output_path(filename: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    let _ = std::fs::create_dir_all(&dir);
    dir.join(filename)
}

// ===========================================================================
// Version constants
// ===========================================================================

/// Every version the codec reads and writes.
pub const ALL_VERSIONS: [FormatVersion; 7] = FormatVersion::ALL;

/// Versions that store graphics, image and layout objects.
pub const INLINE_VERSIONS: [FormatVersion; 4] = [
    FormatVersion::V9,
    FormatVersion::V10,
    FormatVersion::V11,
    FormatVersion::V12,
];

// ===========================================================================
// Read and write helpers
// ===========================================================================

/// Encode `doc` as `version`, panicking on error.
pub fn write(doc: &MapDocument, version: FormatVersion) -> (Vec<u8>, NotificationCollection) {
    let mut writer = OcadWriter::new(version);
    let bytes = writer
        .write_to_vec(doc)
        .unwrap_or_else(|e| panic!("Failed to write OCAD {version}: {e:?}"));
    (bytes, writer.notifications().clone())
}

/// Decode bytes in failsafe mode.
pub fn read(bytes: &[u8]) -> MapDocument {
    OcadReader::from_bytes(bytes)
        .read()
        .unwrap_or_else(|e| panic!("Failed to read OCAD bytes: {e:?}"))
}

/// Decode bytes in strict mode (malformed structures are fatal).
pub fn read_strict(bytes: &[u8]) -> ocadrust::Result<MapDocument> {
    let config = OcadReaderConfiguration {
        failsafe: false,
        ..Default::default()
    };
    OcadReader::from_bytes(bytes).with_config(config).read()
}

/// Write `doc` as `version` and read it back.
pub fn roundtrip(doc: &MapDocument, version: FormatVersion) -> (MapDocument, NotificationCollection) {
    let (bytes, notes) = write(doc, version);
    (read(&bytes), notes)
}

// ===========================================================================
// Instance utilities
// ===========================================================================

/// Short name of an instance variant.
pub fn instance_kind(instance: &SymbolInstance) -> &'static str {
    match instance {
        SymbolInstance::Point(_) => "point",
        SymbolInstance::Line(_) => "line",
        SymbolInstance::Area(_) => "area",
        SymbolInstance::Text(_) => "text",
        SymbolInstance::LineText(_) => "line_text",
        SymbolInstance::GraphicsLine(_) => "graphics_line",
        SymbolInstance::GraphicsArea(_) => "graphics_area",
        SymbolInstance::ImageLine(_) => "image_line",
        SymbolInstance::ImageArea(_) => "image_area",
    }
}

/// Sorted frequency map of instance kinds.
pub fn instance_histogram(doc: &MapDocument) -> BTreeMap<&'static str, usize> {
    let mut map = BTreeMap::new();
    for instance in doc.instances() {
        *map.entry(instance_kind(instance)).or_insert(0) += 1;
    }
    map
}

/// Instances that `version` can store, in document order.
pub fn storable_instances(doc: &MapDocument, version: FormatVersion) -> Vec<&SymbolInstance> {
    doc.instances()
        .iter()
        .filter(|i| version.has_inline_objects() || !i.is_inline())
        .collect()
}

/// Symbol ids in file order, as strings.
pub fn symbol_ids(doc: &MapDocument) -> Vec<String> {
    doc.symbols().map(|s| s.id().to_string()).collect()
}
