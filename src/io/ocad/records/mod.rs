//! Fixed-layout OCAD records.
//!
//! # Module Structure
//!
//! - `file_header` - 48-byte header with the block chain roots
//! - `symbol_header` - v6–v8 palette and color separations
//! - `setup` - v6–v8 map setup
//! - `element` - glyph elements of point, line and area symbols
//! - `symbol` - symbol definition records
//! - `index` - object index entries
//! - `object` - object records
//! - `param_string` - v8+ string parameters and their index

pub mod element;
pub mod file_header;
pub mod index;
pub mod object;
pub mod param_string;
pub mod setup;
pub mod symbol;
pub mod symbol_header;

pub use element::Element;
pub use file_header::FileHeader;
pub use index::IndexEntry;
pub use object::ObjectRecord;
pub use param_string::{ParamString, StringIndexEntry};
pub use setup::Setup;
pub use symbol::{SymbolBase, SymbolExtra, SymbolRecord};
pub use symbol_header::SymbolHeader;
