//! Value types shared by the map model and the codec

pub mod bounds;
pub mod color;
pub mod symbol_id;
pub mod vector;
pub mod version;

pub use bounds::BoundingBox2D;
pub use color::{Cmyk, Color, ColorId};
pub use symbol_id::SymbolId;
pub use vector::Vector2;
pub use version::{FormatVersion, IconEncoding};
