//! Magic numbers, record sizes and type codes of the OCAD file format.

/// `OCADMark` of the file header.
pub const OCAD_MARK: u16 = 0x0CAD;

/// Size of the fixed file header.
pub const FILE_HEADER_SIZE: usize = 48;

/// Entries per symbol, index and string-parameter block.
pub const BLOCK_ENTRIES: usize = 256;

/// Palette slots of the v6–v8 symbol header.
pub const MAX_COLORS: usize = 256;
/// Color separations of the v6–v8 symbol header.
pub const MAX_COLOR_SEPARATIONS: usize = 32;
/// Explicit used-color entries of a v9+ symbol record.
pub const MAX_SYMBOL_COLORS: usize = 14;
/// Tab stops of a text symbol.
pub const MAX_TABS: usize = 32;

/// Icon bytes of v6–v8 symbol records.
pub const ICON_BYTES_LEGACY: usize = 264;
/// Icon bytes of v9+ symbol records.
pub const ICON_BYTES: usize = 484;
/// Pixels per side of the stored icon (without border).
pub const ICON_PIXELS: usize = 22;
/// Bytes in front of the LZW payload of a v8 icon.
pub const ICON_COMPRESSED_PREFIX: usize = 16;

/// First id tried for definitions without a parsable id.
pub const FIRST_UNTRIED_SYMBOL: (u32, u16) = (920, 0);
/// First synthetic id allocated while expanding rectangle symbols.
pub const FIRST_SYNTHETIC_SYMBOL: i32 = 999_950;

/// Reserved v9+ symbol numbers of objects without a definition.
pub mod object_symbol {
    pub const IMPORTED: i32 = -1;
    pub const GRAPHICS: i32 = -2;
    pub const IMAGE: i32 = -3;
    pub const LAYOUT: i32 = -4;
}

/// `Otp` codes of symbol records.
pub mod symbol_otp {
    pub const POINT: u8 = 1;
    pub const LINE: u8 = 2;
    pub const AREA: u8 = 3;
    pub const TEXT: u8 = 4;
    pub const RECTANGLE: u8 = 5;
    pub const LINE_TEXT: u8 = 6;
    pub const RECTANGLE_ALT: u8 = 7;
}

/// `Otp` codes of object records.
pub mod object_otp {
    pub const POINT: u8 = 1;
    pub const LINE: u8 = 2;
    pub const AREA: u8 = 3;
    pub const UNFORMATTED_TEXT: u8 = 4;
    pub const FORMATTED_TEXT: u8 = 5;
    pub const LINE_TEXT: u8 = 6;
    pub const RECTANGLE: u8 = 7;
}

/// Element types of symbol glyphs.
pub mod element_type {
    pub const LINE: i16 = 1;
    pub const AREA: i16 = 2;
    pub const CIRCLE: i16 = 3;
    pub const FILLED_CIRCLE: i16 = 4;
}

/// `UseSymbolFlags` bits of v11+ line symbols.
pub mod line_symbol_flags {
    pub const BASE: u8 = 1;
    pub const SECONDARY: u8 = 2;
    pub const START: u8 = 4;
    pub const END: u8 = 8;
    pub const CORNER: u8 = 16;
}

/// String parameter record types.
pub mod param_type {
    pub const CS_OBJECT: i32 = 1;
    pub const COURSE: i32 = 2;
    pub const CLASS: i32 = 3;
    pub const DATA_SET_DETAIL: i32 = 4;
    pub const DB_OBJECT: i32 = 5;
    pub const OIM_FILE: i32 = 6;
    pub const PREV_OBJECT: i32 = 7;
    pub const TEMPLATE: i32 = 8;
    pub const COLOR: i32 = 9;
    pub const SPOT_COLOR: i32 = 10;
    pub const FILE_INFO: i32 = 11;
    pub const ZOOM: i32 = 12;
    pub const IMP_LAYER: i32 = 13;
    pub const OIM_FIND: i32 = 14;
    pub const SYM_TREE: i32 = 15;
    /// Number of list types (`0..COUNT_LIST`).
    pub const COUNT_LIST: i32 = 16;

    pub const FIRST_SINGLE: i32 = 1024;
    pub const DISPLAY: i32 = 1024;
    pub const PRINT: i32 = 1026;
    pub const TEMPLATE_SINGLE: i32 = 1028;
    pub const VIEW: i32 = 1030;
    pub const SCALE: i32 = 1039;
    pub const LAST_SINGLE: i32 = 1040;
}

/// Text alignment codes.
pub mod alignment {
    pub const LEFT: i16 = 0;
    pub const CENTER: i16 = 1;
    pub const RIGHT: i16 = 2;
    pub const JUSTIFIED: i16 = 3;
    /// Offset of midpoint-aligned codes (v10+).
    pub const MIDPOINT: i16 = 4;
    /// Offset of top-aligned codes (v10+).
    pub const TOP: i16 = 8;
}
