//! OCAD format versions and the per-version layout rules they imply.
//!
//! Every codec function takes a [`FormatVersion`] and asks it about one
//! concern (icon encoding, alignment codes, record layout) instead of
//! comparing raw version numbers inline.

use crate::error::{OcadError, Result};
use std::fmt;

/// Supported OCAD file format versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    V6,
    V7,
    V8,
    V9,
    V10,
    V11,
    V12,
}

/// How toolbox icons are stored in symbol records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconEncoding {
    /// 4-bit palette, two pixels per byte, 264 bytes.
    Packed4Bit,
    /// 8-bit palette, LZW compressed behind a 16-byte 0xFF prefix, 264 bytes.
    Compressed8Bit,
    /// 8-bit palette, one byte per pixel, 484 bytes.
    Raw8Bit,
}

impl FormatVersion {
    pub const ALL: [FormatVersion; 7] = [
        FormatVersion::V6,
        FormatVersion::V7,
        FormatVersion::V8,
        FormatVersion::V9,
        FormatVersion::V10,
        FormatVersion::V11,
        FormatVersion::V12,
    ];

    /// Parse the header `Version` field.
    pub fn from_number(version: i16) -> Result<Self> {
        match version {
            6 => Ok(FormatVersion::V6),
            7 => Ok(FormatVersion::V7),
            8 => Ok(FormatVersion::V8),
            9 => Ok(FormatVersion::V9),
            10 => Ok(FormatVersion::V10),
            11 => Ok(FormatVersion::V11),
            12 => Ok(FormatVersion::V12),
            other => Err(OcadError::UnsupportedVersion(other)),
        }
    }

    pub fn number(self) -> i16 {
        match self {
            FormatVersion::V6 => 6,
            FormatVersion::V7 => 7,
            FormatVersion::V8 => 8,
            FormatVersion::V9 => 9,
            FormatVersion::V10 => 10,
            FormatVersion::V11 => 11,
            FormatVersion::V12 => 12,
        }
    }

    // ---------------------------------------------------------------
    // File structure
    // ---------------------------------------------------------------

    /// Versions 6–8 use 16-bit record headers, a fixed symbol header with
    /// the color table and a binary setup record.
    pub fn is_legacy(self) -> bool {
        self <= FormatVersion::V8
    }

    /// String-parameter table present.
    pub fn has_string_params(self) -> bool {
        self >= FormatVersion::V8
    }

    /// Template stored in the binary setup record (single template only).
    pub fn has_setup_template(self) -> bool {
        self <= FormatVersion::V7
    }

    pub fn section_mark(self) -> i16 {
        match self {
            FormatVersion::V7 => 7,
            FormatVersion::V8 => 2,
            _ => 0,
        }
    }

    pub fn subversion(self) -> i16 {
        match self {
            FormatVersion::V11 => 770,
            FormatVersion::V12 => 256,
            _ => 0,
        }
    }

    // ---------------------------------------------------------------
    // Symbols
    // ---------------------------------------------------------------

    pub fn icon_encoding(self) -> IconEncoding {
        match self {
            FormatVersion::V6 | FormatVersion::V7 => IconEncoding::Packed4Bit,
            FormatVersion::V8 => IconEncoding::Compressed8Bit,
            _ => IconEncoding::Raw8Bit,
        }
    }

    /// Multiplier of the fractional symbol-number part (`xxx.y` vs `xxxx.yyy`).
    pub fn symbol_id_scale(self) -> i32 {
        if self.is_legacy() {
            10
        } else {
            1000
        }
    }

    /// Circle element diameter measured from line center (v9+) rather than outer edge.
    pub fn circle_diameter_from_center(self) -> bool {
        self >= FormatVersion::V9
    }

    /// Hatch distance stored as full pitch rather than gap between lines.
    pub fn hatch_distance_is_pitch(self) -> bool {
        self >= FormatVersion::V9
    }

    /// Area symbols carry their own border line symbol reference.
    pub fn has_area_border(self) -> bool {
        self >= FormatVersion::V9
    }

    /// Text alignment codes combine horizontal and vertical alignment.
    pub fn has_vertical_text_alignment(self) -> bool {
        self >= FormatVersion::V10
    }

    pub fn has_text_point_symbol(self) -> bool {
        self >= FormatVersion::V10
    }

    pub fn has_line_symbol_flags(self) -> bool {
        self >= FormatVersion::V11
    }

    /// v12 line decrease options and area pattern fill/irregular options.
    pub fn has_v12_symbol_extras(self) -> bool {
        self >= FormatVersion::V12
    }

    /// Dash point flag in symbol element coordinates.
    pub fn has_element_dash_points(self) -> bool {
        self >= FormatVersion::V7
    }

    // ---------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------

    /// Graphics, image and layout objects (negative symbol numbers).
    pub fn has_inline_objects(self) -> bool {
        self >= FormatVersion::V9
    }

    /// Object text stored as UTF-16 (four chars per 8-byte unit).
    pub fn has_unicode_text(self) -> bool {
        self >= FormatVersion::V9
    }

    /// Size of the fixed object record part preceding the coordinates.
    pub fn object_header_size(self) -> usize {
        match self {
            FormatVersion::V6 | FormatVersion::V7 | FormatVersion::V8 => 32,
            FormatVersion::V12 => 56,
            _ => 40,
        }
    }

    /// Template offsets/scales in string parameters use hundredths of mm.
    pub fn template_params_in_hundredths(self) -> bool {
        self == FormatVersion::V8
    }

    pub fn has_euclidean_view_option(self) -> bool {
        self >= FormatVersion::V11
    }

    pub fn has_local_grid_offset(self) -> bool {
        self >= FormatVersion::V10
    }
}

impl TryFrom<i16> for FormatVersion {
    type Error = OcadError;

    fn try_from(value: i16) -> Result<Self> {
        FormatVersion::from_number(value)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OCAD {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_roundtrip() {
        for v in FormatVersion::ALL {
            assert_eq!(FormatVersion::from_number(v.number()).unwrap(), v);
        }
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            FormatVersion::from_number(5),
            Err(OcadError::UnsupportedVersion(5))
        ));
        assert!(FormatVersion::from_number(2018).is_err());
    }

    #[test]
    fn test_header_marks() {
        assert_eq!(FormatVersion::V6.section_mark(), 0);
        assert_eq!(FormatVersion::V7.section_mark(), 7);
        assert_eq!(FormatVersion::V8.section_mark(), 2);
        assert_eq!(FormatVersion::V11.subversion(), 770);
        assert_eq!(FormatVersion::V12.subversion(), 256);
        assert_eq!(FormatVersion::V9.subversion(), 0);
    }

    #[test]
    fn test_icon_encoding() {
        assert_eq!(FormatVersion::V7.icon_encoding(), IconEncoding::Packed4Bit);
        assert_eq!(FormatVersion::V8.icon_encoding(), IconEncoding::Compressed8Bit);
        assert_eq!(FormatVersion::V10.icon_encoding(), IconEncoding::Raw8Bit);
    }
}
