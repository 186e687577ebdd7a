//! Object records.
//!
//! A fixed header (32, 40 or 56 bytes depending on version) followed by
//! `nItem` coordinates and `nText` 8-byte units of text. v12 appends the
//! object string after the text.

use super::super::coord::OcadCoord;
use super::super::stream::{encode_ansi, OcadStreamReader, OcadStreamWriter};
use crate::error::{OcadError, Result};
use crate::types::FormatVersion;

/// Upper bound on coordinates per object, far beyond anything OCAD writes.
const MAX_ITEMS: i32 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectRecord {
    pub symbol: i32,
    pub otp: u8,
    /// v6–v8: text stored as UTF-16.
    pub unicode: u8,
    /// Tenths of a degree.
    pub angle: i16,
    /// Palette color number (graphics) or packed CMYK (image, layout).
    pub color: u32,
    pub line_width: i16,
    pub diam_flags: i16,
    pub server_object_id: i32,
    pub height: i32,
    pub creation_date: f64,
    pub multi_rep_id: i32,
    pub modification_date: f64,
    pub object_string_type: u8,
    pub coords: Vec<OcadCoord>,
    pub text: String,
    /// v12 tab-separated attribute string.
    pub object_string: String,
}

fn utf16_units(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

impl ObjectRecord {
    pub fn new(symbol: i32, otp: u8) -> Self {
        ObjectRecord {
            symbol,
            otp,
            ..Default::default()
        }
    }

    fn text_is_unicode(&self, version: FormatVersion) -> bool {
        version.has_unicode_text() || self.unicode != 0
    }

    /// `nText` for the current text.
    pub fn text_units(&self, version: FormatVersion) -> usize {
        if self.text.is_empty() {
            return 0;
        }
        if version.has_unicode_text() {
            utf16_units(&self.text).len() / 4 + 1
        } else {
            encode_ansi(&self.text).len() / 8 + 1
        }
    }

    /// `nObjectString` for the current object string.
    pub fn object_string_units(&self, version: FormatVersion) -> usize {
        if self.object_string.is_empty() || !version.has_v12_symbol_extras() {
            0
        } else {
            utf16_units(&self.object_string).len() / 4 + 1
        }
    }

    /// The `Len` field of the index entry pointing at this record.
    pub fn index_len(&self, version: FormatVersion) -> i32 {
        let units = self.coords.len() + self.text_units(version) + self.object_string_units(version);
        if version == FormatVersion::V8 {
            units as i32
        } else {
            (version.object_header_size() + 8 * units) as i32
        }
    }

    pub fn read(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<Self> {
        let mut obj = ObjectRecord::default();
        let n_item: i32;
        let n_text: usize;
        let mut n_object_string = 0usize;
        let mut n_database_string = 0usize;
        match version {
            FormatVersion::V6 | FormatVersion::V7 | FormatVersion::V8 => {
                obj.symbol = r.read_i16()? as i32;
                obj.otp = r.read_u8()?;
                obj.unicode = r.read_u8()?;
                n_item = r.read_i16()? as i32;
                n_text = r.read_i16()?.max(0) as usize;
                obj.angle = r.read_i16()?;
                r.skip(2 + 4 + 16)?;
            }
            FormatVersion::V12 => {
                obj.symbol = r.read_i32()?;
                obj.otp = r.read_u8()?;
                let _customer = r.read_u8()?;
                obj.angle = r.read_i16()?;
                obj.color = r.read_u32()?;
                obj.line_width = r.read_i16()?;
                obj.diam_flags = r.read_i16()?;
                obj.server_object_id = r.read_i32()?;
                obj.height = r.read_i32()?;
                obj.creation_date = r.read_f64()?;
                obj.multi_rep_id = r.read_i32()?;
                obj.modification_date = r.read_f64()?;
                n_item = r.read_i32()?;
                n_text = r.read_u16()? as usize;
                n_object_string = r.read_u16()? as usize;
                n_database_string = r.read_u16()? as usize;
                obj.object_string_type = r.read_u8()?;
                let _reserved = r.read_u8()?;
            }
            _ => {
                obj.symbol = r.read_i32()?;
                obj.otp = r.read_u8()?;
                let _reserved = r.read_u8()?;
                obj.angle = r.read_i16()?;
                n_item = r.read_i32()?;
                n_text = r.read_i16()?.max(0) as usize;
                let _reserved = r.read_i16()?;
                obj.color = r.read_u32()?;
                obj.line_width = r.read_i16()?;
                obj.diam_flags = r.read_i16()?;
                r.skip(16)?;
            }
        }
        if !(0..=MAX_ITEMS).contains(&n_item) {
            return Err(OcadError::MalformedStructure(format!(
                "object with {} coordinates",
                n_item
            )));
        }
        let mut coords = Vec::with_capacity(n_item as usize);
        for _ in 0..n_item {
            coords.push(OcadCoord::read(r)?);
        }
        obj.coords = coords;
        if n_text > 0 {
            obj.text = if obj.text_is_unicode(version) {
                r.read_utf16_chars(n_text * 4)?
            } else {
                r.read_ansi_chars(n_text * 8)?
            };
        }
        if n_object_string > 0 {
            obj.object_string = r.read_utf16_chars(n_object_string * 4)?;
        }
        if n_database_string > 0 {
            // Database strings are not modeled.
            r.skip(n_database_string * 8)?;
        }
        Ok(obj)
    }

    pub fn write(&self, w: &mut OcadStreamWriter, version: FormatVersion) -> Result<()> {
        let n_item = self.coords.len();
        let n_text = self.text_units(version);
        let n_object_string = self.object_string_units(version);
        match version {
            FormatVersion::V6 | FormatVersion::V7 | FormatVersion::V8 => {
                w.write_i16(self.symbol as i16)?;
                w.write_u8(self.otp)?;
                w.write_u8(0)?;
                w.write_i16(i16::try_from(n_item).map_err(|_| too_many(n_item))?)?;
                w.write_i16(n_text as i16)?;
                w.write_i16(self.angle)?;
                w.write_i16(0)?;
                w.write_i32(if version == FormatVersion::V8 { 0 } else { 1 })?;
                w.write_delphi_string(None, 15)?;
            }
            FormatVersion::V12 => {
                w.write_i32(self.symbol)?;
                w.write_u8(self.otp)?;
                w.write_u8(0)?;
                w.write_i16(self.angle)?;
                w.write_u32(self.color)?;
                w.write_i16(self.line_width)?;
                w.write_i16(self.diam_flags)?;
                w.write_i32(self.server_object_id)?;
                w.write_i32(self.height)?;
                w.write_f64(self.creation_date)?;
                w.write_i32(self.multi_rep_id)?;
                w.write_f64(self.modification_date)?;
                w.write_i32(n_item as i32)?;
                w.write_u16(n_text as u16)?;
                w.write_u16(n_object_string as u16)?;
                w.write_u16(0)?;
                w.write_u8(self.object_string_type)?;
                w.write_u8(0)?;
            }
            _ => {
                w.write_i32(self.symbol)?;
                w.write_u8(self.otp)?;
                w.write_u8(0)?;
                w.write_i16(self.angle)?;
                w.write_i32(n_item as i32)?;
                w.write_i16(n_text as i16)?;
                w.write_i16(0)?;
                w.write_u32(self.color)?;
                w.write_i16(self.line_width)?;
                w.write_i16(self.diam_flags)?;
                w.write_zeros(16)?;
            }
        }
        for c in &self.coords {
            c.write(w)?;
        }
        if n_text > 0 {
            if version.has_unicode_text() {
                write_utf16(w, &self.text, n_text)?;
            } else {
                let mut bytes = encode_ansi(&self.text);
                bytes.resize(n_text * 8, 0);
                w.write_bytes(&bytes)?;
            }
        }
        if n_object_string > 0 {
            write_utf16(w, &self.object_string, n_object_string)?;
        }
        Ok(())
    }
}

fn write_utf16(w: &mut OcadStreamWriter, text: &str, units: usize) -> Result<()> {
    let mut chars = utf16_units(text);
    chars.resize(units * 4, 0);
    for c in chars {
        w.write_u16(c)?;
    }
    Ok(())
}

fn too_many(n: usize) -> OcadError {
    OcadError::NumericOverflow(format!("object with {} coordinates does not fit a 16-bit count", n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObjectRecord {
        let mut obj = ObjectRecord::new(4010, 4);
        obj.angle = 450;
        obj.coords = vec![OcadCoord::raw(256, 512), OcadCoord::raw(1024, 512)];
        obj.text = "Hügel\r\nNord".to_string();
        obj
    }

    #[test]
    fn test_header_sizes_and_len() {
        for version in FormatVersion::ALL {
            let obj = sample();
            let mut w = OcadStreamWriter::new();
            obj.write(&mut w, version).unwrap();
            let bytes = w.into_inner();
            let units = 2 + obj.text_units(version);
            assert_eq!(bytes.len(), version.object_header_size() + 8 * units, "{}", version);
            if version == FormatVersion::V8 {
                assert_eq!(obj.index_len(version), units as i32);
            } else {
                assert_eq!(obj.index_len(version) as usize, bytes.len());
            }
            let back = ObjectRecord::read(&mut OcadStreamReader::new(&bytes), version).unwrap();
            assert_eq!(back.coords, obj.coords);
            assert_eq!(back.text, obj.text);
            assert_eq!(back.angle, 450);
        }
    }

    #[test]
    fn test_text_unit_counts() {
        let mut obj = ObjectRecord::new(1, 4);
        obj.text = "abcd".to_string();
        assert_eq!(obj.text_units(FormatVersion::V9), 2);
        assert_eq!(obj.text_units(FormatVersion::V8), 1);
        obj.text = "abcdefgh".to_string();
        assert_eq!(obj.text_units(FormatVersion::V8), 2);
        obj.text.clear();
        assert_eq!(obj.text_units(FormatVersion::V9), 0);
    }

    #[test]
    fn test_v12_object_string() {
        let version = FormatVersion::V12;
        let mut obj = ObjectRecord::new(-4, 3);
        obj.color = 0xFF00_0000;
        obj.coords = vec![OcadCoord::raw(0, 0); 3];
        obj.object_string = "\to50".to_string();
        let mut w = OcadStreamWriter::new();
        obj.write(&mut w, version).unwrap();
        let bytes = w.into_inner();
        assert_eq!(obj.index_len(version) as usize, bytes.len());
        let back = ObjectRecord::read(&mut OcadStreamReader::new(&bytes), version).unwrap();
        assert_eq!(back.object_string, "\to50");
        assert_eq!(back.color, 0xFF00_0000);
    }

    #[test]
    fn test_negative_item_count_is_malformed() {
        let mut w = OcadStreamWriter::new();
        ObjectRecord::new(101000, 1).write(&mut w, FormatVersion::V9).unwrap();
        let mut bytes = w.into_inner();
        bytes[8..12].copy_from_slice(&(-5i32).to_le_bytes());
        let err = ObjectRecord::read(&mut OcadStreamReader::new(&bytes), FormatVersion::V9).unwrap_err();
        assert!(matches!(err, OcadError::MalformedStructure(_)));
    }
}
