//! Object index entries.

use super::super::coord::OcadCoord;
use super::super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::Result;
use crate::types::FormatVersion;

/// Status of a live (not deleted) v9+ object.
pub const STATUS_NORMAL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexEntry {
    pub lower_left: OcadCoord,
    pub upper_right: OcadCoord,
    pub pos: i32,
    /// v6/v7: bytes; v8: `nItem + nText`; v9+: bytes.
    pub len: i32,
    pub symbol: i32,
    pub obj_type: u8,
    pub encrypted: u8,
    pub status: u8,
    pub view_type: u8,
    pub color: i16,
    pub imp_layer: i16,
}

impl IndexEntry {
    pub fn size(version: FormatVersion) -> usize {
        if version.is_legacy() {
            24
        } else {
            40
        }
    }

    pub fn read(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<Self> {
        let lower_left = OcadCoord::read(r)?;
        let upper_right = OcadCoord::read(r)?;
        let pos = r.read_i32()?;
        if version.is_legacy() {
            let len = r.read_i16()? as i32;
            let symbol = r.read_i16()? as i32;
            return Ok(IndexEntry {
                lower_left,
                upper_right,
                pos,
                len,
                symbol,
                ..Default::default()
            });
        }
        let len = r.read_i32()?;
        let symbol = r.read_i32()?;
        let obj_type = r.read_u8()?;
        let encrypted = r.read_u8()?;
        let status = r.read_u8()?;
        let view_type = r.read_u8()?;
        let color = r.read_i16()?;
        let _reserved = r.read_i16()?;
        let imp_layer = r.read_i16()?;
        let _reserved = r.read_i16()?;
        Ok(IndexEntry {
            lower_left,
            upper_right,
            pos,
            len,
            symbol,
            obj_type,
            encrypted,
            status,
            view_type,
            color,
            imp_layer,
        })
    }

    pub fn write(&self, w: &mut OcadStreamWriter, version: FormatVersion) -> Result<()> {
        self.lower_left.write(w)?;
        self.upper_right.write(w)?;
        w.write_i32(self.pos)?;
        if version.is_legacy() {
            w.write_i16(self.len as i16)?;
            return w.write_i16(self.symbol as i16);
        }
        w.write_i32(self.len)?;
        w.write_i32(self.symbol)?;
        w.write_u8(self.obj_type)?;
        w.write_u8(self.encrypted)?;
        w.write_u8(self.status)?;
        w.write_u8(self.view_type)?;
        w.write_i16(self.color)?;
        w.write_i16(0)?;
        w.write_i16(self.imp_layer)?;
        w.write_i16(0)
    }

    /// Whether the entry refers to an object that should be read.
    pub fn is_live(&self, version: FormatVersion) -> bool {
        self.symbol != 0 && (version.is_legacy() || self.status == STATUS_NORMAL)
    }
}
