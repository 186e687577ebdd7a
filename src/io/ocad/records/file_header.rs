//! The fixed 48-byte file header.

use super::super::constants::OCAD_MARK;
use super::super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::{OcadError, Result};
use crate::types::FormatVersion;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub mark: u16,
    pub section_mark: i16,
    pub version: i16,
    pub subversion: i16,
    pub first_symbol_block: i32,
    pub first_index_block: i32,
    pub setup_pos: i32,
    pub setup_size: i32,
    pub info_pos: i32,
    pub info_size: i32,
    pub first_string_block: i32,
    pub reserved: [i32; 3],
}

impl FileHeader {
    /// A header for `version` with every offset zero.
    pub fn new(version: FormatVersion) -> Self {
        FileHeader {
            mark: OCAD_MARK,
            section_mark: version.section_mark(),
            version: version.number(),
            subversion: version.subversion(),
            ..Default::default()
        }
    }

    /// Read and validate the header at the current position.
    pub fn read(reader: &mut OcadStreamReader<'_>) -> Result<Self> {
        let mark = reader.read_u16()?;
        if mark != OCAD_MARK {
            return Err(OcadError::InvalidMagic(mark));
        }
        let section_mark = reader.read_i16()?;
        let version = reader.read_i16()?;
        FormatVersion::from_number(version)?;
        let subversion = reader.read_i16()?;
        let mut header = FileHeader {
            mark,
            section_mark,
            version,
            subversion,
            first_symbol_block: reader.read_i32()?,
            first_index_block: reader.read_i32()?,
            setup_pos: reader.read_i32()?,
            setup_size: reader.read_i32()?,
            info_pos: reader.read_i32()?,
            info_size: reader.read_i32()?,
            first_string_block: reader.read_i32()?,
            reserved: [0; 3],
        };
        for slot in header.reserved.iter_mut() {
            *slot = reader.read_i32()?;
        }
        Ok(header)
    }

    pub fn format_version(&self) -> Result<FormatVersion> {
        FormatVersion::from_number(self.version)
    }

    pub fn write(&self, writer: &mut OcadStreamWriter) -> Result<()> {
        writer.write_u16(self.mark)?;
        writer.write_i16(self.section_mark)?;
        writer.write_i16(self.version)?;
        writer.write_i16(self.subversion)?;
        writer.write_i32(self.first_symbol_block)?;
        writer.write_i32(self.first_index_block)?;
        writer.write_i32(self.setup_pos)?;
        writer.write_i32(self.setup_size)?;
        writer.write_i32(self.info_pos)?;
        writer.write_i32(self.info_size)?;
        writer.write_i32(self.first_string_block)?;
        for value in self.reserved {
            writer.write_i32(value)?;
        }
        Ok(())
    }
}
