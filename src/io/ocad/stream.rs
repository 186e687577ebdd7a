//! Positioned little-endian reader and writer over in-memory OCAD bytes.
//!
//! OCAD records are fixed-layout little-endian structures addressed by
//! absolute file offsets. Strings are Delphi short strings (a length byte
//! followed by a fixed-size Windows-1252 buffer).

use crate::error::{OcadError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use encoding_rs::WINDOWS_1252;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Decode Windows-1252 bytes.
pub fn decode_ansi(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Encode to Windows-1252. Characters outside the code page become `?`.
pub fn encode_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if had_errors || bytes.len() != 1 {
            out.push(b'?');
        } else {
            out.push(bytes[0]);
        }
    }
    out
}

fn eof_to_malformed(err: io::Error, position: u64) -> OcadError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        OcadError::MalformedStructure(format!("record extends past end of file at {}", position))
    } else {
        OcadError::Io(err)
    }
}

// ------------------------------------------------------------------
// Reading
// ------------------------------------------------------------------

/// Reader over the complete file contents.
pub struct OcadStreamReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

macro_rules! read_le {
    ($name:ident, $ty:ty, $method:ident) => {
        pub fn $name(&mut self) -> Result<$ty> {
            let pos = self.cursor.position();
            self.cursor
                .$method::<LittleEndian>()
                .map_err(|e| eof_to_malformed(e, pos))
        }
    };
}

impl<'a> OcadStreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        OcadStreamReader {
            cursor: Cursor::new(data),
        }
    }

    /// Total file length.
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Whether `pos..pos+size` lies inside the file.
    pub fn contains(&self, pos: i64, size: u64) -> bool {
        pos > 0 && (pos as u64).saturating_add(size) <= self.len()
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.len() {
            return Err(OcadError::MalformedStructure(format!(
                "offset {} outside file of {} bytes",
                pos,
                self.len()
            )));
        }
        self.cursor.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        let target = self.position() + count as u64;
        self.seek(target)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let pos = self.cursor.position();
        self.cursor.read_u8().map_err(|e| eof_to_malformed(e, pos))
    }

    read_le!(read_i16, i16, read_i16);
    read_le!(read_u16, u16, read_u16);
    read_le!(read_i32, i32, read_i32);
    read_le!(read_u32, u32, read_u32);
    read_le!(read_f64, f64, read_f64);

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let pos = self.cursor.position();
        let mut buf = vec![0u8; count];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|e| eof_to_malformed(e, pos))?;
        Ok(buf)
    }

    /// Delphi string of capacity `capacity`: one length byte plus `capacity` bytes.
    pub fn read_delphi_string(&mut self, capacity: usize) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(capacity)?;
        Ok(decode_ansi(&bytes[..len.min(capacity)]))
    }

    /// `count` Windows-1252 characters, cut at the first NUL.
    pub fn read_ansi_chars(&mut self, count: usize) -> Result<String> {
        let bytes = self.read_bytes(count)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Ok(decode_ansi(&bytes[..end]))
    }

    /// `count` UTF-16 code units, cut at the first NUL.
    pub fn read_utf16_chars(&mut self, count: usize) -> Result<String> {
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(self.read_u16()?);
        }
        let end = units.iter().position(|u| *u == 0).unwrap_or(units.len());
        Ok(String::from_utf16_lossy(&units[..end]))
    }
}

// ------------------------------------------------------------------
// Writing
// ------------------------------------------------------------------

/// Writer producing the file in memory; supports patching earlier offsets.
pub struct OcadStreamWriter {
    cursor: Cursor<Vec<u8>>,
}

macro_rules! write_le {
    ($name:ident, $ty:ty, $method:ident) => {
        pub fn $name(&mut self, value: $ty) -> Result<()> {
            self.cursor.$method::<LittleEndian>(value)?;
            Ok(())
        }
    };
}

impl OcadStreamWriter {
    pub fn new() -> Self {
        OcadStreamWriter {
            cursor: Cursor::new(Vec::new()),
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.cursor.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Move to the end of the written data.
    pub fn seek_end(&mut self) -> Result<u64> {
        Ok(self.cursor.seek(SeekFrom::End(0))?)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.cursor.write_u8(value)?;
        Ok(())
    }

    write_le!(write_i16, i16, write_i16);
    write_le!(write_u16, u16, write_u16);
    write_le!(write_i32, i32, write_i32);
    write_le!(write_u32, u32, write_u32);
    write_le!(write_f64, f64, write_f64);

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.cursor.write_all(bytes)?;
        Ok(())
    }

    pub fn write_zeros(&mut self, count: usize) -> Result<()> {
        self.write_bytes(&vec![0u8; count])
    }

    /// Delphi string of capacity `capacity`. Longer text is truncated.
    pub fn write_delphi_string(&mut self, text: Option<&str>, capacity: usize) -> Result<()> {
        let mut buf = vec![0u8; capacity + 1];
        if let Some(text) = text {
            let bytes = encode_ansi(text);
            let len = bytes.len().min(capacity);
            buf[0] = len as u8;
            buf[1..=len].copy_from_slice(&bytes[..len]);
        }
        self.write_bytes(&buf)
    }

    /// Overwrite an i32 at `pos` and return to the current position.
    pub fn patch_i32(&mut self, pos: u64, value: i32) -> Result<()> {
        let here = self.position();
        self.seek(pos)?;
        self.write_i32(value)?;
        self.seek(here)
    }

    pub fn patch_u16(&mut self, pos: u64, value: u16) -> Result<()> {
        let here = self.position();
        self.seek(pos)?;
        self.write_u16(value)?;
        self.seek(here)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }

    /// Copy the finished bytes into `out`.
    pub fn copy_to<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.cursor.get_ref())?;
        Ok(())
    }
}

impl Default for OcadStreamWriter {
    fn default() -> Self {
        Self::new()
    }
}
