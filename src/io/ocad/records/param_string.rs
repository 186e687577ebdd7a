//! String parameter records (v8+).
//!
//! A parameter string is a first field followed by tab-separated entries,
//! each a one-character code and its value:
//!
//! ```text
//! Forest.bmp\tx1200\ty-300\ta0
//! ```

use super::super::stream::{encode_ansi, OcadStreamReader, OcadStreamWriter};
use crate::error::Result;
use std::str::FromStr;

/// Entry of a string-parameter index block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringIndexEntry {
    pub pos: i32,
    pub len: i32,
    pub kind: i32,
    pub obj_index: i32,
}

impl StringIndexEntry {
    pub const SIZE: usize = 16;

    pub fn read(r: &mut OcadStreamReader<'_>) -> Result<Self> {
        Ok(StringIndexEntry {
            pos: r.read_i32()?,
            len: r.read_i32()?,
            kind: r.read_i32()?,
            obj_index: r.read_i32()?,
        })
    }

    pub fn write(&self, w: &mut OcadStreamWriter) -> Result<()> {
        w.write_i32(self.pos)?;
        w.write_i32(self.len)?;
        w.write_i32(self.kind)?;
        w.write_i32(self.obj_index)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamString {
    pub kind: i32,
    pub obj_index: i32,
    pub first: String,
    pub values: Vec<(char, String)>,
}

impl ParamString {
    pub fn new(kind: i32, first: impl Into<String>) -> Self {
        ParamString {
            kind,
            obj_index: 0,
            first: first.into(),
            values: Vec::new(),
        }
    }

    /// Split the stored text into its first field and coded entries.
    pub fn parse(kind: i32, text: &str) -> Self {
        let mut parts = text.split('\t');
        let first = parts.next().unwrap_or_default().to_string();
        let values = parts
            .filter_map(|part| {
                let mut chars = part.chars();
                chars.next().map(|code| (code, chars.as_str().to_string()))
            })
            .collect();
        ParamString {
            kind,
            obj_index: 0,
            first,
            values,
        }
    }

    pub fn format(&self) -> String {
        let mut out = self.first.clone();
        for (code, value) in &self.values {
            out.push('\t');
            out.push(*code);
            out.push_str(value);
        }
        out
    }

    /// Raw value of the first entry with `code`.
    pub fn get(&self, code: char) -> Option<&str> {
        self.values
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, v)| v.as_str())
    }

    fn get_parsed<T: FromStr>(&self, code: char) -> Option<T> {
        self.get(code).and_then(|v| v.trim().parse().ok())
    }

    /// Numeric value of `code`; `default` when absent or unparsable.
    pub fn get_f64(&self, code: char, default: f64) -> f64 {
        self.get_parsed(code).unwrap_or(default)
    }

    pub fn get_i32(&self, code: char, default: i32) -> i32 {
        self.get_parsed::<i32>(code)
            .or_else(|| self.get_parsed::<f64>(code).map(|v| v as i32))
            .unwrap_or(default)
    }

    pub fn get_bool(&self, code: char, default: bool) -> bool {
        self.get_i32(code, default as i32) != 0
    }

    pub fn push(&mut self, code: char, value: impl ToString) -> &mut Self {
        self.values.push((code, value.to_string()));
        self
    }

    /// Push a number without trailing zeros.
    pub fn push_f64(&mut self, code: char, value: f64) -> &mut Self {
        self.push(code, format_number(value))
    }

    pub fn push_bool(&mut self, code: char, value: bool) -> &mut Self {
        self.push(code, if value { 1 } else { 0 })
    }

    pub fn read(r: &mut OcadStreamReader<'_>, entry: &StringIndexEntry) -> Result<Self> {
        r.seek(entry.pos as u64)?;
        let text = r.read_ansi_chars(entry.len.max(0) as usize)?;
        let mut param = ParamString::parse(entry.kind, &text);
        param.obj_index = entry.obj_index;
        Ok(param)
    }

    /// Write the NUL-terminated record and return its index entry.
    pub fn write(&self, w: &mut OcadStreamWriter) -> Result<StringIndexEntry> {
        let pos = w.position();
        let mut bytes = encode_ansi(&self.format());
        let len = (bytes.len() + 2) & !1;
        bytes.resize(len, 0);
        w.write_bytes(&bytes)?;
        Ok(StringIndexEntry {
            pos: pos as i32,
            len: len as i32,
            kind: self.kind,
            obj_index: self.obj_index,
        })
    }
}

/// Shortest decimal form, as OCAD writes numbers in parameter strings.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.6}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ocad::constants::param_type;

    #[test]
    fn test_parse_template_string() {
        let p = ParamString::parse(param_type::TEMPLATE, "C:\\maps\\forest.bmp\tx1200\ty-300.5\ta\ts0");
        assert_eq!(p.first, "C:\\maps\\forest.bmp");
        assert_eq!(p.get_f64('x', 0.0), 1200.0);
        assert_eq!(p.get_f64('y', 0.0), -300.5);
        // Empty value and missing key both fall back.
        assert_eq!(p.get_f64('a', 7.0), 7.0);
        assert_eq!(p.get_f64('b', 7.0), 7.0);
        assert!(!p.get_bool('s', true));
    }

    #[test]
    fn test_format_and_record_length() {
        let mut p = ParamString::new(param_type::SCALE, "");
        p.push_f64('m', 15000.0).push_f64('g', 0.25);
        assert_eq!(p.format(), "\tm15000\tg0.25");

        let mut w = OcadStreamWriter::new();
        let entry = p.write(&mut w).unwrap();
        let bytes = w.into_inner();
        // 13 chars + NUL rounded up to even.
        assert_eq!(entry.len, 14);
        assert_eq!(bytes.len(), 14);
        assert_eq!(*bytes.last().unwrap(), 0);

        let back = ParamString::read(&mut OcadStreamReader::new(&bytes), &entry).unwrap();
        assert_eq!(back.get_i32('m', 0), 15000);
        assert_eq!(back.kind, param_type::SCALE);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
    }
}
