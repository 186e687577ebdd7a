//! Glyph elements stored inside symbol records.
//!
//! Element lists are sized in 8-byte units: each element takes two units of
//! header plus one unit per coordinate.

use super::super::coord::OcadCoord;
use super::super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::{OcadError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub kind: i16,
    /// Line style of line elements.
    pub flags: u16,
    pub color: i16,
    pub line_width: i16,
    pub diameter: i16,
    pub reserved: [i16; 2],
    pub coords: Vec<OcadCoord>,
}

impl Element {
    pub fn new(kind: i16, color: i16, coords: Vec<OcadCoord>) -> Self {
        Element {
            kind,
            color,
            coords,
            ..Default::default()
        }
    }

    /// Units taken by this element.
    pub fn units(&self) -> usize {
        2 + self.coords.len()
    }

    fn read(reader: &mut OcadStreamReader<'_>) -> Result<Self> {
        let kind = reader.read_i16()?;
        let flags = reader.read_u16()?;
        let color = reader.read_i16()?;
        let line_width = reader.read_i16()?;
        let diameter = reader.read_i16()?;
        let n_poly = reader.read_i16()?;
        let reserved = [reader.read_i16()?, reader.read_i16()?];
        if n_poly < 0 {
            return Err(OcadError::MalformedStructure(format!(
                "element with {} coordinates",
                n_poly
            )));
        }
        let mut coords = Vec::with_capacity(n_poly as usize);
        for _ in 0..n_poly {
            coords.push(OcadCoord::read(reader)?);
        }
        Ok(Element {
            kind,
            flags,
            color,
            line_width,
            diameter,
            reserved,
            coords,
        })
    }

    fn write(&self, writer: &mut OcadStreamWriter) -> Result<()> {
        writer.write_i16(self.kind)?;
        writer.write_u16(self.flags)?;
        writer.write_i16(self.color)?;
        writer.write_i16(self.line_width)?;
        writer.write_i16(self.diameter)?;
        writer.write_i16(self.coords.len() as i16)?;
        writer.write_i16(self.reserved[0])?;
        writer.write_i16(self.reserved[1])?;
        for c in &self.coords {
            c.write(writer)?;
        }
        Ok(())
    }
}

/// Read elements totalling `data_size` units.
pub fn read_elements(reader: &mut OcadStreamReader<'_>, data_size: i16) -> Result<Vec<Element>> {
    let mut remaining = data_size as i64;
    let mut elements = Vec::new();
    while remaining > 0 {
        let element = Element::read(reader)?;
        remaining -= element.units() as i64;
        elements.push(element);
    }
    if remaining < 0 {
        return Err(OcadError::MalformedStructure(format!(
            "symbol elements overrun their data size of {} by {} units",
            data_size, -remaining
        )));
    }
    Ok(elements)
}

pub fn write_elements(writer: &mut OcadStreamWriter, elements: &[Element]) -> Result<()> {
    for e in elements {
        e.write(writer)?;
    }
    Ok(())
}

/// Units taken by `elements`, as stored in the data size fields.
pub fn data_size(elements: &[Element]) -> Result<i16> {
    let total: usize = elements.iter().map(Element::units).sum();
    i16::try_from(total).map_err(|_| {
        OcadError::NumericOverflow(format!("glyph of {} units exceeds the element data limit", total))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Element> {
        let mut line = Element::new(1, 3, vec![OcadCoord::raw(0, 0), OcadCoord::raw(25600, 0)]);
        line.line_width = 25;
        let mut dot = Element::new(4, 3, vec![OcadCoord::raw(0, 0)]);
        dot.diameter = 50;
        vec![line, dot]
    }

    #[test]
    fn test_units_and_round_trip() {
        let elements = sample();
        assert_eq!(data_size(&elements).unwrap(), 7);
        let mut w = OcadStreamWriter::new();
        write_elements(&mut w, &elements).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes.len(), 7 * 8);
        let back = read_elements(&mut OcadStreamReader::new(&bytes), 7).unwrap();
        assert_eq!(back, elements);
    }

    #[test]
    fn test_size_mismatch_is_malformed() {
        let mut w = OcadStreamWriter::new();
        write_elements(&mut w, &sample()).unwrap();
        let bytes = w.into_inner();
        let err = read_elements(&mut OcadStreamReader::new(&bytes), 6).unwrap_err();
        assert!(matches!(err, OcadError::MalformedStructure(_)));
    }

    #[test]
    fn test_zero_size_reads_nothing() {
        let back = read_elements(&mut OcadStreamReader::new(&[]), 0).unwrap();
        assert!(back.is_empty());
    }
}
