//! The v6–v8 symbol header: screen settings, the color table and color
//! separations.

use super::super::constants::{MAX_COLORS, MAX_COLOR_SEPARATIONS};
use super::super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::Result;
use crate::types::{Cmyk, Color, ColorId};

/// CMYK channels are stored as bytes where 200 means 100%.
const CMYK_FULL: f32 = 200.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorInfo {
    pub number: i16,
    /// `-1` when the color overprints.
    pub overprint: i16,
    pub cmyk: [u8; 4],
    pub name: String,
    pub separation_percentage: [u8; MAX_COLOR_SEPARATIONS],
}

impl Default for ColorInfo {
    fn default() -> Self {
        ColorInfo {
            number: 0,
            overprint: 0,
            cmyk: [0; 4],
            name: String::new(),
            separation_percentage: [0; MAX_COLOR_SEPARATIONS],
        }
    }
}

impl ColorInfo {
    pub fn from_color(color: &Color) -> Self {
        let scaled = color.cmyk.scaled(CMYK_FULL);
        ColorInfo {
            number: color.id.0,
            overprint: if color.overprint { -1 } else { 0 },
            cmyk: scaled.map(|v| v.clamp(0, 255) as u8),
            name: color.name.clone(),
            separation_percentage: [255; MAX_COLOR_SEPARATIONS],
        }
    }

    pub fn to_color(&self) -> Color {
        let mut color = Color::new(
            ColorId(self.number),
            self.name.clone(),
            Cmyk::from_scaled(self.cmyk.map(i32::from), CMYK_FULL),
        );
        color.overprint = self.overprint != 0;
        color
    }

    fn read(reader: &mut OcadStreamReader<'_>) -> Result<Self> {
        let number = reader.read_i16()?;
        let overprint = reader.read_i16()?;
        let mut cmyk = [0u8; 4];
        for c in cmyk.iter_mut() {
            *c = reader.read_u8()?;
        }
        let name = reader.read_delphi_string(31)?;
        let mut separation_percentage = [0u8; MAX_COLOR_SEPARATIONS];
        separation_percentage.copy_from_slice(&reader.read_bytes(MAX_COLOR_SEPARATIONS)?);
        Ok(ColorInfo {
            number,
            overprint,
            cmyk,
            name,
            separation_percentage,
        })
    }

    fn write(&self, writer: &mut OcadStreamWriter) -> Result<()> {
        writer.write_i16(self.number)?;
        writer.write_i16(self.overprint)?;
        writer.write_bytes(&self.cmyk)?;
        writer.write_delphi_string(Some(&self.name), 31)?;
        writer.write_bytes(&self.separation_percentage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSeparation {
    pub name: String,
    pub cmyk: [u8; 4],
    pub raster_freq: i16,
    pub raster_angle: i16,
}

impl ColorSeparation {
    fn read(reader: &mut OcadStreamReader<'_>) -> Result<Self> {
        let name = reader.read_delphi_string(15)?;
        let mut cmyk = [0u8; 4];
        for c in cmyk.iter_mut() {
            *c = reader.read_u8()?;
        }
        Ok(ColorSeparation {
            name,
            cmyk,
            raster_freq: reader.read_i16()?,
            raster_angle: reader.read_i16()?,
        })
    }

    fn write(&self, writer: &mut OcadStreamWriter) -> Result<()> {
        writer.write_delphi_string(Some(&self.name), 15)?;
        writer.write_bytes(&self.cmyk)?;
        writer.write_i16(self.raster_freq)?;
        writer.write_i16(self.raster_angle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolHeader {
    pub n_colors: i16,
    pub n_color_sep: i16,
    pub cyan_freq: i16,
    pub cyan_angle: i16,
    pub magenta_freq: i16,
    pub magenta_angle: i16,
    pub yellow_freq: i16,
    pub yellow_angle: i16,
    pub black_freq: i16,
    pub black_angle: i16,
    pub reserved: [i16; 2],
    /// Always `MAX_COLORS` slots; the first `n_colors` are used.
    pub colors: Vec<ColorInfo>,
    pub separations: Vec<ColorSeparation>,
}

impl Default for SymbolHeader {
    fn default() -> Self {
        SymbolHeader {
            n_colors: 0,
            n_color_sep: 0,
            cyan_freq: 1500,
            cyan_angle: 150,
            magenta_freq: 1500,
            magenta_angle: 750,
            yellow_freq: 1500,
            yellow_angle: 0,
            black_freq: 1500,
            black_angle: 450,
            reserved: [0; 2],
            colors: vec![ColorInfo::default(); MAX_COLORS],
            separations: vec![ColorSeparation::default(); MAX_COLOR_SEPARATIONS],
        }
    }
}

impl SymbolHeader {
    /// Serialized size.
    pub const SIZE: usize = 24 + MAX_COLORS * 72 + MAX_COLOR_SEPARATIONS * 24;

    pub fn read(reader: &mut OcadStreamReader<'_>) -> Result<Self> {
        let mut fields = [0i16; 12];
        for f in fields.iter_mut() {
            *f = reader.read_i16()?;
        }
        let mut colors = Vec::with_capacity(MAX_COLORS);
        for _ in 0..MAX_COLORS {
            colors.push(ColorInfo::read(reader)?);
        }
        let mut separations = Vec::with_capacity(MAX_COLOR_SEPARATIONS);
        for _ in 0..MAX_COLOR_SEPARATIONS {
            separations.push(ColorSeparation::read(reader)?);
        }
        Ok(SymbolHeader {
            n_colors: fields[0],
            n_color_sep: fields[1],
            cyan_freq: fields[2],
            cyan_angle: fields[3],
            magenta_freq: fields[4],
            magenta_angle: fields[5],
            yellow_freq: fields[6],
            yellow_angle: fields[7],
            black_freq: fields[8],
            black_angle: fields[9],
            reserved: [fields[10], fields[11]],
            colors,
            separations,
        })
    }

    pub fn write(&self, writer: &mut OcadStreamWriter) -> Result<()> {
        for v in [
            self.n_colors,
            self.n_color_sep,
            self.cyan_freq,
            self.cyan_angle,
            self.magenta_freq,
            self.magenta_angle,
            self.yellow_freq,
            self.yellow_angle,
            self.black_freq,
            self.black_angle,
            self.reserved[0],
            self.reserved[1],
        ] {
            writer.write_i16(v)?;
        }
        for i in 0..MAX_COLORS {
            match self.colors.get(i) {
                Some(c) => c.write(writer)?,
                None => ColorInfo::default().write(writer)?,
            }
        }
        for i in 0..MAX_COLOR_SEPARATIONS {
            match self.separations.get(i) {
                Some(s) => s.write(writer)?,
                None => ColorSeparation::default().write(writer)?,
            }
        }
        Ok(())
    }

    /// Palette in paint order. The table holds the topmost color first.
    pub fn palette(&self) -> Vec<Color> {
        let n = (self.n_colors.max(0) as usize).min(self.colors.len());
        self.colors[..n].iter().rev().map(ColorInfo::to_color).collect()
    }

    /// Replace the color table with `palette`, topmost color first.
    pub fn set_palette(&mut self, palette: &[Color]) {
        let n = palette.len().min(MAX_COLORS);
        self.n_colors = n as i16;
        self.colors = vec![ColorInfo::default(); MAX_COLORS];
        for (i, color) in palette.iter().take(n).enumerate() {
            self.colors[n - 1 - i] = ColorInfo::from_color(color);
        }
    }

    /// Copy with an empty color table, kept to reproduce the other fields.
    pub fn without_colors(&self) -> SymbolHeader {
        SymbolHeader {
            n_colors: 0,
            colors: vec![ColorInfo::default(); MAX_COLORS],
            ..self.clone()
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = OcadStreamWriter::new();
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SymbolHeader::read(&mut OcadStreamReader::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<Color> {
        vec![
            Color::new(ColorId(0), "Black", Cmyk::new(0.0, 0.0, 0.0, 1.0)),
            Color::new(ColorId(3), "Blue", Cmyk::new(1.0, 0.0, 0.0, 0.0)),
            Color::new(ColorId(7), "Yellow 50%", Cmyk::new(0.0, 0.0, 0.5, 0.0)),
        ]
    }

    #[test]
    fn test_reversed_table_order() {
        let mut header = SymbolHeader::default();
        header.set_palette(&palette());
        assert_eq!(header.n_colors, 3);
        assert_eq!(header.colors[0].number, 7);
        assert_eq!(header.colors[2].number, 0);
        assert_eq!(header.colors[0].cmyk, [0, 0, 100, 0]);
        assert_eq!(header.palette(), palette());
    }

    #[test]
    fn test_size_and_round_trip() {
        let mut header = SymbolHeader::default();
        header.set_palette(&palette());
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), SymbolHeader::SIZE);
        let back = SymbolHeader::from_bytes(&bytes).unwrap();
        assert_eq!(back, header);
        assert_eq!(back.without_colors().n_colors, 0);
        assert_eq!(back.without_colors().black_angle, 450);
    }
}
