//! Symbol definitions
//!
//! A symbol definition is a reusable appearance rule. Every definition is
//! one of four kinds, held in the closed [`SymbolDefinition`] union so each
//! codec path matches all of them exhaustively.
//!
//! # Module Structure
//!
//! - `point` - Point symbols (a single glyph)
//! - `line` - Line symbols (dashes, double lines, decorations)
//! - `area` - Area symbols (fill, hatching, patterns, border reference)
//! - `text` - Text and line-text symbols (font, framing, underline)

pub mod area;
pub mod line;
pub mod point;
pub mod text;

pub use area::{AreaPattern, AreaSymDef, Hatch, IrregularPattern, PatternFillMode};
pub use line::{
    DashInfo, DoubleLine, GlyphInfo, GlyphLocation, LineSymDef, SecondLine, Shortening,
};
pub use point::PointSymDef;
pub use text::{
    Framing, HorizAlign, TextKind, TextSymDef, Underline, VertAlign,
};

use crate::types::{ColorId, SymbolId};

/// Join and cap style of a stroked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// Round ends and corners.
    Rounded,
    /// Flat ends, mitered corners.
    Mitered,
    /// Flat ends, beveled corners.
    #[default]
    Beveled,
    /// Flat ends, round corners. Only used for glyph parts.
    FlatRounded,
}

/// Side length of a toolbox icon including its transparent border.
pub const ICON_SIZE: usize = 24;

/// A 24x24 RGBA toolbox icon. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxIcon {
    pixels: Vec<[u8; 4]>,
}

impl ToolboxIcon {
    pub const TRANSPARENT: [u8; 4] = [255, 255, 255, 0];

    /// A fully transparent icon.
    pub fn new() -> Self {
        ToolboxIcon {
            pixels: vec![Self::TRANSPARENT; ICON_SIZE * ICON_SIZE],
        }
    }

    pub fn pixel(&self, col: usize, row: usize) -> [u8; 4] {
        self.pixels
            .get(row * ICON_SIZE + col)
            .copied()
            .unwrap_or(Self::TRANSPARENT)
    }

    pub fn set_pixel(&mut self, col: usize, row: usize, rgba: [u8; 4]) {
        if col < ICON_SIZE && row < ICON_SIZE {
            self.pixels[row * ICON_SIZE + col] = rgba;
        }
    }
}

impl Default for ToolboxIcon {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields shared by every symbol kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCommon {
    pub id: SymbolId,
    pub name: String,
    pub hidden: bool,
    pub icon: Option<ToolboxIcon>,
}

impl SymbolCommon {
    pub fn new(id: SymbolId, name: impl Into<String>) -> Self {
        SymbolCommon {
            id,
            name: name.into(),
            hidden: false,
            icon: None,
        }
    }
}

/// Kind tag of a [`SymbolDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Point,
    Line,
    Area,
    Text,
}

/// A symbol definition of one of the four kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolDefinition {
    Point(PointSymDef),
    Line(LineSymDef),
    Area(AreaSymDef),
    Text(TextSymDef),
}

impl SymbolDefinition {
    pub fn common(&self) -> &SymbolCommon {
        match self {
            SymbolDefinition::Point(d) => &d.common,
            SymbolDefinition::Line(d) => &d.common,
            SymbolDefinition::Area(d) => &d.common,
            SymbolDefinition::Text(d) => &d.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut SymbolCommon {
        match self {
            SymbolDefinition::Point(d) => &mut d.common,
            SymbolDefinition::Line(d) => &mut d.common,
            SymbolDefinition::Area(d) => &mut d.common,
            SymbolDefinition::Text(d) => &mut d.common,
        }
    }

    pub fn id(&self) -> SymbolId {
        self.common().id
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            SymbolDefinition::Point(_) => SymbolKind::Point,
            SymbolDefinition::Line(_) => SymbolKind::Line,
            SymbolDefinition::Area(_) => SymbolKind::Area,
            SymbolDefinition::Text(_) => SymbolKind::Text,
        }
    }

    /// Every color this definition paints with, in first-use order.
    pub fn colors(&self) -> Vec<ColorId> {
        let mut out: Vec<ColorId> = Vec::new();
        let mut push = |c: Option<ColorId>| {
            if let Some(c) = c {
                if !out.contains(&c) {
                    out.push(c);
                }
            }
        };
        match self {
            SymbolDefinition::Point(d) => d.glyph.colors().into_iter().for_each(|c| push(Some(c))),
            SymbolDefinition::Line(d) => {
                push(d.color);
                if let Some(s) = &d.second_line {
                    push(Some(s.color));
                }
                if let Some(dbl) = &d.double_line {
                    push(dbl.fill_color);
                    push(dbl.left_color);
                    push(dbl.right_color);
                }
                for g in &d.glyphs {
                    g.glyph.colors().into_iter().for_each(|c| push(Some(c)));
                }
            }
            SymbolDefinition::Area(d) => {
                push(d.fill_color);
                for h in &d.hatches {
                    push(Some(h.color));
                }
                if let Some(p) = &d.pattern {
                    p.glyph.colors().into_iter().for_each(|c| push(Some(c)));
                }
            }
            SymbolDefinition::Text(d) => {
                push(Some(d.color));
                push(d.framing.color());
                if let Some(u) = &d.underline {
                    push(Some(u.color));
                }
            }
        }
        out
    }

    /// Finalize every glyph owned by this definition.
    pub fn finalize(&mut self) {
        match self {
            SymbolDefinition::Point(d) => d.glyph.finalize(),
            SymbolDefinition::Line(d) => d.glyphs.iter_mut().for_each(|g| g.glyph.finalize()),
            SymbolDefinition::Area(d) => {
                if let Some(p) = &mut d.pattern {
                    p.glyph.finalize();
                }
            }
            SymbolDefinition::Text(_) => {}
        }
    }
}

impl From<PointSymDef> for SymbolDefinition {
    fn from(d: PointSymDef) -> Self {
        SymbolDefinition::Point(d)
    }
}

impl From<LineSymDef> for SymbolDefinition {
    fn from(d: LineSymDef) -> Self {
        SymbolDefinition::Line(d)
    }
}

impl From<AreaSymDef> for SymbolDefinition {
    fn from(d: AreaSymDef) -> Self {
        SymbolDefinition::Area(d)
    }
}

impl From<TextSymDef> for SymbolDefinition {
    fn from(d: TextSymDef) -> Self {
        SymbolDefinition::Text(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_colors_deduplicated() {
        let mut line = LineSymDef::new(SymbolId::new(101, 0), "Road");
        line.color = Some(ColorId(3));
        line.second_line = Some(SecondLine {
            color: ColorId(3),
            width: 0.5,
            style: LineStyle::Mitered,
        });
        let def = SymbolDefinition::from(line);
        assert_eq!(def.kind(), SymbolKind::Line);
        assert_eq!(def.colors(), vec![ColorId(3)]);
    }

    #[test]
    fn test_icon_bounds() {
        let mut icon = ToolboxIcon::new();
        icon.set_pixel(30, 30, [0, 0, 0, 255]);
        icon.set_pixel(1, 2, [0, 0, 0, 255]);
        assert_eq!(icon.pixel(1, 2), [0, 0, 0, 255]);
        assert_eq!(icon.pixel(30, 30), ToolboxIcon::TRANSPARENT);
    }
}
