//! Line symbol definition

use super::{LineStyle, SymbolCommon};
use crate::glyph::Glyph;
use crate::types::{ColorId, SymbolId};

/// Dash pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashInfo {
    pub dash_length: f64,
    pub first_dash_length: f64,
    pub last_dash_length: f64,
    pub gap_length: f64,
    /// Minimum number of gaps drawn on a line.
    pub min_gaps: i32,
    /// Secondary gaps inside each dash.
    pub secondary_middle_gaps: i32,
    pub secondary_middle_length: f64,
    /// Secondary gaps inside the first and last dash.
    pub secondary_end_gaps: i32,
    pub secondary_end_length: f64,
}

/// A second parallel stroke drawn under the main line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondLine {
    pub color: ColorId,
    pub width: f64,
    pub style: LineStyle,
}

/// Double line: two outer strokes with an optional fill between them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleLine {
    /// Distance between the outer strokes.
    pub width: f64,
    pub fill_color: Option<ColorId>,
    pub left_color: Option<ColorId>,
    pub left_width: f64,
    pub right_color: Option<ColorId>,
    pub right_width: f64,
    pub left_dashed: bool,
    pub right_dashed: bool,
    pub fill_dashed: bool,
    pub dashes: DashInfo,
}

impl DoubleLine {
    pub fn any_dashed(&self) -> bool {
        self.left_dashed || self.right_dashed || self.fill_dashed
    }
}

/// End shortening.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shortening {
    pub start: f64,
    pub end: f64,
    pub pointy_ends: bool,
}

/// Where a decoration glyph is placed along a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphLocation {
    Corners,
    CornersIgnoreEnds,
    DashCenters,
    GapCenters,
    Spaced,
    SpacedOffset,
    SpacedDecrease,
    Start,
    End,
}

/// A decoration glyph and its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphInfo {
    pub glyph: Glyph,
    pub location: GlyphLocation,
    /// Glyphs drawn at each location.
    pub number: i32,
    /// Spacing between the `number` glyphs of one group.
    pub spacing: f64,
    /// Distance between groups for spaced placements.
    pub distance: f64,
    pub first_distance: f64,
    pub last_distance: f64,
    /// Offset along the line for [`GlyphLocation::SpacedOffset`].
    pub offset: f64,
    pub minimum: i32,
    /// Final scale factor for [`GlyphLocation::SpacedDecrease`].
    pub decrease_limit: f64,
    pub decrease_both_ends: bool,
}

impl GlyphInfo {
    pub fn new(glyph: Glyph, location: GlyphLocation) -> Self {
        GlyphInfo {
            glyph,
            location,
            number: 1,
            spacing: 0.0,
            distance: 0.0,
            first_distance: 0.0,
            last_distance: 0.0,
            offset: 0.0,
            minimum: 0,
            decrease_limit: 0.0,
            decrease_both_ends: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSymDef {
    pub common: SymbolCommon,
    /// Main stroke color. `None` draws no main stroke.
    pub color: Option<ColorId>,
    pub width: f64,
    pub style: LineStyle,
    pub second_line: Option<SecondLine>,
    pub double_line: Option<DoubleLine>,
    pub dashes: Option<DashInfo>,
    pub shortening: Option<Shortening>,
    pub glyphs: Vec<GlyphInfo>,
}

impl LineSymDef {
    pub fn new(id: SymbolId, name: impl Into<String>) -> Self {
        LineSymDef {
            common: SymbolCommon::new(id, name),
            color: None,
            width: 0.0,
            style: LineStyle::Beveled,
            second_line: None,
            double_line: None,
            dashes: None,
            shortening: None,
            glyphs: Vec::new(),
        }
    }

    /// A plain solid line.
    pub fn solid(id: SymbolId, name: impl Into<String>, color: ColorId, width: f64, style: LineStyle) -> Self {
        LineSymDef {
            color: Some(color),
            width,
            style,
            ..LineSymDef::new(id, name)
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.dashes.is_some()
    }

    /// Widest stroke drawn by this definition.
    pub fn max_thickness(&self) -> f64 {
        let mut max = self.width;
        if let Some(s) = &self.second_line {
            max = max.max(s.width);
        }
        if let Some(d) = &self.double_line {
            max = max.max(d.width + d.left_width + d.right_width);
        }
        max
    }

    /// First glyph placed at `location`.
    pub fn glyph_at(&self, location: GlyphLocation) -> Option<&GlyphInfo> {
        self.glyphs.iter().find(|g| g.location == location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_thickness() {
        let mut line = LineSymDef::solid(SymbolId::new(506, 0), "Path", ColorId(1), 0.25, LineStyle::Rounded);
        assert_eq!(line.max_thickness(), 0.25);
        line.double_line = Some(DoubleLine {
            width: 0.5,
            left_width: 0.1,
            right_width: 0.1,
            ..DoubleLine::default()
        });
        assert!((line.max_thickness() - 0.7).abs() < 1e-9);
    }
}
