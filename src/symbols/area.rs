//! Area symbol definition

use super::SymbolCommon;
use crate::glyph::Glyph;
use crate::types::{ColorId, SymbolId};

/// One set of parallel hatch lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hatch {
    pub color: ColorId,
    pub width: f64,
    /// Center-to-center distance between hatch lines.
    pub spacing: f64,
    /// Degrees.
    pub angle: f64,
}

/// How pattern elements are cut at the area boundary (v12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternFillMode {
    #[default]
    Clip,
    CompletelyInside,
    CenterInside,
    PartiallyInside,
}

impl PatternFillMode {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => PatternFillMode::CompletelyInside,
            2 => PatternFillMode::CenterInside,
            3 => PatternFillMode::PartiallyInside,
            _ => PatternFillMode::Clip,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            PatternFillMode::Clip => 0,
            PatternFillMode::CompletelyInside => 1,
            PatternFillMode::CenterInside => 2,
            PatternFillMode::PartiallyInside => 3,
        }
    }
}

/// Random displacement of pattern elements (v12).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IrregularPattern {
    /// Fraction `0..=1` of the cell width.
    pub var_x: f64,
    pub var_y: f64,
    pub min_distance: f64,
}

/// A glyph tiled on a grid across the area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPattern {
    pub glyph: Glyph,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    /// Shift alternate rows by half a cell.
    pub offset_rows: bool,
    pub fill_mode: PatternFillMode,
    pub irregular: Option<IrregularPattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaSymDef {
    pub common: SymbolCommon,
    pub fill_color: Option<ColorId>,
    /// Line definition drawn along the outline.
    pub border: Option<SymbolId>,
    /// Up to two hatches. Two hatches share color, width and spacing.
    pub hatches: Vec<Hatch>,
    pub pattern: Option<AreaPattern>,
    /// Hatch and pattern follow the object angle.
    pub rotatable: bool,
}

impl AreaSymDef {
    pub fn new(id: SymbolId, name: impl Into<String>) -> Self {
        AreaSymDef {
            common: SymbolCommon::new(id, name),
            fill_color: None,
            border: None,
            hatches: Vec::new(),
            pattern: None,
            rotatable: false,
        }
    }

    pub fn filled(id: SymbolId, name: impl Into<String>, color: ColorId) -> Self {
        AreaSymDef {
            fill_color: Some(color),
            ..AreaSymDef::new(id, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_mode_codes() {
        for code in 0..4u8 {
            assert_eq!(PatternFillMode::from_code(code).code(), code);
        }
        assert_eq!(PatternFillMode::from_code(9), PatternFillMode::Clip);
    }
}
