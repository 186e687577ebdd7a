//! Text and line-text symbol definitions

use super::{LineStyle, SymbolCommon};
use crate::types::{ColorId, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertAlign {
    /// Top of the ascent of the first line.
    TopAscent,
    /// Midway between ascent and baseline of the first line.
    Midpoint,
    #[default]
    Baseline,
    BaselineLast,
    MidpointAllLines,
    Bottom,
}

/// Whether text is laid out freely or along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextKind {
    #[default]
    Normal,
    LineText,
}

/// Decoration around the glyphs of a text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Framing {
    #[default]
    None,
    /// Outline stroke around every glyph.
    Line {
        color: ColorId,
        width: f64,
        style: LineStyle,
    },
    /// Copy of the text offset behind it.
    Shadow { color: ColorId, dx: f64, dy: f64 },
    /// Filled rectangle behind the text box.
    Rectangle {
        color: ColorId,
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },
}

impl Framing {
    pub fn color(&self) -> Option<ColorId> {
        match self {
            Framing::None => None,
            Framing::Line { color, .. }
            | Framing::Shadow { color, .. }
            | Framing::Rectangle { color, .. } => Some(*color),
        }
    }
}

/// Line under every paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Underline {
    pub color: ColorId,
    pub width: f64,
    /// Distance below the baseline.
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSymDef {
    pub common: SymbolCommon,
    pub kind: TextKind,
    pub font_name: String,
    /// Em size in mm.
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: ColorId,
    /// Baseline to baseline distance in mm.
    pub line_spacing: f64,
    pub paragraph_spacing: f64,
    pub first_indent: f64,
    pub rest_indent: f64,
    /// Additional space between characters, as a fraction of the em.
    pub char_spacing: f64,
    /// Word space as a fraction of the normal space.
    pub word_spacing: f64,
    /// Tab stop positions in mm, at most 32.
    pub tabs: Vec<f64>,
    pub horiz_align: HorizAlign,
    pub vert_align: VertAlign,
    pub framing: Framing,
    pub underline: Option<Underline>,
    /// Point symbol marking the text center (v10+).
    pub center_point: Option<SymbolId>,
}

impl TextSymDef {
    pub fn new(id: SymbolId, name: impl Into<String>) -> Self {
        TextSymDef {
            common: SymbolCommon::new(id, name),
            kind: TextKind::Normal,
            font_name: "Arial".to_string(),
            font_size: 3.0,
            bold: false,
            italic: false,
            color: ColorId(0),
            line_spacing: 3.0,
            paragraph_spacing: 0.0,
            first_indent: 0.0,
            rest_indent: 0.0,
            char_spacing: 0.0,
            word_spacing: 1.0,
            tabs: Vec::new(),
            horiz_align: HorizAlign::Left,
            vert_align: VertAlign::Baseline,
            framing: Framing::None,
            underline: None,
            center_point: None,
        }
    }

    /// Font size in points.
    pub fn font_size_points(&self) -> f64 {
        self.font_size * 72.0 / 25.4
    }
}
