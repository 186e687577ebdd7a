//! Placed symbols (objects)
//!
//! Most instances reference a definition by [`SymbolId`]. Graphics and
//! image instances carry their own color and have no definition.

use crate::path::{SymPath, SymPathWithHoles};
use crate::symbols::LineStyle;
use crate::types::{BoundingBox2D, Cmyk, ColorId, SymbolId, Vector2};

#[derive(Debug, Clone, PartialEq)]
pub struct PointInstance {
    pub symbol: SymbolId,
    pub location: Vector2,
    /// Degrees.
    pub rotation: f64,
    /// Start/end angle pairs (degrees) of circle gaps.
    pub gaps: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineInstance {
    pub symbol: SymbolId,
    pub path: SymPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaInstance {
    pub symbol: SymbolId,
    pub path: SymPathWithHoles,
    /// Hatch/pattern angle in degrees.
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextInstance {
    pub symbol: SymbolId,
    pub lines: Vec<String>,
    /// Top-left of the text box for formatted text, the anchor point otherwise.
    pub location: Vector2,
    pub rotation: f64,
    /// Wrapping width. `0` for unformatted text.
    pub width: f64,
}

impl TextInstance {
    pub fn is_formatted(&self) -> bool {
        self.width > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineTextInstance {
    pub symbol: SymbolId,
    pub path: SymPath,
    pub text: String,
}

/// Stroke of a path with an inline palette color (broken-apart symbol).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsLine {
    pub color: ColorId,
    pub width: f64,
    pub style: LineStyle,
    pub path: SymPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsArea {
    pub color: ColorId,
    pub path: SymPathWithHoles,
}

/// Stroke with an inline CMYK color from an imported image or the layout layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLine {
    pub cmyk: Cmyk,
    pub width: f64,
    pub style: LineStyle,
    pub path: SymPath,
    pub layout: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageArea {
    pub cmyk: Cmyk,
    pub path: SymPathWithHoles,
    pub layout: bool,
}

/// A placed symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolInstance {
    Point(PointInstance),
    Line(LineInstance),
    Area(AreaInstance),
    Text(TextInstance),
    LineText(LineTextInstance),
    GraphicsLine(GraphicsLine),
    GraphicsArea(GraphicsArea),
    ImageLine(ImageLine),
    ImageArea(ImageArea),
}

impl SymbolInstance {
    /// Referenced definition, `None` for graphics and image objects.
    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            SymbolInstance::Point(i) => Some(i.symbol),
            SymbolInstance::Line(i) => Some(i.symbol),
            SymbolInstance::Area(i) => Some(i.symbol),
            SymbolInstance::Text(i) => Some(i.symbol),
            SymbolInstance::LineText(i) => Some(i.symbol),
            SymbolInstance::GraphicsLine(_)
            | SymbolInstance::GraphicsArea(_)
            | SymbolInstance::ImageLine(_)
            | SymbolInstance::ImageArea(_) => None,
        }
    }

    /// Whether this instance is stored with a negative symbol number (v9+ only).
    pub fn is_inline(&self) -> bool {
        self.symbol().is_none()
    }

    /// Bounds of the geometry, without stroke widths.
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        match self {
            SymbolInstance::Point(i) => Some(BoundingBox2D::from_point(i.location)),
            SymbolInstance::Line(i) => i.path.bounds(),
            SymbolInstance::LineText(i) => i.path.bounds(),
            SymbolInstance::GraphicsLine(i) => i.path.bounds(),
            SymbolInstance::ImageLine(i) => i.path.bounds(),
            SymbolInstance::Area(i) => i.path.bounds(),
            SymbolInstance::GraphicsArea(i) => i.path.bounds(),
            SymbolInstance::ImageArea(i) => i.path.bounds(),
            SymbolInstance::Text(i) => Some(BoundingBox2D::from_point(i.location)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_instances_have_no_symbol() {
        let g = SymbolInstance::GraphicsArea(GraphicsArea {
            color: ColorId(2),
            path: SymPathWithHoles::default(),
        });
        assert!(g.is_inline());
        let p = SymbolInstance::Point(PointInstance {
            symbol: SymbolId::new(101, 0),
            location: Vector2::new(1.0, 2.0),
            rotation: 0.0,
            gaps: Vec::new(),
        });
        assert_eq!(p.symbol(), Some(SymbolId::new(101, 0)));
        assert_eq!(p.bounds().map(|b| b.min), Some(Vector2::new(1.0, 2.0)));
    }
}
