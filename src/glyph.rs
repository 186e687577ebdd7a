//! Small vector drawings used by point symbols, line decorations and area patterns

use crate::path::{SymPath, SymPathWithHoles};
use crate::symbols::LineStyle;
use crate::types::{BoundingBox2D, ColorId, Vector2};

/// One primitive element of a glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphPart {
    Line {
        color: ColorId,
        width: f64,
        style: LineStyle,
        path: SymPath,
    },
    Area {
        color: ColorId,
        path: SymPathWithHoles,
    },
    /// Outlined circle. `diameter` is measured to the outer edge of the stroke.
    Circle {
        color: ColorId,
        center: Vector2,
        width: f64,
        diameter: f64,
    },
    FilledCircle {
        color: ColorId,
        center: Vector2,
        diameter: f64,
    },
}

impl GlyphPart {
    pub fn color(&self) -> ColorId {
        match self {
            GlyphPart::Line { color, .. }
            | GlyphPart::Area { color, .. }
            | GlyphPart::Circle { color, .. }
            | GlyphPart::FilledCircle { color, .. } => *color,
        }
    }

    fn bounds(&self) -> Option<BoundingBox2D> {
        match self {
            GlyphPart::Line { width, path, .. } => path.bounds().map(|b| b.inflated(width / 2.0)),
            GlyphPart::Area { path, .. } => path.bounds(),
            GlyphPart::Circle {
                center, diameter, ..
            }
            | GlyphPart::FilledCircle {
                center, diameter, ..
            } => Some(BoundingBox2D::from_point(*center).inflated(diameter / 2.0)),
        }
    }
}

/// An ordered list of glyph parts. Parts are painted in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Glyph {
    parts: Vec<GlyphPart>,
    finalized: bool,
    radius: f64,
}

impl Glyph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, part: GlyphPart) {
        self.parts.push(part);
        self.finalized = false;
    }

    pub fn parts(&self) -> &[GlyphPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Compute derived data. Must be called before the glyph is consumed.
    pub fn finalize(&mut self) {
        self.radius = self
            .parts
            .iter()
            .filter_map(GlyphPart::bounds)
            .map(|b| {
                [b.min, b.max, Vector2::new(b.min.x, b.max.y), Vector2::new(b.max.x, b.min.y)]
                    .iter()
                    .map(|p| p.length())
                    .fold(0.0, f64::max)
            })
            .fold(0.0, f64::max);
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Distance from the origin to the farthest painted point.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Every distinct color painted by this glyph, in first-use order.
    pub fn colors(&self) -> Vec<ColorId> {
        let mut out = Vec::new();
        for part in &self.parts {
            let c = part.color();
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_radius() {
        let mut glyph = Glyph::new();
        glyph.add_part(GlyphPart::FilledCircle {
            color: ColorId(1),
            center: Vector2::new(0.0, 0.0),
            diameter: 1.0,
        });
        glyph.add_part(GlyphPart::Circle {
            color: ColorId(2),
            center: Vector2::new(0.0, 0.0),
            width: 0.1,
            diameter: 2.0,
        });
        assert!(!glyph.is_finalized());
        glyph.finalize();
        assert!(glyph.is_finalized());
        assert!((glyph.radius() - 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(glyph.colors(), vec![ColorId(1), ColorId(2)]);
    }
}
