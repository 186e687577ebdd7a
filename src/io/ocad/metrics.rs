//! Fixed text metrics.
//!
//! No font rasterizer is involved: extents come from fixed proportions of
//! the em size. The ascent equals the em size, so text placed from an
//! em-based position needs no ascent correction.

use crate::symbols::TextSymDef;
use crate::types::Vector2;

/// Average glyph advance as a share of the em size.
pub(crate) const CHAR_WIDTH: f64 = 0.6;
/// Height of a lowercase `w` as a share of the em size.
const W_HEIGHT: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextMetrics {
    pub em: f64,
    pub ascent: f64,
    pub descent: f64,
    pub w_height: f64,
    pub line_spacing: f64,
    pub char_spacing: f64,
}

impl TextMetrics {
    pub fn fixed(def: &TextSymDef) -> Self {
        let em = def.font_size;
        TextMetrics {
            em,
            ascent: em,
            descent: 0.0,
            w_height: em * W_HEIGHT,
            line_spacing: if def.line_spacing > 0.0 { def.line_spacing } else { em },
            char_spacing: def.char_spacing,
        }
    }

    fn line_width(&self, line: &str) -> f64 {
        let chars = line.chars().count() as f64;
        chars * self.em * (CHAR_WIDTH + self.char_spacing)
    }

    /// Width of the widest line and height of all lines.
    pub fn extent(&self, lines: &[String]) -> Vector2 {
        let width = lines
            .iter()
            .map(|l| self.line_width(l))
            .fold(0.0, f64::max);
        let height = if lines.len() > 1 {
            lines.len() as f64 * self.line_spacing
        } else {
            self.em
        };
        Vector2::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolId;

    #[test]
    fn test_fixed_ascent_is_one_em() {
        let mut def = TextSymDef::new(SymbolId::new(101, 0), "Label");
        def.font_size = 5.0;
        def.line_spacing = 0.0;
        let m = TextMetrics::fixed(&def);
        assert_eq!(m.ascent, m.em);
        assert_eq!(m.descent, 0.0);
        assert_eq!(m.line_spacing, 5.0);
    }

    #[test]
    fn test_explicit_line_spacing_is_kept() {
        let mut def = TextSymDef::new(SymbolId::new(101, 0), "Label");
        def.font_size = 5.0;
        def.line_spacing = 3.0;
        assert_eq!(TextMetrics::fixed(&def).line_spacing, 3.0);
    }
}
