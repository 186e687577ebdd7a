//! Text object boxes.
//!
//! Object records store the box around a text next to its anchor. OCAD
//! redoes the layout on load, so the box only has to be close.

use crate::io::ocad::metrics::TextMetrics;
use crate::symbols::{HorizAlign, TextSymDef, VertAlign};
use crate::types::{FormatVersion, Vector2};

/// Box of a formatted text: bottom left, bottom right, top right and top
/// left, where the top left corner is `location`.
pub(super) fn formatted_box(location: Vector2, width: f64, height: f64, angle: f64) -> Vec<Vector2> {
    let top_left = location;
    let top_right = top_left.moved(angle, width);
    let bottom_right = top_right.moved(angle + 90.0, -height);
    let bottom_left = bottom_right.moved(angle, -width);
    vec![bottom_left, bottom_right, top_right, top_left]
}

/// Anchor and box of an unformatted single-anchor text.
pub(super) fn anchored_box(
    location: Vector2,
    angle: f64,
    lines: &[String],
    def: &TextSymDef,
    metrics: &TextMetrics,
    version: FormatVersion,
) -> Vec<Vector2> {
    let extent = metrics.extent(lines);
    let mut left = location;
    if version.has_vertical_text_alignment() {
        match def.vert_align {
            VertAlign::TopAscent => left = left.moved(angle + 90.0, -metrics.w_height),
            VertAlign::Midpoint => left = left.moved(angle + 90.0, -metrics.w_height / 2.0),
            _ => {}
        }
    }
    left = left.moved(angle + 90.0, -metrics.descent);
    match def.horiz_align {
        HorizAlign::Right => left = left.moved(angle, -extent.x),
        HorizAlign::Center => left = left.moved(angle, -extent.x / 2.0),
        HorizAlign::Left | HorizAlign::Justified => {}
    }

    let bottom_right = left.moved(angle, extent.x);
    let top_right = bottom_right.moved(angle + 90.0, metrics.descent + metrics.ascent);
    let top_left = top_right.moved(angle, -extent.x);
    vec![location, left, bottom_right, top_right, top_left]
}

/// Stored text of an object: lines joined by CR LF. A leading empty line
/// gets an extra separator so it survives the reader dropping one.
pub(super) fn joined_text(lines: &[String]) -> String {
    let text = lines.join("\r\n");
    match lines.first() {
        Some(first) if first.is_empty() && lines.len() > 1 => format!("\r\n{}", text),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ocad::metrics::CHAR_WIDTH;
    use crate::types::SymbolId;

    fn def() -> TextSymDef {
        let mut def = TextSymDef::new(SymbolId::new(101, 0), "Label");
        def.font_size = 4.0;
        def.line_spacing = 5.0;
        def
    }

    fn close(a: Vector2, b: Vector2) -> bool {
        a.distance(&b) < 1e-9
    }

    #[test]
    fn test_formatted_box_corners() {
        let corners = formatted_box(Vector2::new(10.0, 20.0), 30.0, 8.0, 0.0);
        assert!(close(corners[3], Vector2::new(10.0, 20.0)));
        assert!(close(corners[2], Vector2::new(40.0, 20.0)));
        assert!(close(corners[1], Vector2::new(40.0, 12.0)));
        assert!(close(corners[0], Vector2::new(10.0, 12.0)));
    }

    #[test]
    fn test_anchor_is_first_point() {
        let d = def();
        let m = TextMetrics::fixed(&d);
        let lines = vec!["abc".to_string()];
        let points = anchored_box(Vector2::new(1.0, 2.0), 0.0, &lines, &d, &m, FormatVersion::V11);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], Vector2::new(1.0, 2.0));
        // Left aligned at the baseline: box starts at the anchor.
        assert!(close(points[1], Vector2::new(1.0, 2.0)));
        assert!(close(points[2], Vector2::new(1.0 + 3.0 * 4.0 * CHAR_WIDTH, 2.0)));
    }

    #[test]
    fn test_centered_box_straddles_anchor() {
        let mut d = def();
        d.horiz_align = HorizAlign::Center;
        let m = TextMetrics::fixed(&d);
        let lines = vec!["ab".to_string()];
        let points = anchored_box(Vector2::ZERO, 0.0, &lines, &d, &m, FormatVersion::V9);
        assert!((points[1].x + points[2].x).abs() < 1e-9);
    }

    #[test]
    fn test_extent_uses_line_spacing_for_several_lines() {
        let m = TextMetrics::fixed(&def());
        let one = m.extent(&["x".to_string()]);
        let three = m.extent(&["x".to_string(), "yy".to_string(), "z".to_string()]);
        assert_eq!(one.y, 4.0);
        assert_eq!(three.y, 15.0);
        assert!(three.x > one.x);
    }

    #[test]
    fn test_joined_text_keeps_leading_blank() {
        let lines = vec!["".to_string(), "x".to_string()];
        assert_eq!(joined_text(&lines), "\r\n\r\nx");
        assert_eq!(joined_text(&["a".to_string(), "b".to_string()]), "a\r\nb");
        assert_eq!(joined_text(&[]), "");
    }
}
