//! Geometry and document comparison utilities for tests.
//!
//! Coordinates are stored in 1/100 mm, so positions compare with a
//! tolerance of half a unit. Dimensions survive exactly up to that grid.

#![allow(dead_code)]

use ocadrust::path::SymPath;
use ocadrust::types::Vector2;
use ocadrust::{MapDocument, SymbolInstance};

/// Tolerance for stored coordinates and dimensions (mm).
pub const TOL: f64 = 0.006;

/// Tolerance for angles (degrees); stored in tenths.
pub const ANGLE_TOL: f64 = 0.051;

// ===========================================================================
// Scalar & point assertions
// ===========================================================================

/// Check approximate equality of two f64 values within `tol`.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

/// Assert two f64 values are approximately equal.
pub fn assert_f64_eq(a: f64, b: f64, tol: f64) {
    assert!(
        approx_eq(a, b, tol),
        "f64 mismatch: {a} vs {b} (delta={}, tol={tol})",
        (a - b).abs()
    );
}

/// Assert two Vector2 values are approximately equal component-wise.
pub fn assert_vec2_eq(a: &Vector2, b: &Vector2, tol: f64) {
    assert!(
        approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol),
        "Vector2 mismatch: ({},{}) vs ({},{}) tol={tol}",
        a.x,
        a.y,
        b.x,
        b.y
    );
}

// ===========================================================================
// Diff-based comparison helpers
// ===========================================================================

/// Append a diff message if two f64 values differ beyond `tol`.
pub fn check_f64(diffs: &mut Vec<String>, name: &str, a: f64, b: f64, tol: f64) {
    if !approx_eq(a, b, tol) {
        diffs.push(format!("{name}: {a} vs {b}"));
    }
}

/// Append a diff message if two Vector2 values differ beyond [`TOL`].
pub fn check_vec2(diffs: &mut Vec<String>, name: &str, a: &Vector2, b: &Vector2) {
    if !approx_eq(a.x, b.x, TOL) || !approx_eq(a.y, b.y, TOL) {
        diffs.push(format!("{name}: ({},{}) vs ({},{})", a.x, a.y, b.x, b.y));
    }
}

/// Compare points, point kinds and the closing flag of two paths.
pub fn check_path(diffs: &mut Vec<String>, name: &str, a: &SymPath, b: &SymPath) {
    if a.len() != b.len() {
        diffs.push(format!("{name}: {} points vs {}", a.len(), b.len()));
        return;
    }
    for (i, (pa, pb)) in a.points.iter().zip(&b.points).enumerate() {
        check_vec2(diffs, &format!("{name}[{i}]"), pa, pb);
    }
    if a.kinds != b.kinds {
        diffs.push(format!("{name}: kinds {:?} vs {:?}", a.kinds, b.kinds));
    }
    if a.last_point_synthesized != b.last_point_synthesized {
        diffs.push(format!("{name}: closing point synthesized differs"));
    }
}

// ===========================================================================
// Per-instance comparison
// ===========================================================================

/// Compare the geometry and references of two instances of the same variant.
pub fn compare_instances(a: &SymbolInstance, b: &SymbolInstance) -> Vec<String> {
    let mut d = Vec::new();
    if a.symbol() != b.symbol() {
        d.push(format!("symbol: {:?} vs {:?}", a.symbol(), b.symbol()));
    }
    match (a, b) {
        (SymbolInstance::Point(a), SymbolInstance::Point(b)) => {
            check_vec2(&mut d, "location", &a.location, &b.location);
            check_f64(&mut d, "rotation", a.rotation, b.rotation, ANGLE_TOL);
            if a.gaps.len() != b.gaps.len() {
                d.push(format!("gaps: {} vs {}", a.gaps.len(), b.gaps.len()));
            }
        }
        (SymbolInstance::Line(a), SymbolInstance::Line(b)) => {
            check_path(&mut d, "path", &a.path, &b.path);
        }
        (SymbolInstance::Area(a), SymbolInstance::Area(b)) => {
            check_path(&mut d, "main", &a.path.main, &b.path.main);
            if a.path.holes.len() != b.path.holes.len() {
                d.push(format!("holes: {} vs {}", a.path.holes.len(), b.path.holes.len()));
            } else {
                for (i, (ha, hb)) in a.path.holes.iter().zip(&b.path.holes).enumerate() {
                    check_path(&mut d, &format!("hole{i}"), ha, hb);
                }
            }
            check_f64(&mut d, "angle", a.angle, b.angle, ANGLE_TOL);
        }
        (SymbolInstance::Text(a), SymbolInstance::Text(b)) => {
            if a.lines != b.lines {
                d.push(format!("lines: {:?} vs {:?}", a.lines, b.lines));
            }
            check_vec2(&mut d, "location", &a.location, &b.location);
            check_f64(&mut d, "width", a.width, b.width, 2.0 * TOL);
            check_f64(&mut d, "rotation", a.rotation, b.rotation, ANGLE_TOL);
        }
        (SymbolInstance::LineText(a), SymbolInstance::LineText(b)) => {
            check_path(&mut d, "path", &a.path, &b.path);
            if a.text != b.text {
                d.push(format!("text: {:?} vs {:?}", a.text, b.text));
            }
        }
        (SymbolInstance::GraphicsLine(a), SymbolInstance::GraphicsLine(b)) => {
            check_path(&mut d, "path", &a.path, &b.path);
            if a.color != b.color || a.style != b.style {
                d.push(format!("stroke: {:?} {:?} vs {:?} {:?}", a.color, a.style, b.color, b.style));
            }
            check_f64(&mut d, "width", a.width, b.width, TOL);
        }
        (SymbolInstance::GraphicsArea(a), SymbolInstance::GraphicsArea(b)) => {
            check_path(&mut d, "main", &a.path.main, &b.path.main);
            if a.color != b.color {
                d.push(format!("color: {} vs {}", a.color, b.color));
            }
        }
        (SymbolInstance::ImageLine(a), SymbolInstance::ImageLine(b)) => {
            check_path(&mut d, "path", &a.path, &b.path);
            if a.cmyk != b.cmyk || a.layout != b.layout {
                d.push(format!("image: {:?} {} vs {:?} {}", a.cmyk, a.layout, b.cmyk, b.layout));
            }
        }
        (SymbolInstance::ImageArea(a), SymbolInstance::ImageArea(b)) => {
            check_path(&mut d, "main", &a.path.main, &b.path.main);
            if a.cmyk != b.cmyk || a.layout != b.layout {
                d.push(format!("image: {:?} {} vs {:?} {}", a.cmyk, a.layout, b.cmyk, b.layout));
            }
        }
        _ => d.push(format!(
            "variant: {} vs {}",
            super::instance_kind(a),
            super::instance_kind(b)
        )),
    }
    d
}

// ===========================================================================
// Document comparison
// ===========================================================================

/// Compare palette, symbol table and the instances in order. Returns one
/// message per difference.
pub fn compare_documents(expected: &MapDocument, actual: &MapDocument) -> Vec<String> {
    let mut d = Vec::new();

    let ids = |doc: &MapDocument| doc.colors().iter().map(|c| (c.id, c.name.clone())).collect::<Vec<_>>();
    if ids(expected) != ids(actual) {
        d.push(format!("palette: {:?} vs {:?}", ids(expected), ids(actual)));
    }
    for (a, b) in expected.colors().iter().zip(actual.colors()) {
        let (ca, cb) = (a.cmyk, b.cmyk);
        let channels = [
            (ca.cyan, cb.cyan),
            (ca.magenta, cb.magenta),
            (ca.yellow, cb.yellow),
            (ca.black, cb.black),
        ];
        if channels.iter().any(|(x, y)| (x - y).abs() > 0.01) {
            d.push(format!("color {}: {:?} vs {:?}", a.id, ca, cb));
        }
    }

    let symbols = |doc: &MapDocument| {
        doc.symbols()
            .map(|s| (s.id(), s.kind(), s.name().to_string()))
            .collect::<Vec<_>>()
    };
    if symbols(expected) != symbols(actual) {
        d.push(format!("symbols: {:?} vs {:?}", symbols(expected), symbols(actual)));
    }

    if expected.instance_count() != actual.instance_count() {
        d.push(format!(
            "instance count: {} vs {}",
            expected.instance_count(),
            actual.instance_count()
        ));
    }
    for (i, (a, b)) in expected.instances().iter().zip(actual.instances()).enumerate() {
        for diff in compare_instances(a, b) {
            d.push(format!("instance {i} ({}): {diff}", super::instance_kind(a)));
        }
    }
    d
}
