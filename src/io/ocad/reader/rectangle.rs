//! Legacy rectangle objects.
//!
//! Rectangle definitions become line definitions. Each rectangle object is
//! replaced by its outline and, when the definition has a grid, by grid-line
//! and cell-number instances of two synthesized definitions. All generated
//! points are rounded to two decimals so that re-encoding is byte stable.

use crate::instances::{LineInstance, SymbolInstance, TextInstance};
use crate::path::{PointKind, SymPath};
use crate::types::{SymbolId, Vector2};
use nalgebra::{Isometry2, Point2};

/// Bezier handle length of a quarter circle.
const KAPPA: f64 = 0.5522847498;

/// Row and column layout of a rectangle grid.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RectangleGrid {
    pub lines: SymbolId,
    pub text: SymbolId,
    pub number_from_bottom: bool,
    pub cell_width: f64,
    pub cell_height: f64,
    pub unnumbered_cells: i32,
    pub unnumbered_text: String,
}

/// What a rectangle definition adds on top of its line definition.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RectangleInfo {
    pub corner_radius: f64,
    pub grid: Option<RectangleGrid>,
}

/// Placement of one rectangle object.
struct Placement {
    size: Vector2,
    angle: f64,
    transform: Isometry2<f64>,
}

impl Placement {
    fn place(&self, local: Vector2) -> Vector2 {
        let p = self.transform.transform_point(&Point2::new(local.x, local.y));
        Vector2::new(p.x, p.y).rounded(2)
    }

    fn path(&self, points: &[Vector2], kinds: Vec<PointKind>) -> SymPath {
        SymPath::new(points.iter().map(|p| self.place(*p)).collect(), kinds)
    }
}

impl RectangleInfo {
    /// Instances replacing a rectangle object with corners `corners`.
    /// Empty for fewer than four corners or a zero-size rectangle.
    pub fn expand(&self, outline: SymbolId, corners: &[Vector2]) -> Vec<SymbolInstance> {
        let [p0, p1, _, p3] = match corners {
            [a, b, c, d, ..] => [*a, *b, *c, *d],
            _ => return Vec::new(),
        };
        let size = Vector2::new(p0.distance(&p1), p0.distance(&p3));
        if size.x == 0.0 && size.y == 0.0 {
            return Vec::new();
        }
        let angle = p0.angle_to_degrees(&p1);
        let placement = Placement {
            size,
            angle,
            transform: Isometry2::new(nalgebra::Vector2::new(p0.x, p0.y), angle.to_radians()),
        };

        let mut out = vec![SymbolInstance::Line(LineInstance {
            symbol: outline,
            path: self.outline(&placement),
        })];
        if let Some(grid) = &self.grid {
            if size.x > 0.0 && size.y > 0.0 {
                grid.expand(&placement, &mut out);
            }
        }
        out
    }

    fn outline(&self, at: &Placement) -> SymPath {
        let (w, h) = (at.size.x, at.size.y);
        let r = self.corner_radius.min(w / 2.0).min(h / 2.0).max(0.0);
        if w == 0.0 {
            return at.path(&[Vector2::ZERO, Vector2::new(0.0, h)], vec![PointKind::Corner; 2]);
        }
        if h == 0.0 {
            return at.path(&[Vector2::ZERO, Vector2::new(w, 0.0)], vec![PointKind::Corner; 2]);
        }
        if r == 0.0 {
            let points = [
                Vector2::ZERO,
                Vector2::new(0.0, h),
                Vector2::new(w, h),
                Vector2::new(w, 0.0),
                Vector2::ZERO,
            ];
            return at.path(&points, vec![PointKind::Corner; 5]);
        }

        let k = (1.0 - KAPPA) * r;
        let points = [
            Vector2::new(r, 0.0),
            Vector2::new(w - r, 0.0),
            Vector2::new(w - k, 0.0),
            Vector2::new(w, k),
            Vector2::new(w, r),
            Vector2::new(w, h - r),
            Vector2::new(w, h - k),
            Vector2::new(w - k, h),
            Vector2::new(w - r, h),
            Vector2::new(r, h),
            Vector2::new(k, h),
            Vector2::new(0.0, h - k),
            Vector2::new(0.0, h - r),
            Vector2::new(0.0, r),
            Vector2::new(0.0, k),
            Vector2::new(k, 0.0),
            Vector2::new(r, 0.0),
        ];
        let mut kinds = Vec::with_capacity(points.len());
        for _ in 0..4 {
            kinds.extend([
                PointKind::Normal,
                PointKind::Normal,
                PointKind::BezierControl,
                PointKind::BezierControl,
            ]);
        }
        kinds.push(PointKind::Normal);
        at.path(&points, kinds)
    }
}

fn cell_count(length: f64, cell: f64) -> i32 {
    if cell <= 0.0 {
        return 1;
    }
    ((length / cell).round() as i32).max(1)
}

impl RectangleGrid {
    fn expand(&self, at: &Placement, out: &mut Vec<SymbolInstance>) {
        let (w, h) = (at.size.x, at.size.y);
        let columns = cell_count(w, self.cell_width);
        let rows = cell_count(h, self.cell_height);
        let cell_w = w / columns as f64;
        let cell_h = h / rows as f64;
        let normal = || vec![PointKind::Normal; 2];

        for x in 1..columns {
            let x = x as f64 * cell_w;
            out.push(SymbolInstance::Line(LineInstance {
                symbol: self.lines,
                path: at.path(&[Vector2::new(x, 0.0), Vector2::new(x, h)], normal()),
            }));
        }
        for y in 1..rows {
            let y = y as f64 * cell_h;
            out.push(SymbolInstance::Line(LineInstance {
                symbol: self.lines,
                path: at.path(&[Vector2::new(0.0, y), Vector2::new(w, y)], normal()),
            }));
        }

        let cells = columns * rows;
        for y in 0..rows {
            for x in 0..columns {
                let number = if self.number_from_bottom {
                    y * columns + x + 1
                } else {
                    (rows - 1 - y) * columns + x + 1
                };
                let label = if number > cells - self.unnumbered_cells {
                    self.unnumbered_text.clone()
                } else {
                    number.to_string()
                };
                let local = Vector2::new(
                    (x as f64 + 0.07) * cell_w,
                    (y as f64 + 0.96) * cell_h,
                );
                out.push(SymbolInstance::Text(TextInstance {
                    symbol: self.text,
                    lines: vec![label],
                    location: at.place(local),
                    rotation: at.angle,
                    width: 0.0,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: SymbolId = SymbolId::new(710, 0);

    fn square(size: f64) -> Vec<Vector2> {
        vec![
            Vector2::new(10.0, 10.0),
            Vector2::new(10.0 + size, 10.0),
            Vector2::new(10.0 + size, 10.0 + size),
            Vector2::new(10.0, 10.0 + size),
        ]
    }

    fn grid(unnumbered_text: &str) -> RectangleGrid {
        RectangleGrid {
            lines: SymbolId::new(999, 950),
            text: SymbolId::new(999, 951),
            number_from_bottom: false,
            cell_width: 10.0,
            cell_height: 10.0,
            unnumbered_cells: 1,
            unnumbered_text: unnumbered_text.to_string(),
        }
    }

    #[test]
    fn test_plain_outline_has_corners() {
        let info = RectangleInfo {
            corner_radius: 0.0,
            grid: None,
        };
        let out = info.expand(OUTLINE, &square(20.0));
        assert_eq!(out.len(), 1);
        let SymbolInstance::Line(line) = &out[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.path.len(), 5);
        assert_eq!(line.path.points[2], Vector2::new(30.0, 30.0));
        assert!(line.path.kinds.iter().all(|k| *k == PointKind::Corner));
    }

    #[test]
    fn test_rounded_outline_is_well_formed() {
        let info = RectangleInfo {
            corner_radius: 2.0,
            grid: None,
        };
        let out = info.expand(OUTLINE, &square(20.0));
        let SymbolInstance::Line(line) = &out[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.path.len(), 17);
        assert!(line.path.is_well_formed());
        assert_eq!(line.path.points[0], line.path.points[16]);
        assert_eq!(line.path.points[0], Vector2::new(12.0, 10.0));
    }

    #[test]
    fn test_zero_size_is_dropped() {
        let info = RectangleInfo {
            corner_radius: 0.0,
            grid: None,
        };
        assert!(info.expand(OUTLINE, &square(0.0)).is_empty());
        assert!(info.expand(OUTLINE, &square(5.0)[..3]).is_empty());
    }

    #[test]
    fn test_grid_lines_and_numbers() {
        let info = RectangleInfo {
            corner_radius: 0.0,
            grid: Some(grid("X")),
        };
        let out = info.expand(OUTLINE, &square(20.0));
        // outline + 1 vertical + 1 horizontal + 4 cells
        assert_eq!(out.len(), 7);
        let labels: Vec<String> = out
            .iter()
            .filter_map(|i| match i {
                SymbolInstance::Text(t) => Some(t.lines[0].clone()),
                _ => None,
            })
            .collect();
        // Numbered from the top, last cell unnumbered.
        assert_eq!(labels, vec!["3", "X", "1", "2"]);
    }

    #[test]
    fn test_labels_sit_near_lower_left_of_cell() {
        let info = RectangleInfo {
            corner_radius: 0.0,
            grid: Some(grid("")),
        };
        let out = info.expand(OUTLINE, &square(20.0));
        let texts: Vec<&TextInstance> = out
            .iter()
            .filter_map(|i| match i {
                SymbolInstance::Text(t) => Some(t),
                _ => None,
            })
            .collect();
        // The blank label of the unnumbered cell is still placed.
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[1].lines, vec![String::new()]);
        assert_eq!(texts[0].location, Vector2::new(10.7, 19.6));
        assert_eq!(texts[3].location, Vector2::new(20.7, 29.6));
    }

    #[test]
    fn test_rotated_rectangle_points_rounded() {
        let info = RectangleInfo {
            corner_radius: 0.0,
            grid: None,
        };
        let corners = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 10.0),
            Vector2::new(-5.0, 10.0),
            Vector2::new(-5.0, 0.0),
        ];
        let out = info.expand(OUTLINE, &corners);
        let SymbolInstance::Line(line) = &out[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.path.points[2], Vector2::new(-5.0, 10.0));
    }
}
