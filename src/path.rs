//! Paths of lines, areas and glyph elements

use crate::types::{BoundingBox2D, Vector2};

/// Role of a point within a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointKind {
    #[default]
    Normal,
    /// Bezier control point. Always appears in runs of two.
    BezierControl,
    Corner,
    Dash,
}

/// Per-segment cutout flags for double lines and the main line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cutout {
    pub left: bool,
    pub right: bool,
    pub main: bool,
}

impl Cutout {
    pub fn any(&self) -> bool {
        self.left || self.right || self.main
    }
}

/// An ordered sequence of points with a parallel kind per point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymPath {
    pub points: Vec<Vector2>,
    pub kinds: Vec<PointKind>,
    /// One entry per segment (`points.len() - 1`), `None` when no cutouts exist.
    pub cutouts: Option<Vec<Cutout>>,
    /// The last point duplicates the first to close an area ring and is
    /// not stored on disk.
    pub last_point_synthesized: bool,
}

impl SymPath {
    pub fn new(points: Vec<Vector2>, kinds: Vec<PointKind>) -> Self {
        SymPath {
            points,
            kinds,
            cutouts: None,
            last_point_synthesized: false,
        }
    }

    /// A path made only of normal points.
    pub fn from_points(points: Vec<Vector2>) -> Self {
        let kinds = vec![PointKind::Normal; points.len()];
        SymPath::new(points, kinds)
    }

    /// A closed ring. The closing point is marked synthesized.
    pub fn closed(points: Vec<Vector2>) -> Self {
        let mut path = SymPath::from_points(points);
        if let Some(first) = path.points.first().copied() {
            if path.points.last() != Some(&first) || path.points.len() == 1 {
                path.points.push(first);
                path.kinds.push(PointKind::Normal);
                path.last_point_synthesized = true;
            }
        }
        path
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn kind(&self, index: usize) -> PointKind {
        self.kinds.get(index).copied().unwrap_or_default()
    }

    pub fn cutout(&self, index: usize) -> Cutout {
        self.cutouts
            .as_ref()
            .and_then(|c| c.get(index).copied())
            .unwrap_or_default()
    }

    /// Points as stored on disk (without the synthesized closing point).
    pub fn stored_len(&self) -> usize {
        if self.last_point_synthesized {
            self.points.len().saturating_sub(1)
        } else {
            self.points.len()
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_points(&self.points)
    }

    /// Whether the bezier invariant holds: control points in runs of two,
    /// never first or last.
    pub fn is_well_formed(&self) -> bool {
        if self.kinds.first() == Some(&PointKind::BezierControl)
            || self.kinds.last() == Some(&PointKind::BezierControl)
        {
            return false;
        }
        let mut run = 0;
        for kind in &self.kinds {
            if *kind == PointKind::BezierControl {
                run += 1;
            } else {
                if run != 0 && run != 2 {
                    return false;
                }
                run = 0;
            }
        }
        true
    }
}

/// An area outline plus zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymPathWithHoles {
    pub main: SymPath,
    pub holes: Vec<SymPath>,
}

impl SymPathWithHoles {
    pub fn new(main: SymPath, holes: Vec<SymPath>) -> Self {
        SymPathWithHoles { main, holes }
    }

    pub fn bounds(&self) -> Option<BoundingBox2D> {
        let mut bounds = self.main.bounds()?;
        for hole in &self.holes {
            for p in &hole.points {
                bounds.expand_to_include(*p);
            }
        }
        Some(bounds)
    }
}
