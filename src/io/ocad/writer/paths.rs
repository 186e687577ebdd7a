//! Paths to stored coordinates.

use super::super::coord::{CoordFlags, OcadCoord};
use crate::error::Result;
use crate::path::{PointKind, SymPath, SymPathWithHoles};
use crate::types::FormatVersion;

/// Coordinates of one path. A synthesized closing point is not stored.
pub(super) fn path_coords(path: &SymPath, version: FormatVersion) -> Result<Vec<OcadCoord>> {
    let len = path.stored_len();
    let mut coords = Vec::with_capacity(len);
    for i in 0..len {
        let mut flags = CoordFlags::empty();
        match path.kind(i) {
            PointKind::Normal => {}
            PointKind::Corner => flags |= CoordFlags::CORNER,
            PointKind::Dash => {
                if version.has_element_dash_points() {
                    flags |= CoordFlags::DASH;
                }
            }
            PointKind::BezierControl => {
                if i > 0 && path.kind(i - 1) == PointKind::BezierControl {
                    flags |= CoordFlags::BEZIER_SECOND;
                } else {
                    flags |= CoordFlags::BEZIER_FIRST;
                }
            }
        }
        let cutout = path.cutout(i);
        if cutout.left {
            flags |= CoordFlags::NO_LEFT_LINE;
        }
        if cutout.right {
            flags |= CoordFlags::NO_RIGHT_LINE;
        }
        if cutout.main {
            flags |= CoordFlags::MAIN_CUTOUT;
        }
        coords.push(OcadCoord::encode(path.points[i], flags)?);
    }
    Ok(coords)
}

/// Coordinates of an area: the outer ring, then every hole with its first
/// coordinate flagged.
pub(super) fn area_coords(path: &SymPathWithHoles, version: FormatVersion) -> Result<Vec<OcadCoord>> {
    let mut coords = path_coords(&path.main, version)?;
    for hole in &path.holes {
        let start = coords.len();
        coords.extend(path_coords(hole, version)?);
        if let Some(first) = coords.get_mut(start) {
            *first = first.with_flags(first.flags() | CoordFlags::HOLE_START);
        }
    }
    Ok(coords)
}

/// Coordinates of a closed ring drawn as a line, closing point included.
pub(super) fn ring_line_coords(ring: &SymPath, version: FormatVersion) -> Result<Vec<OcadCoord>> {
    let mut line = ring.clone();
    line.last_point_synthesized = false;
    path_coords(&line, version)
}
