//! Stored coordinates to paths.

use super::super::coord::{CoordFlags, OcadCoord};
use crate::path::{Cutout, PointKind, SymPath, SymPathWithHoles};

fn kind_of(coord: OcadCoord) -> PointKind {
    let flags = coord.flags();
    if flags.is_bezier() {
        PointKind::BezierControl
    } else if flags.contains(CoordFlags::CORNER) {
        PointKind::Corner
    } else if flags.contains(CoordFlags::DASH) {
        PointKind::Dash
    } else {
        PointKind::Normal
    }
}

fn cutout_of(coord: OcadCoord) -> Cutout {
    let flags = coord.flags();
    Cutout {
        left: flags.contains(CoordFlags::NO_LEFT_LINE),
        right: flags.contains(CoordFlags::NO_RIGHT_LINE),
        main: flags.contains(CoordFlags::MAIN_CUTOUT),
    }
}

fn is_hole_start(coord: OcadCoord) -> bool {
    coord.flags().contains(CoordFlags::HOLE_START)
}

/// Whether the bezier runs and hole starts of `coords` are well formed.
fn needs_repair(coords: &[OcadCoord], allow_holes: bool) -> bool {
    let Some(first) = coords.first() else {
        return false;
    };
    if first.flags().is_bezier() {
        return true;
    }
    let mut controls = 0;
    for (i, coord) in coords.iter().enumerate() {
        let bezier = coord.flags().is_bezier();
        if i >= 1 && is_hole_start(*coord) && (bezier || controls != 0 || !allow_holes) {
            return true;
        }
        if bezier {
            controls += 1;
        } else {
            if controls != 0 && controls != 2 {
                return true;
            }
            controls = 0;
        }
    }
    controls != 0
}

/// Drop control points that start a ring, end a ring, or form runs other
/// than two. Without `allow_holes` everything from the first hole on is
/// dropped.
fn repair(coords: &[OcadCoord], allow_holes: bool) -> Vec<OcadCoord> {
    let mut out: Vec<OcadCoord> = Vec::with_capacity(coords.len());
    let mut controls = 0usize;
    let mut at_start = true;

    for coord in coords {
        let mut coord = *coord;
        if is_hole_start(coord) {
            out.truncate(out.len() - controls);
            controls = 0;
            at_start = true;
            if !allow_holes {
                break;
            }
        }
        if coord.flags().is_bezier() {
            if !at_start {
                controls += 1;
                out.push(coord);
            }
        } else {
            if controls != 0 && controls != 2 {
                out.truncate(out.len() - controls);
            }
            controls = 0;
            if at_start && !out.is_empty() {
                // The control points that carried the hole flag may be gone.
                coord = coord.with_flags(coord.flags() | CoordFlags::HOLE_START);
            }
            out.push(coord);
            at_start = false;
        }
    }
    out.truncate(out.len() - controls);
    out
}

fn fixed(coords: &[OcadCoord], allow_holes: bool, fix: bool) -> Vec<OcadCoord> {
    if fix && needs_repair(coords, allow_holes) {
        log::debug!("repairing path of {} coordinates", coords.len());
        repair(coords, allow_holes)
    } else {
        coords.to_vec()
    }
}

/// A line path. `None` when fewer than two points remain.
pub fn line_path(coords: &[OcadCoord], fix: bool) -> Option<SymPath> {
    let coords = fixed(coords, false, fix);
    if coords.len() < 2 {
        return None;
    }
    let any_cutouts = coords.iter().any(|c| c.flags().any_cutout());
    let mut path = SymPath::new(
        coords.iter().map(|c| c.point()).collect(),
        coords.iter().map(|c| kind_of(*c)).collect(),
    );
    if any_cutouts {
        path.cutouts = Some(coords[..coords.len() - 1].iter().map(|c| cutout_of(*c)).collect());
    }
    Some(path)
}

fn ring(coords: &[OcadCoord], any_cutouts: bool) -> Option<SymPath> {
    let first = *coords.first()?;
    let size = coords.len();
    let close = size <= 1 || coords[size - 1].point() != first.point();

    let mut points: Vec<_> = coords.iter().map(|c| c.point()).collect();
    let mut kinds: Vec<_> = coords.iter().map(|c| kind_of(*c)).collect();
    if close {
        points.push(first.point());
        kinds.push(kind_of(first));
    }
    if points.len() < 2 {
        return None;
    }
    let mut path = SymPath::new(points, kinds);
    path.last_point_synthesized = close;
    if any_cutouts {
        let segments = path.points.len() - 1;
        let mut cutouts: Vec<Cutout> = coords.iter().take(segments).map(|c| cutout_of(*c)).collect();
        cutouts.resize(segments, Cutout::default());
        path.cutouts = Some(cutouts);
    }
    Some(path)
}

/// An area outline with holes. Every ring is closed.
pub fn area_path(coords: &[OcadCoord], fix: bool) -> Option<SymPathWithHoles> {
    let coords = fixed(coords, true, fix);
    if coords.len() < 2 {
        return None;
    }
    let any_cutouts = coords.iter().any(|c| c.flags().any_cutout());

    let mut rings: Vec<&[OcadCoord]> = Vec::new();
    let mut start = 0;
    for i in 1..=coords.len() {
        if i == coords.len() || is_hole_start(coords[i]) {
            rings.push(&coords[start..i]);
            start = i;
        }
    }
    let mut rings = rings.into_iter();
    let main = rings.next().and_then(|r| ring(r, any_cutouts))?;
    let holes = rings.filter_map(|r| ring(r, any_cutouts)).collect();
    Some(SymPathWithHoles::new(main, holes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector2;

    fn c(x: i32, y: i32, flags: CoordFlags) -> OcadCoord {
        OcadCoord::encode(Vector2::new(x as f64, y as f64), flags).unwrap()
    }

    const N: CoordFlags = CoordFlags::empty();
    const B1: CoordFlags = CoordFlags::BEZIER_FIRST;
    const B2: CoordFlags = CoordFlags::BEZIER_SECOND;

    #[test]
    fn test_well_formed_bezier_is_kept() {
        let coords = [c(0, 0, N), c(1, 0, B1), c(2, 0, B2), c(3, 0, CoordFlags::CORNER)];
        let path = line_path(&coords, true).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.kinds[1], PointKind::BezierControl);
        assert_eq!(path.kinds[3], PointKind::Corner);
        assert!(path.cutouts.is_none());
    }

    #[test]
    fn test_bad_runs_are_removed() {
        let coords = [c(0, 0, B1), c(1, 0, N), c(2, 0, B1), c(3, 0, N), c(4, 0, B1), c(5, 0, B2)];
        let path = line_path(&coords, true).unwrap();
        assert_eq!(path.points, vec![Vector2::new(1.0, 0.0), Vector2::new(3.0, 0.0)]);
        assert!(path.is_well_formed());
    }

    #[test]
    fn test_holes_cut_line_paths() {
        let coords = [c(0, 0, N), c(1, 0, N), c(5, 5, CoordFlags::HOLE_START), c(6, 5, N)];
        let path = line_path(&coords, true).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_area_rings_are_closed() {
        let coords = [
            c(0, 0, N),
            c(10, 0, N),
            c(10, 10, N),
            c(2, 2, CoordFlags::HOLE_START),
            c(3, 2, N),
            c(3, 3, N),
            c(2, 2, N),
        ];
        let area = area_path(&coords, true).unwrap();
        assert_eq!(area.main.len(), 4);
        assert!(area.main.last_point_synthesized);
        assert_eq!(area.holes.len(), 1);
        // Already closed by its last point.
        assert_eq!(area.holes[0].len(), 4);
        assert!(!area.holes[0].last_point_synthesized);
    }

    #[test]
    fn test_hole_start_survives_removed_controls() {
        let coords = [
            c(0, 0, N),
            c(10, 0, N),
            c(10, 10, N),
            c(2, 2, CoordFlags::HOLE_START | B1),
            c(3, 2, N),
            c(3, 3, N),
        ];
        let area = area_path(&coords, true).unwrap();
        assert_eq!(area.holes.len(), 1);
        assert_eq!(area.holes[0].points[0], Vector2::new(3.0, 2.0));
    }

    #[test]
    fn test_cutouts_per_segment() {
        let coords = [c(0, 0, CoordFlags::NO_LEFT_LINE), c(1, 0, N), c(2, 0, N)];
        let path = line_path(&coords, true).unwrap();
        let cutouts = path.cutouts.as_ref().unwrap();
        assert_eq!(cutouts.len(), 2);
        assert!(cutouts[0].left);
        assert!(!cutouts[1].any());
    }
}
