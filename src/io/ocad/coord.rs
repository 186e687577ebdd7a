//! Coordinate codec.
//!
//! Each axis is stored as an `i32` whose upper 24 bits hold the value in
//! hundredths of a millimeter and whose low byte holds per-point flags.

use super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::{OcadError, Result};
use crate::types::Vector2;

bitflags::bitflags! {
    /// Point flags. The low byte maps to the X word, the high byte to Y.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CoordFlags: u16 {
        /// First control point of a bezier run.
        const BEZIER_FIRST = 0x0001;
        /// Second control point of a bezier run.
        const BEZIER_SECOND = 0x0002;
        /// Left double line not drawn on the following segment.
        const NO_LEFT_LINE = 0x0004;
        /// Main line not drawn on the following segment.
        const MAIN_CUTOUT = 0x0008;
        const CORNER = 0x0100;
        /// First point of a hole (area paths only).
        const HOLE_START = 0x0200;
        /// Right double line not drawn on the following segment.
        const NO_RIGHT_LINE = 0x0400;
        const DASH = 0x0800;
    }
}

impl CoordFlags {
    pub fn is_bezier(self) -> bool {
        self.intersects(CoordFlags::BEZIER_FIRST | CoordFlags::BEZIER_SECOND)
    }

    pub fn any_cutout(self) -> bool {
        self.intersects(CoordFlags::NO_LEFT_LINE | CoordFlags::NO_RIGHT_LINE | CoordFlags::MAIN_CUTOUT)
    }

    fn x_bits(self) -> i32 {
        (self.bits() & 0x00FF) as i32
    }

    fn y_bits(self) -> i32 {
        ((self.bits() >> 8) & 0x00FF) as i32
    }
}

/// Largest magnitude of the 24-bit payload.
const MAX_PAYLOAD: i32 = (1 << 23) - 1;

/// A raw on-disk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OcadCoord {
    pub x: i32,
    pub y: i32,
}

impl OcadCoord {
    /// Pack a point given in millimeters.
    pub fn encode(point: Vector2, flags: CoordFlags) -> Result<OcadCoord> {
        let x = scale_axis(point.x)?;
        let y = scale_axis(point.y)?;
        Ok(OcadCoord {
            x: (x << 8) | flags.x_bits(),
            y: (y << 8) | flags.y_bits(),
        })
    }

    /// Unshifted words, as used by the circle-gap angle pairs of point objects.
    pub fn raw(x: i32, y: i32) -> OcadCoord {
        OcadCoord { x, y }
    }

    pub fn decode(self) -> (Vector2, CoordFlags) {
        (self.point(), self.flags())
    }

    pub fn point(self) -> Vector2 {
        Vector2::new(self.x_value() as f64 / 100.0, self.y_value() as f64 / 100.0)
    }

    /// X payload in hundredths of a millimeter.
    pub fn x_value(self) -> i32 {
        self.x >> 8
    }

    pub fn y_value(self) -> i32 {
        self.y >> 8
    }

    pub fn flags(self) -> CoordFlags {
        let bits = ((self.x & 0xFF) as u16) | (((self.y & 0xFF) as u16) << 8);
        CoordFlags::from_bits_truncate(bits)
    }

    pub fn with_flags(self, flags: CoordFlags) -> OcadCoord {
        OcadCoord {
            x: self.x | flags.x_bits(),
            y: self.y | flags.y_bits(),
        }
    }

    pub fn read(reader: &mut OcadStreamReader<'_>) -> Result<OcadCoord> {
        let x = reader.read_i32()?;
        let y = reader.read_i32()?;
        Ok(OcadCoord { x, y })
    }

    pub fn write(self, writer: &mut OcadStreamWriter) -> Result<()> {
        writer.write_i32(self.x)?;
        writer.write_i32(self.y)
    }
}

fn hundredths(mm: f64, limit: i32, what: &str) -> Result<i32> {
    let scaled = (mm * 100.0).round();
    if !scaled.is_finite() || scaled.abs() > limit as f64 {
        return Err(OcadError::NumericOverflow(format!(
            "{} {} mm outside the representable range",
            what, mm
        )));
    }
    Ok(scaled as i32)
}

fn scale_axis(mm: f64) -> Result<i32> {
    hundredths(mm, MAX_PAYLOAD, "coordinate")
}

/// Millimeters to hundredths, rounded.
pub fn to_ocad_dimension(mm: f64) -> Result<i32> {
    hundredths(mm, i32::MAX, "dimension")
}

/// Hundredths of a millimeter to millimeters.
pub fn from_ocad_dimension(value: i32) -> f64 {
    value as f64 / 100.0
}

/// Degrees to tenths of a degree, reduced modulo one turn.
pub fn to_ocad_angle(degrees: f64) -> i16 {
    let tenths = (degrees * 10.0).round() % 3600.0;
    if tenths.is_finite() {
        tenths as i16
    } else {
        0
    }
}

/// Tenths of a degree to degrees, reduced modulo one turn.
pub fn from_ocad_angle(tenths: i32) -> f64 {
    (tenths % 3600) as f64 * 0.1
}
