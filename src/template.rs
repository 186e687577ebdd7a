//! Background template reference

use crate::types::Vector2;

/// A background image positioned under the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Path as resolved when the file was read.
    pub path: String,
    /// Map position of the image center, in mm.
    pub center: Vector2,
    /// Nominal resolution.
    pub dpi: f64,
    /// Rotation in degrees.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Angle of the image Y axis. Equal to `angle` when not sheared.
    pub shear_angle: f64,
    pub visible: bool,
}

impl Template {
    pub fn new(path: impl Into<String>, center: Vector2, dpi: f64) -> Self {
        Template {
            path: path.into(),
            center,
            dpi,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            shear_angle: 0.0,
            visible: true,
        }
    }

    /// Size of one image pixel on the map, in mm.
    pub fn mm_per_pixel(&self) -> f64 {
        if self.dpi > 0.0 {
            25.4 / self.dpi
        } else {
            0.0
        }
    }
}
