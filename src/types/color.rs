//! Spot colors of the map palette

use std::fmt;

/// Identifier of a palette color as stored in OCAD files.
///
/// Identifiers are unique within a document but not necessarily contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ColorId(pub i16);

impl ColorId {
    pub const fn value(self) -> i16 {
        self.0
    }
}

impl From<i16> for ColorId {
    fn from(v: i16) -> Self {
        ColorId(v)
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CMYK components, each normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cmyk {
    pub cyan: f32,
    pub magenta: f32,
    pub yellow: f32,
    pub black: f32,
}

impl Cmyk {
    pub const fn new(cyan: f32, magenta: f32, yellow: f32, black: f32) -> Self {
        Cmyk {
            cyan,
            magenta,
            yellow,
            black,
        }
    }

    pub const BLACK: Cmyk = Cmyk::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Cmyk = Cmyk::new(0.0, 0.0, 0.0, 0.0);

    /// Clamp each channel into `[0, 1]`.
    pub fn clamped(self) -> Cmyk {
        Cmyk::new(
            self.cyan.clamp(0.0, 1.0),
            self.magenta.clamp(0.0, 1.0),
            self.yellow.clamp(0.0, 1.0),
            self.black.clamp(0.0, 1.0),
        )
    }

    /// Components scaled to integers (`200` for the v6–8 color table, `100`
    /// for string parameters, `255` for inline object colors).
    pub fn scaled(self, full: f32) -> [i32; 4] {
        let c = self.clamped();
        [
            (c.cyan * full).round() as i32,
            (c.magenta * full).round() as i32,
            (c.yellow * full).round() as i32,
            (c.black * full).round() as i32,
        ]
    }

    pub fn from_scaled(values: [i32; 4], full: f32) -> Cmyk {
        Cmyk::new(
            values[0] as f32 / full,
            values[1] as f32 / full,
            values[2] as f32 / full,
            values[3] as f32 / full,
        )
        .clamped()
    }
}

/// A named spot color of the palette.
///
/// Palette order matters: later colors paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    pub cmyk: Cmyk,
    /// Overprint flag (v9+ string parameter `o`).
    pub overprint: bool,
}

impl Color {
    pub fn new(id: impl Into<ColorId>, name: impl Into<String>, cmyk: Cmyk) -> Self {
        Color {
            id: id.into(),
            name: name.into(),
            cmyk,
            overprint: false,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' C{:.0} M{:.0} Y{:.0} K{:.0}",
            self.id,
            self.name,
            self.cmyk.cyan * 100.0,
            self.cmyk.magenta * 100.0,
            self.cmyk.yellow * 100.0,
            self.cmyk.black * 100.0
        )
    }
}
