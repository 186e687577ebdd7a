//! Symbol definition records.
//!
//! Every record starts with the common [`SymbolBase`] (whose layout differs
//! between v6–v8 and v9+) followed by kind-specific extra fields selected by
//! `Otp` (and `SymTp` for v6–v8 line text).

use super::super::constants::{symbol_otp, MAX_SYMBOL_COLORS, MAX_TABS};
use super::super::icon;
use super::super::stream::{OcadStreamReader, OcadStreamWriter};
use super::element::{data_size, read_elements, write_elements, Element};
use crate::error::{OcadError, Result};
use crate::types::FormatVersion;

// ------------------------------------------------------------------
// Common part
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolBase {
    pub size: i32,
    pub number: i32,
    pub otp: u8,
    /// v6–v8: `1` marks a line text symbol stored with `Otp` 2.
    pub sym_tp: u8,
    pub flags: u8,
    pub extent: i32,
    pub selected: u8,
    pub status: u8,
    pub tool: i16,
    pub frame_width: i16,
    pub cs_mode: u8,
    pub cs_obj_type: u8,
    pub cs_cd_flags: u8,
    pub file_pos: i32,
    pub group: i16,
    /// v6–v8 bitmap of used color numbers 0..=255.
    pub color_set: [u8; 32],
    /// v9+ explicit list of used colors.
    pub colors_used: Vec<i16>,
    pub description: String,
    pub icon: Vec<u8>,
}

impl SymbolBase {
    pub fn new(number: i32, otp: u8, version: FormatVersion) -> Self {
        SymbolBase {
            size: 0,
            number,
            otp,
            sym_tp: 0,
            flags: 0,
            extent: 0,
            selected: 0,
            status: 0,
            tool: 0,
            frame_width: 0,
            cs_mode: 0,
            cs_obj_type: 0,
            cs_cd_flags: 0,
            file_pos: 0,
            group: 0,
            color_set: [0; 32],
            colors_used: Vec::new(),
            description: String::new(),
            icon: icon::blank_icon(version.icon_encoding()),
        }
    }

    /// Record the colors used by the symbol.
    pub fn set_used_colors(&mut self, colors: &[i16]) {
        self.color_set = [0; 32];
        for c in colors {
            if (0..256).contains(c) {
                self.color_set[*c as usize / 8] |= 1 << (*c as usize % 8);
            }
        }
        self.colors_used = colors.iter().copied().take(MAX_SYMBOL_COLORS).collect();
    }

    fn read(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<Self> {
        let mut base = SymbolBase::new(0, 0, version);
        if version.is_legacy() {
            base.size = r.read_i16()? as i32;
            base.number = r.read_i16()? as i32;
            base.otp = r.read_i16()? as u8;
            base.sym_tp = r.read_u8()?;
            base.flags = r.read_u8()?;
            base.extent = r.read_i16()? as i32;
            base.selected = r.read_u8()?;
            base.status = r.read_u8()?;
            base.tool = r.read_i16()?;
            base.frame_width = r.read_i16()?;
            base.file_pos = r.read_i32()?;
            base.color_set.copy_from_slice(&r.read_bytes(32)?);
        } else {
            base.size = r.read_i32()?;
            base.number = r.read_i32()?;
            base.otp = r.read_u8()?;
            base.flags = r.read_u8()?;
            base.selected = r.read_u8()?;
            base.status = r.read_u8()?;
            base.tool = r.read_u8()? as i16;
            base.cs_mode = r.read_u8()?;
            base.cs_obj_type = r.read_u8()?;
            base.cs_cd_flags = r.read_u8()?;
            base.extent = r.read_i32()?;
            base.file_pos = r.read_i32()?;
            base.group = r.read_i16()?;
            let n_colors = r.read_i16()?.clamp(0, MAX_SYMBOL_COLORS as i16) as usize;
            let mut used = Vec::with_capacity(n_colors);
            for i in 0..MAX_SYMBOL_COLORS {
                let c = r.read_i16()?;
                if i < n_colors {
                    used.push(c);
                }
            }
            base.colors_used = used;
        }
        base.description = r.read_delphi_string(31)?;
        base.icon = r.read_bytes(icon::stored_size(version.icon_encoding()))?;
        Ok(base)
    }

    fn write(&self, w: &mut OcadStreamWriter, version: FormatVersion) -> Result<()> {
        let file_pos = w.position() as i32;
        if version.is_legacy() {
            w.write_i16(0)?;
            w.write_i16(self.number as i16)?;
            w.write_i16(self.otp as i16)?;
            w.write_u8(self.sym_tp)?;
            w.write_u8(self.flags)?;
            w.write_i16(self.extent as i16)?;
            w.write_u8(self.selected)?;
            w.write_u8(self.status)?;
            w.write_i16(self.tool)?;
            w.write_i16(self.frame_width)?;
            w.write_i32(file_pos)?;
            w.write_bytes(&self.color_set)?;
        } else {
            w.write_i32(0)?;
            w.write_i32(self.number)?;
            w.write_u8(self.otp)?;
            w.write_u8(self.flags)?;
            w.write_u8(self.selected)?;
            w.write_u8(self.status)?;
            w.write_u8(self.tool as u8)?;
            w.write_u8(self.cs_mode)?;
            w.write_u8(self.cs_obj_type)?;
            w.write_u8(self.cs_cd_flags)?;
            w.write_i32(self.extent)?;
            w.write_i32(file_pos)?;
            w.write_i16(self.group)?;
            let n = self.colors_used.len().min(MAX_SYMBOL_COLORS);
            w.write_i16(n as i16)?;
            for i in 0..MAX_SYMBOL_COLORS {
                w.write_i16(if i < n { self.colors_used[i] } else { 0 })?;
            }
        }
        w.write_delphi_string(Some(&self.description), 31)?;
        let size = icon::stored_size(version.icon_encoding());
        let mut bits = self.icon.clone();
        bits.resize(size, 0);
        w.write_bytes(&bits)
    }
}

// ------------------------------------------------------------------
// Kind-specific parts
// ------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointExtra {
    pub reserved: i16,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineExtra {
    pub line_color: i16,
    pub line_width: i16,
    pub line_ends: u16,
    pub dist_from_start: i16,
    pub dist_to_end: i16,
    pub main_length: i16,
    pub end_length: i16,
    pub main_gap: i16,
    pub sec_gap: i16,
    pub end_gap: i16,
    pub min_sym: i16,
    pub n_prim_sym: i16,
    pub prim_sym_dist: i16,
    pub dbl_mode: u16,
    pub dbl_flags: u16,
    pub dbl_fill_color: i16,
    pub dbl_left_color: i16,
    pub dbl_right_color: i16,
    pub dbl_width: i16,
    pub dbl_left_width: i16,
    pub dbl_right_width: i16,
    pub dbl_length: i16,
    pub dbl_gap: i16,
    pub dbl_reserved: [i16; 3],
    pub dec_mode: u16,
    pub dec_last: i16,
    /// v12 flag: decrease the distance between glyphs.
    pub dec_symbol_distance: u8,
    /// v12 flag: decrease the glyph size.
    pub dec_symbol_width: u8,
    pub fr_color: i16,
    pub fr_width: i16,
    pub fr_style: i16,
    /// v11+ `UseSymbolFlags`.
    pub use_symbol_flags: u8,
    pub reserved: u8,
    pub primary: Vec<Element>,
    pub secondary: Vec<Element>,
    pub corner: Vec<Element>,
    pub start: Vec<Element>,
    pub end: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFont {
    pub mode: u8,
    pub flags: u8,
    pub name: String,
    pub color: i16,
    pub size: i16,
    pub weight: i16,
    pub italic: u16,
    pub offset_x: i16,
    pub offset_y: i16,
}

impl Default for FrameFont {
    fn default() -> Self {
        FrameFont {
            mode: 0,
            flags: 0,
            name: String::new(),
            color: 0,
            size: 0,
            weight: 400,
            italic: 0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    pub name: String,
    pub color: i16,
    /// Tenths of a point.
    pub size: i16,
    pub weight: i16,
    pub italic: u8,
    pub char_set: u8,
    pub char_space: i16,
    pub word_space: i16,
    pub alignment: i16,
}

impl Default for FontInfo {
    fn default() -> Self {
        FontInfo {
            name: String::new(),
            color: 0,
            size: 0,
            weight: 400,
            italic: 0,
            char_set: 0,
            char_space: 0,
            word_space: 100,
            alignment: 0,
        }
    }
}

impl FontInfo {
    fn read(r: &mut OcadStreamReader<'_>) -> Result<Self> {
        Ok(FontInfo {
            name: r.read_delphi_string(31)?,
            color: r.read_i16()?,
            size: r.read_i16()?,
            weight: r.read_i16()?,
            italic: r.read_u8()?,
            char_set: r.read_u8()?,
            char_space: r.read_i16()?,
            word_space: r.read_i16()?,
            alignment: r.read_i16()?,
        })
    }

    fn write(&self, w: &mut OcadStreamWriter) -> Result<()> {
        w.write_delphi_string(Some(&self.name), 31)?;
        w.write_i16(self.color)?;
        w.write_i16(self.size)?;
        w.write_i16(self.weight)?;
        w.write_u8(self.italic)?;
        w.write_u8(self.char_set)?;
        w.write_i16(self.char_space)?;
        w.write_i16(self.word_space)?;
        w.write_i16(self.alignment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTextExtra {
    pub font: FontInfo,
    pub frame: FrameFont,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaExtra {
    /// v9+ line symbol drawn along the outline.
    pub border_symbol: i32,
    pub area_flags: u16,
    pub fill_on: bool,
    pub border_on: bool,
    pub fill_color: i16,
    pub hatch_mode: i16,
    pub hatch_color: i16,
    pub hatch_line_width: i16,
    pub hatch_dist: i16,
    pub hatch_angle1: i16,
    pub hatch_angle2: i16,
    pub hatch_reserved: i16,
    pub struct_mode: i16,
    /// v12 pattern fill mode.
    pub struct_draw: u8,
    pub struct_width: i16,
    pub struct_height: i16,
    pub struct_angle: i16,
    pub struct_irregular_var_x: u8,
    pub struct_irregular_var_y: u8,
    pub struct_irregular_min_dist: i16,
    pub struct_reserved: i16,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExtra {
    pub font: FontInfo,
    pub line_space: i16,
    pub para_space: i16,
    pub indent_first: i16,
    pub indent_other: i16,
    pub tabs: Vec<i32>,
    pub underline_on: u16,
    pub underline_color: i16,
    pub underline_width: i16,
    pub underline_dist: i16,
    pub reserved: i16,
    pub frame: FrameFont,
    pub frame_left: i16,
    pub frame_bottom: i16,
    pub frame_right: i16,
    pub frame_top: i16,
    /// v10+ center point symbol.
    pub point_symbol_on: u8,
    pub point_symbol: i32,
}

impl Default for TextExtra {
    fn default() -> Self {
        TextExtra {
            font: FontInfo::default(),
            line_space: 100,
            para_space: 0,
            indent_first: 0,
            indent_other: 0,
            tabs: Vec::new(),
            underline_on: 0,
            underline_color: 0,
            underline_width: 0,
            underline_dist: 0,
            reserved: 0,
            frame: FrameFont::default(),
            frame_left: 0,
            frame_bottom: 0,
            frame_right: 0,
            frame_top: 0,
            point_symbol_on: 0,
            point_symbol: 0,
        }
    }
}

/// Legacy rectangle symbol. Only read; rectangles are expanded on import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectangleExtra {
    pub line_color: i16,
    pub line_width: i16,
    pub radius: i16,
    pub grid_flags: u16,
    pub cell_width: i16,
    pub cell_height: i16,
    pub unnumbered_cells: i16,
    pub unnumbered_text: String,
    /// v10+ grid text size in tenths of a point.
    pub font_size: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolExtra {
    Point(PointExtra),
    Line(LineExtra),
    LineText(LineTextExtra),
    Area(AreaExtra),
    Text(TextExtra),
    Rectangle(RectangleExtra),
}

/// A complete symbol record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub base: SymbolBase,
    pub extra: SymbolExtra,
}

impl SymbolRecord {
    /// Read the record at the current position.
    pub fn read(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<Self> {
        let base = SymbolBase::read(r, version)?;
        let extra = match (base.otp, base.sym_tp) {
            (symbol_otp::POINT, _) => SymbolExtra::Point(read_point(r)?),
            (symbol_otp::LINE, 1) if version.is_legacy() => SymbolExtra::LineText(read_line_text(r)?),
            (symbol_otp::LINE, _) => SymbolExtra::Line(read_line(r, version)?),
            (symbol_otp::AREA, _) => SymbolExtra::Area(read_area(r, version)?),
            (symbol_otp::TEXT, _) => SymbolExtra::Text(read_text(r, version)?),
            (symbol_otp::RECTANGLE, _) | (symbol_otp::RECTANGLE_ALT, _) => {
                SymbolExtra::Rectangle(read_rectangle(r, version)?)
            }
            (symbol_otp::LINE_TEXT, _) => SymbolExtra::LineText(read_line_text(r)?),
            (otp, _) => {
                return Err(OcadError::MalformedStructure(format!(
                    "symbol {} has unknown type {}",
                    base.number, otp
                )))
            }
        };
        Ok(SymbolRecord { base, extra })
    }

    /// Write at the current position and patch `Size`. Returns the record
    /// start.
    pub fn write(&self, w: &mut OcadStreamWriter, version: FormatVersion) -> Result<u64> {
        let start = w.position();
        self.base.write(w, version)?;
        match &self.extra {
            SymbolExtra::Point(p) => write_point(w, p)?,
            SymbolExtra::Line(l) => write_line(w, l, version)?,
            SymbolExtra::LineText(t) => write_line_text(w, t)?,
            SymbolExtra::Area(a) => write_area(w, a, version)?,
            SymbolExtra::Text(t) => write_text(w, t, version)?,
            SymbolExtra::Rectangle(_) => {
                return Err(OcadError::Custom(
                    "rectangle symbols are expanded on read and never written".to_string(),
                ))
            }
        }
        let size = w.position() - start;
        if version.is_legacy() {
            w.patch_u16(start, size as u16)?;
        } else {
            w.patch_i32(start, size as i32)?;
        }
        Ok(start)
    }
}

fn read_point(r: &mut OcadStreamReader<'_>) -> Result<PointExtra> {
    let size = r.read_i16()?;
    let reserved = r.read_i16()?;
    Ok(PointExtra {
        reserved,
        elements: read_elements(r, size)?,
    })
}

fn write_point(w: &mut OcadStreamWriter, p: &PointExtra) -> Result<()> {
    w.write_i16(data_size(&p.elements)?)?;
    w.write_i16(p.reserved)?;
    write_elements(w, &p.elements)
}

fn read_line(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<LineExtra> {
    let mut l = LineExtra {
        line_color: r.read_i16()?,
        line_width: r.read_i16()?,
        line_ends: r.read_u16()?,
        dist_from_start: r.read_i16()?,
        dist_to_end: r.read_i16()?,
        main_length: r.read_i16()?,
        end_length: r.read_i16()?,
        main_gap: r.read_i16()?,
        sec_gap: r.read_i16()?,
        end_gap: r.read_i16()?,
        min_sym: r.read_i16()?,
        n_prim_sym: r.read_i16()?,
        prim_sym_dist: r.read_i16()?,
        dbl_mode: r.read_u16()?,
        dbl_flags: r.read_u16()?,
        dbl_fill_color: r.read_i16()?,
        dbl_left_color: r.read_i16()?,
        dbl_right_color: r.read_i16()?,
        dbl_width: r.read_i16()?,
        dbl_left_width: r.read_i16()?,
        dbl_right_width: r.read_i16()?,
        dbl_length: r.read_i16()?,
        dbl_gap: r.read_i16()?,
        dbl_reserved: [r.read_i16()?, r.read_i16()?, r.read_i16()?],
        dec_mode: r.read_u16()?,
        dec_last: r.read_i16()?,
        dec_symbol_distance: r.read_u8()?,
        dec_symbol_width: r.read_u8()?,
        fr_color: r.read_i16()?,
        fr_width: r.read_i16()?,
        fr_style: r.read_i16()?,
        ..Default::default()
    };
    let sizes = [r.read_i16()?, r.read_i16()?, r.read_i16()?, r.read_i16()?, r.read_i16()?];
    l.use_symbol_flags = r.read_u8()?;
    l.reserved = r.read_u8()?;
    if !version.has_line_symbol_flags() {
        // The flag byte is reserved before v11.
        l.use_symbol_flags = 0;
    }
    if !version.has_v12_symbol_extras() {
        l.dec_symbol_distance = 0;
        l.dec_symbol_width = 0;
    }
    l.primary = read_elements(r, sizes[0])?;
    l.secondary = read_elements(r, sizes[1])?;
    l.corner = read_elements(r, sizes[2])?;
    l.start = read_elements(r, sizes[3])?;
    l.end = read_elements(r, sizes[4])?;
    Ok(l)
}

fn write_line(w: &mut OcadStreamWriter, l: &LineExtra, version: FormatVersion) -> Result<()> {
    for v in [
        l.line_color,
        l.line_width,
        l.line_ends as i16,
        l.dist_from_start,
        l.dist_to_end,
        l.main_length,
        l.end_length,
        l.main_gap,
        l.sec_gap,
        l.end_gap,
        l.min_sym,
        l.n_prim_sym,
        l.prim_sym_dist,
        l.dbl_mode as i16,
        l.dbl_flags as i16,
        l.dbl_fill_color,
        l.dbl_left_color,
        l.dbl_right_color,
        l.dbl_width,
        l.dbl_left_width,
        l.dbl_right_width,
        l.dbl_length,
        l.dbl_gap,
        l.dbl_reserved[0],
        l.dbl_reserved[1],
        l.dbl_reserved[2],
        l.dec_mode as i16,
        l.dec_last,
    ] {
        w.write_i16(v)?;
    }
    if version.has_v12_symbol_extras() {
        w.write_u8(l.dec_symbol_distance)?;
        w.write_u8(l.dec_symbol_width)?;
    } else {
        w.write_i16(0)?;
    }
    w.write_i16(l.fr_color)?;
    w.write_i16(l.fr_width)?;
    w.write_i16(l.fr_style)?;
    for list in [&l.primary, &l.secondary, &l.corner, &l.start, &l.end] {
        w.write_i16(data_size(list)?)?;
    }
    if version.has_line_symbol_flags() {
        w.write_u8(l.use_symbol_flags)?;
        w.write_u8(l.reserved)?;
    } else {
        w.write_i16(0)?;
    }
    for list in [&l.primary, &l.secondary, &l.corner, &l.start, &l.end] {
        write_elements(w, list)?;
    }
    Ok(())
}

fn read_frame_font(r: &mut OcadStreamReader<'_>, mode: u8, flags: u8, name: String) -> Result<FrameFont> {
    Ok(FrameFont {
        mode,
        flags,
        name,
        color: r.read_i16()?,
        size: r.read_i16()?,
        weight: r.read_i16()?,
        italic: r.read_u16()?,
        offset_x: r.read_i16()?,
        offset_y: r.read_i16()?,
    })
}

fn write_frame_tail(w: &mut OcadStreamWriter, f: &FrameFont) -> Result<()> {
    w.write_i16(f.color)?;
    w.write_i16(f.size)?;
    w.write_i16(f.weight)?;
    w.write_u16(f.italic)?;
    w.write_i16(f.offset_x)?;
    w.write_i16(f.offset_y)
}

fn read_line_text(r: &mut OcadStreamReader<'_>) -> Result<LineTextExtra> {
    let font = FontInfo::read(r)?;
    let mode = r.read_u8()?;
    let flags = r.read_u8()?;
    let name = r.read_delphi_string(31)?;
    let frame = read_frame_font(r, mode, flags, name)?;
    Ok(LineTextExtra { font, frame })
}

fn write_line_text(w: &mut OcadStreamWriter, t: &LineTextExtra) -> Result<()> {
    t.font.write(w)?;
    w.write_u8(t.frame.mode)?;
    w.write_u8(t.frame.flags)?;
    w.write_delphi_string(Some(&t.frame.name), 31)?;
    write_frame_tail(w, &t.frame)
}

fn read_area(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<AreaExtra> {
    let mut a = AreaExtra::default();
    if version.is_legacy() {
        a.area_flags = r.read_u16()?;
        a.fill_on = r.read_u16()? != 0;
    } else {
        a.border_symbol = r.read_i32()?;
    }
    a.fill_color = r.read_i16()?;
    a.hatch_mode = r.read_i16()?;
    a.hatch_color = r.read_i16()?;
    a.hatch_line_width = r.read_i16()?;
    a.hatch_dist = r.read_i16()?;
    a.hatch_angle1 = r.read_i16()?;
    a.hatch_angle2 = r.read_i16()?;
    if version.is_legacy() {
        a.hatch_reserved = r.read_i16()?;
        a.struct_mode = r.read_i16()?;
    } else {
        a.fill_on = r.read_u8()? != 0;
        a.border_on = r.read_u8()? != 0;
        a.struct_mode = r.read_u8()? as i16;
        a.struct_draw = r.read_u8()?;
    }
    a.struct_width = r.read_i16()?;
    a.struct_height = r.read_i16()?;
    a.struct_angle = r.read_i16()?;
    if version.has_v12_symbol_extras() {
        a.struct_irregular_var_x = r.read_u8()?;
        a.struct_irregular_var_y = r.read_u8()?;
        a.struct_irregular_min_dist = r.read_i16()?;
    } else {
        a.struct_draw = 0;
    }
    a.struct_reserved = r.read_i16()?;
    let size = r.read_i16()?;
    a.elements = read_elements(r, size)?;
    Ok(a)
}

fn write_area(w: &mut OcadStreamWriter, a: &AreaExtra, version: FormatVersion) -> Result<()> {
    if version.is_legacy() {
        w.write_u16(a.area_flags)?;
        w.write_u16(a.fill_on as u16)?;
    } else {
        w.write_i32(a.border_symbol)?;
    }
    w.write_i16(a.fill_color)?;
    w.write_i16(a.hatch_mode)?;
    w.write_i16(a.hatch_color)?;
    w.write_i16(a.hatch_line_width)?;
    w.write_i16(a.hatch_dist)?;
    w.write_i16(a.hatch_angle1)?;
    w.write_i16(a.hatch_angle2)?;
    if version.is_legacy() {
        w.write_i16(a.hatch_reserved)?;
        w.write_i16(a.struct_mode)?;
    } else {
        w.write_u8(a.fill_on as u8)?;
        w.write_u8(a.border_on as u8)?;
        w.write_u8(a.struct_mode as u8)?;
        w.write_u8(if version.has_v12_symbol_extras() { a.struct_draw } else { 0 })?;
    }
    w.write_i16(a.struct_width)?;
    w.write_i16(a.struct_height)?;
    w.write_i16(a.struct_angle)?;
    if version.has_v12_symbol_extras() {
        w.write_u8(a.struct_irregular_var_x)?;
        w.write_u8(a.struct_irregular_var_y)?;
        w.write_i16(a.struct_irregular_min_dist)?;
    }
    w.write_i16(a.struct_reserved)?;
    w.write_i16(data_size(&a.elements)?)?;
    write_elements(w, &a.elements)
}

fn read_text(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<TextExtra> {
    let font = FontInfo::read(r)?;
    let line_space = r.read_i16()?;
    let para_space = r.read_i16()?;
    let indent_first = r.read_i16()?;
    let indent_other = r.read_i16()?;
    let n_tabs = r.read_i16()?.clamp(0, MAX_TABS as i16) as usize;
    let mut tabs = Vec::with_capacity(n_tabs);
    for i in 0..MAX_TABS {
        let tab = r.read_i32()?;
        if i < n_tabs {
            tabs.push(tab);
        }
    }
    let mut t = TextExtra {
        font,
        line_space,
        para_space,
        indent_first,
        indent_other,
        tabs,
        underline_on: r.read_u16()?,
        underline_color: r.read_i16()?,
        underline_width: r.read_i16()?,
        underline_dist: r.read_i16()?,
        reserved: r.read_i16()?,
        ..Default::default()
    };
    let mode = r.read_u8()?;
    let flags = r.read_u8()?;
    let name = if version.is_legacy() {
        r.read_delphi_string(31)?
    } else {
        let name = r.read_delphi_string(23)?;
        t.frame_left = r.read_i16()?;
        t.frame_bottom = r.read_i16()?;
        t.frame_right = r.read_i16()?;
        t.frame_top = r.read_i16()?;
        name
    };
    t.frame = read_frame_font(r, mode, flags, name)?;
    if version.has_text_point_symbol() {
        t.point_symbol_on = r.read_u8()?;
        t.point_symbol = r.read_i32()?;
    }
    Ok(t)
}

fn write_text(w: &mut OcadStreamWriter, t: &TextExtra, version: FormatVersion) -> Result<()> {
    t.font.write(w)?;
    w.write_i16(t.line_space)?;
    w.write_i16(t.para_space)?;
    w.write_i16(t.indent_first)?;
    w.write_i16(t.indent_other)?;
    let n = t.tabs.len().min(MAX_TABS);
    w.write_i16(n as i16)?;
    for i in 0..MAX_TABS {
        w.write_i32(if i < n { t.tabs[i] } else { 0 })?;
    }
    w.write_u16(t.underline_on)?;
    w.write_i16(t.underline_color)?;
    w.write_i16(t.underline_width)?;
    w.write_i16(t.underline_dist)?;
    w.write_i16(t.reserved)?;
    w.write_u8(t.frame.mode)?;
    w.write_u8(t.frame.flags)?;
    if version.is_legacy() {
        w.write_delphi_string(Some(&t.frame.name), 31)?;
    } else {
        w.write_delphi_string(Some(&t.frame.name), 23)?;
        w.write_i16(t.frame_left)?;
        w.write_i16(t.frame_bottom)?;
        w.write_i16(t.frame_right)?;
        w.write_i16(t.frame_top)?;
    }
    write_frame_tail(w, &t.frame)?;
    if version.has_text_point_symbol() {
        w.write_u8(t.point_symbol_on)?;
        w.write_i32(t.point_symbol)?;
    }
    Ok(())
}

fn read_rectangle(r: &mut OcadStreamReader<'_>, version: FormatVersion) -> Result<RectangleExtra> {
    let line_color = r.read_i16()?;
    let line_width = r.read_i16()?;
    let radius = r.read_i16()?;
    let grid_flags = r.read_u16()?;
    let cell_width = r.read_i16()?;
    let cell_height = r.read_i16()?;
    let _grid_line_color = r.read_i16()?;
    let _grid_line_width = r.read_i16()?;
    let unnumbered_cells = r.read_i16()?;
    let unnumbered_text = r.read_delphi_string(3)?;
    let _grid_reserved = r.read_i16()?;
    let _font_name = r.read_delphi_string(31)?;
    let _font_color = r.read_i16()?;
    let font_size = r.read_i16()?;
    Ok(RectangleExtra {
        line_color,
        line_width,
        radius,
        grid_flags,
        cell_width,
        cell_height,
        unnumbered_cells,
        unnumbered_text,
        font_size: if version.number() >= 10 { font_size } else { 0 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ocad::coord::OcadCoord;

    fn round_trip(record: &SymbolRecord, version: FormatVersion) -> SymbolRecord {
        let mut w = OcadStreamWriter::new();
        w.write_zeros(48).unwrap();
        let start = record.write(&mut w, version).unwrap();
        assert_eq!(start, 48);
        let bytes = w.into_inner();
        let mut r = OcadStreamReader::new(&bytes);
        r.seek(start).unwrap();
        let back = SymbolRecord::read(&mut r, version).unwrap();
        assert_eq!(r.position() as usize, bytes.len());
        assert_eq!(back.base.size as usize, bytes.len() - 48);
        assert_eq!(back.base.file_pos, 48);
        back
    }

    fn dot() -> Element {
        let mut e = Element::new(4, 2, vec![OcadCoord::raw(0, 0)]);
        e.diameter = 60;
        e
    }

    #[test]
    fn test_point_record_sizes() {
        for version in [FormatVersion::V8, FormatVersion::V9] {
            let mut base = SymbolBase::new(if version.is_legacy() { 1010 } else { 101000 }, 1, version);
            base.description = "Knoll".to_string();
            base.set_used_colors(&[2]);
            let record = SymbolRecord {
                base,
                extra: SymbolExtra::Point(PointExtra {
                    reserved: 0,
                    elements: vec![dot()],
                }),
            };
            let back = round_trip(&record, version);
            assert_eq!(back.base.description, "Knoll");
            assert_eq!(back.extra, record.extra);
            let expected_base = if version.is_legacy() { 348 } else { 572 };
            assert_eq!(back.base.size as usize, expected_base + 4 + 3 * 8);
        }
    }

    #[test]
    fn test_line_record_v12_extras() {
        let version = FormatVersion::V12;
        let extra = LineExtra {
            line_color: 1,
            line_width: 35,
            dec_mode: 1,
            dec_symbol_distance: 1,
            use_symbol_flags: 1 | 16,
            corner: vec![dot()],
            ..Default::default()
        };
        let record = SymbolRecord {
            base: SymbolBase::new(106000, 2, version),
            extra: SymbolExtra::Line(extra.clone()),
        };
        let back = round_trip(&record, version);
        assert_eq!(back.extra, SymbolExtra::Line(extra));
    }

    #[test]
    fn test_legacy_line_text_uses_sym_tp() {
        let version = FormatVersion::V7;
        let mut base = SymbolBase::new(2011, 2, version);
        base.sym_tp = 1;
        let record = SymbolRecord {
            base,
            extra: SymbolExtra::LineText(LineTextExtra::default()),
        };
        let back = round_trip(&record, version);
        assert!(matches!(back.extra, SymbolExtra::LineText(_)));
    }

    #[test]
    fn test_text_record_keeps_tabs_and_frame() {
        for version in [FormatVersion::V8, FormatVersion::V10] {
            let mut text = TextExtra::default();
            text.tabs = vec![500, 1000];
            text.frame.mode = 3;
            text.frame_left = 20;
            text.point_symbol_on = version.has_text_point_symbol() as u8;
            text.point_symbol = if version.has_text_point_symbol() { 101000 } else { 0 };
            if version.is_legacy() {
                text.frame_left = 0;
            }
            let record = SymbolRecord {
                base: SymbolBase::new(7, 4, version),
                extra: SymbolExtra::Text(text.clone()),
            };
            assert_eq!(round_trip(&record, version).extra, SymbolExtra::Text(text));
        }
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let version = FormatVersion::V9;
        let record = SymbolRecord {
            base: SymbolBase::new(1000, 9, version),
            extra: SymbolExtra::Point(PointExtra::default()),
        };
        let mut w = OcadStreamWriter::new();
        record.write(&mut w, version).unwrap();
        let bytes = w.into_inner();
        let err = SymbolRecord::read(&mut OcadStreamReader::new(&bytes), version).unwrap_err();
        assert!(matches!(err, OcadError::MalformedStructure(_)));
    }
}
