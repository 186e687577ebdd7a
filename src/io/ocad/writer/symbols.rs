//! Definitions to symbol records.

use super::paths::{area_coords, path_coords};
use super::WriteSession;
use crate::error::{OcadError, Result};
use crate::glyph::{Glyph, GlyphPart};
use crate::io::ocad::block_chain::BlockBuilder;
use crate::io::ocad::constants::{alignment, element_type, line_symbol_flags, symbol_otp, MAX_TABS};
use crate::io::ocad::coord::{to_ocad_angle, to_ocad_dimension, CoordFlags, OcadCoord};
use crate::io::ocad::icon;
use crate::io::ocad::records::symbol::{
    AreaExtra, FontInfo, FrameFont, LineExtra, LineTextExtra, PointExtra, TextExtra,
};
use crate::io::ocad::records::{Element, SymbolBase, SymbolExtra, SymbolRecord};
use crate::io::ocad::stream::OcadStreamWriter;
use crate::symbols::{
    AreaSymDef, Framing, GlyphInfo, GlyphLocation, HorizAlign, LineStyle, LineSymDef,
    PointSymDef, SymbolDefinition, TextKind, TextSymDef, VertAlign,
};
use crate::types::{FormatVersion, IconEncoding, SymbolId};

/// Millimeters to a 16-bit hundredths field.
pub(super) fn dim(mm: f64) -> Result<i16> {
    let value = to_ocad_dimension(mm)?;
    i16::try_from(value).map_err(|_| {
        OcadError::NumericOverflow(format!("dimension {} mm does not fit a 16-bit field", mm))
    })
}

/// Inverse of the reader's style bits: round 1, miter 4, bevel 0.
pub(super) fn line_style_code(style: LineStyle) -> i16 {
    match style {
        LineStyle::Rounded => 1,
        LineStyle::Mitered => 4,
        LineStyle::Beveled | LineStyle::FlatRounded => 0,
    }
}

fn mm_to_points(mm: f64) -> f64 {
    mm * 72.0 / 25.4
}

/// Stored alignment code. Vertical alignment only exists from v10 on.
fn alignment_code(horiz: HorizAlign, vert: VertAlign, version: FormatVersion) -> i16 {
    let base = match horiz {
        HorizAlign::Left => alignment::LEFT,
        HorizAlign::Center => alignment::CENTER,
        HorizAlign::Right => alignment::RIGHT,
        HorizAlign::Justified => return alignment::JUSTIFIED,
    };
    if !version.has_vertical_text_alignment() {
        return base;
    }
    match vert {
        VertAlign::TopAscent => base + alignment::TOP,
        VertAlign::Midpoint | VertAlign::MidpointAllLines => base + alignment::MIDPOINT,
        VertAlign::Baseline | VertAlign::BaselineLast | VertAlign::Bottom => base,
    }
}

fn last_at<'g>(glyphs: &'g [GlyphInfo], locations: &[GlyphLocation]) -> Option<&'g GlyphInfo> {
    glyphs.iter().rev().find(|g| locations.contains(&g.location))
}

fn write_position(pos: &i32, w: &mut OcadStreamWriter) -> Result<()> {
    w.write_i32(*pos)
}

impl<'a> WriteSession<'a> {
    /// Give every definition its stored number before anything refers to it.
    pub(super) fn assign_numbers(&mut self) -> Result<()> {
        let doc = self.doc;
        for def in doc.symbols() {
            let assigned = self.numbering.assign(def.id());
            if let Some((_, Some(loss))) = self.tolerate(assigned)? {
                self.notifications.notify_error(&loss);
            }
        }
        Ok(())
    }

    fn reference(&mut self, id: SymbolId, what: &str) -> Option<i32> {
        let number = self.numbering.number_of(id);
        if number.is_none() {
            self.notifications
                .notify_error(&OcadError::UnknownSymbolReference(format!(
                    "{} {} is not defined",
                    what, id
                )));
        }
        number
    }

    pub(super) fn write_symbols(&mut self) -> Result<i32> {
        let doc = self.doc;
        let mut builder = BlockBuilder::new(4);
        let mut count = 0usize;
        for def in doc.symbols() {
            let Some(number) = self.numbering.number_of(def.id()) else {
                continue;
            };
            let record = self.symbol_record(number, def);
            let Some(record) = self.tolerate(record)? else {
                continue;
            };
            let pos = record.write(&mut self.w, self.version)?;
            let pos = i32::try_from(pos).map_err(|_| {
                OcadError::NumericOverflow(format!("symbol record at {} exceeds 2 GiB", pos))
            })?;
            builder.push(&mut self.w, pos, write_position)?;
            count += 1;
        }
        let chain = builder.finish(&mut self.w, true, write_position)?;
        log::debug!("wrote {} symbol records in {} blocks", count, chain.block_count());
        Ok(chain.first())
    }

    fn symbol_record(&mut self, number: i32, def: &SymbolDefinition) -> Result<SymbolRecord> {
        let record = match def {
            SymbolDefinition::Point(p) => self.point_record(number, def, p)?,
            SymbolDefinition::Line(l) => self.line_record(number, def, l)?,
            SymbolDefinition::Area(a) => self.area_record(number, def, a)?,
            SymbolDefinition::Text(t) => match t.kind {
                TextKind::Normal => self.text_record(number, def, t)?,
                TextKind::LineText => self.line_text_record(number, def, t)?,
            },
        };
        Ok(record)
    }

    /// Fields every record shares: name, used colors, icon and visibility.
    fn base(&mut self, number: i32, otp: u8, def: &SymbolDefinition) -> Result<SymbolBase> {
        let v = self.version;
        let common = def.common();
        let mut base = SymbolBase::new(number, otp, v);
        base.description = common.name.clone();
        let colors: Vec<i16> = def.colors().iter().map(|c| c.0).collect();
        base.set_used_colors(&colors);
        if common.hidden {
            base.status |= 2;
        }

        if let Some(toolbox) = &common.icon {
            let encoding = v.icon_encoding();
            match icon::encode_icon(toolbox, encoding) {
                Ok(bytes) => {
                    base.icon = bytes;
                    if encoding == IconEncoding::Compressed8Bit {
                        base.flags |= 2;
                    }
                }
                Err(err @ OcadError::BufferCapacityExceeded { .. }) => {
                    // The 4-bit layout always fits the same slot.
                    self.notifications.notify_error(&err);
                    base.icon = icon::encode_icon(toolbox, IconEncoding::Packed4Bit)?;
                    base.flags &= !2;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(base)
    }

    // ------------------------------------------------------------------
    // Glyphs
    // ------------------------------------------------------------------

    fn elements(&self, glyph: &Glyph) -> Result<Vec<Element>> {
        let v = self.version;
        let mut out = Vec::with_capacity(glyph.parts().len());
        for part in glyph.parts() {
            let element = match part {
                GlyphPart::Line {
                    color,
                    width,
                    style,
                    path,
                } => {
                    let mut el = Element::new(element_type::LINE, color.0, path_coords(path, v)?);
                    el.flags = line_style_code(*style) as u16;
                    el.line_width = dim(*width)?;
                    el
                }
                GlyphPart::Area { color, path } => {
                    Element::new(element_type::AREA, color.0, area_coords(path, v)?)
                }
                GlyphPart::Circle {
                    color,
                    center,
                    width,
                    diameter,
                } => {
                    let center = vec![OcadCoord::encode(*center, CoordFlags::empty())?];
                    let mut el = Element::new(element_type::CIRCLE, color.0, center);
                    el.line_width = dim(*width)?;
                    el.diameter = if v.circle_diameter_from_center() {
                        dim(diameter - width)?
                    } else {
                        dim(*diameter)?
                    };
                    el
                }
                GlyphPart::FilledCircle {
                    color,
                    center,
                    diameter,
                } => {
                    let center = vec![OcadCoord::encode(*center, CoordFlags::empty())?];
                    let mut el = Element::new(element_type::FILLED_CIRCLE, color.0, center);
                    el.diameter = dim(*diameter)?;
                    el
                }
            };
            out.push(element);
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Points
    // ------------------------------------------------------------------

    fn point_record(
        &mut self,
        number: i32,
        def: &SymbolDefinition,
        p: &PointSymDef,
    ) -> Result<SymbolRecord> {
        let mut base = self.base(number, symbol_otp::POINT, def)?;
        base.extent = to_ocad_dimension(p.glyph.radius())?;
        if p.rotatable {
            base.flags |= 1;
        }
        let extra = PointExtra {
            reserved: 0,
            elements: self.elements(&p.glyph)?,
        };
        Ok(SymbolRecord {
            base,
            extra: SymbolExtra::Point(extra),
        })
    }

    // ------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------

    fn line_record(
        &mut self,
        number: i32,
        def: &SymbolDefinition,
        line: &LineSymDef,
    ) -> Result<SymbolRecord> {
        let v = self.version;
        let mut base = self.base(number, symbol_otp::LINE, def)?;
        base.extent = to_ocad_dimension(line.max_thickness() / 2.0)?;

        // One glyph per stored slot; a later glyph at the same slot wins.
        let glyphs = &line.glyphs;
        let corner = last_at(glyphs, &[GlyphLocation::Corners, GlyphLocation::CornersIgnoreEnds]);
        let dash = last_at(glyphs, &[GlyphLocation::DashCenters]);
        let end = last_at(glyphs, &[GlyphLocation::End]);
        let gap = last_at(glyphs, &[GlyphLocation::GapCenters]);
        let spaced = last_at(glyphs, &[GlyphLocation::Spaced, GlyphLocation::SpacedDecrease]);
        let offset = last_at(glyphs, &[GlyphLocation::SpacedOffset]);
        let start = last_at(glyphs, &[GlyphLocation::Start]);

        let mut l = LineExtra::default();
        if let Some(color) = line.color {
            l.line_color = color.0;
            l.line_width = dim(line.width)?;
        }
        l.line_ends = line_style_code(line.style) as u16;

        let dashed = line.is_dashed();
        if let Some(dashes) = line.dashes.filter(|_| dashed) {
            l.main_length = dim(dashes.dash_length)?;
            l.end_length = dim(dashes.first_dash_length)?;
            l.main_gap = dim(dashes.gap_length)?;
            l.min_sym = (dashes.min_gaps - 1).clamp(0, i16::MAX as i32) as i16;
            if dashes.secondary_middle_gaps > 0 {
                l.sec_gap = dim(dashes.secondary_middle_length)?;
            }
            if dashes.secondary_end_gaps > 0 {
                l.end_gap = dim(dashes.secondary_end_length)?;
            }
        }

        let mut primary = gap;
        let spaced_fields = |l: &mut LineExtra, info: &GlyphInfo| -> Result<()> {
            l.main_length = dim(info.distance)?;
            l.end_length = dim(info.first_distance)?;
            l.min_sym = (info.minimum - 1).clamp(0, i16::MAX as i32) as i16;
            Ok(())
        };
        match (spaced, offset) {
            (Some(info), _) if info.location == GlyphLocation::SpacedDecrease => {
                spaced_fields(&mut l, info)?;
                l.dec_mode = if info.decrease_both_ends { 2 } else { 1 };
                l.dec_last = (info.decrease_limit * 100.0).round() as i16;
                if v.has_v12_symbol_extras() {
                    l.dec_symbol_distance = 1;
                    l.dec_symbol_width = 0;
                }
                primary = Some(info);
            }
            (Some(info), _) if !dashed || line.width == 0.0 => {
                spaced_fields(&mut l, info)?;
                l.main_gap = 0;
                l.sec_gap = 0;
                primary = Some(info);
            }
            (_, Some(info)) if !dashed || line.width == 0.0 => {
                spaced_fields(&mut l, info)?;
                l.main_gap = 0;
                l.sec_gap = 0;
            }
            _ => {
                let secondary_gaps = line
                    .dashes
                    .map(|d| d.secondary_middle_gaps > 0 || d.secondary_end_gaps > 0)
                    .unwrap_or(false);
                if let (Some(info), None) = (dash, gap) {
                    if dashed && !secondary_gaps {
                        // Dash centers are stored as gap centers of a pattern
                        // whose gaps never show.
                        l.min_sym = l.min_sym.saturating_add(1);
                        l.main_length = l.main_length.saturating_add(l.main_gap);
                        l.sec_gap = l.main_gap;
                        l.main_gap = 0;
                        l.end_length = (l.main_length.saturating_add(1)) / 2;
                        primary = Some(info);
                    }
                }
            }
        }

        if let Some(second) = &line.second_line {
            l.fr_color = second.color.0;
            l.fr_width = dim(second.width)?;
            l.fr_style = line_style_code(second.style);
        }

        if let Some(dbl) = &line.double_line {
            l.dbl_mode = 1;
            l.dbl_width = dim(dbl.width)?;
            if let Some(fill) = dbl.fill_color {
                l.dbl_flags |= 1;
                l.dbl_fill_color = fill.0;
            }
            if let Some(left) = dbl.left_color {
                l.dbl_left_color = left.0;
                l.dbl_left_width = dim(dbl.left_width)?;
            }
            if let Some(right) = dbl.right_color {
                l.dbl_right_color = right.0;
                l.dbl_right_width = dim(dbl.right_width)?;
            }
            if dbl.left_dashed || dbl.right_dashed || dbl.fill_dashed {
                l.dbl_length = dim(dbl.dashes.dash_length)?;
                l.dbl_gap = dim(dbl.dashes.gap_length)?;
                l.dbl_mode = if dbl.fill_dashed {
                    4
                } else if dbl.right_dashed {
                    3
                } else {
                    2
                };
            }
        }

        if let Some(shortening) = &line.shortening {
            l.dist_from_start = dim(shortening.start)?;
            l.dist_to_end = dim(shortening.end)?;
            if shortening.pointy_ends {
                l.line_ends |= 2;
            }
        }

        if let Some(info) = primary {
            l.n_prim_sym = info.number.clamp(0, i16::MAX as i32) as i16;
            l.prim_sym_dist = dim(info.spacing)?;
            l.primary = self.elements(&info.glyph)?;
        }
        if let Some(info) = offset {
            l.secondary = self.elements(&info.glyph)?;
        }
        if let Some(info) = start {
            l.start = self.elements(&info.glyph)?;
        }
        if let Some(info) = end {
            l.end = self.elements(&info.glyph)?;
        }
        if let Some(info) = corner {
            l.corner = self.elements(&info.glyph)?;
        }

        if v.has_line_symbol_flags() {
            let slots = [
                (&l.primary, line_symbol_flags::BASE),
                (&l.secondary, line_symbol_flags::SECONDARY),
                (&l.start, line_symbol_flags::START),
                (&l.end, line_symbol_flags::END),
                (&l.corner, line_symbol_flags::CORNER),
            ];
            l.use_symbol_flags = slots
                .iter()
                .filter(|(elements, _)| !elements.is_empty())
                .fold(0, |flags, (_, bit)| flags | bit);
        }

        Ok(SymbolRecord {
            base,
            extra: SymbolExtra::Line(l),
        })
    }

    // ------------------------------------------------------------------
    // Areas
    // ------------------------------------------------------------------

    fn area_record(
        &mut self,
        number: i32,
        def: &SymbolDefinition,
        area: &AreaSymDef,
    ) -> Result<SymbolRecord> {
        let v = self.version;
        let mut base = self.base(number, symbol_otp::AREA, def)?;
        if area.rotatable {
            base.flags |= 1;
        }

        let mut a = AreaExtra::default();
        if let Some(fill) = area.fill_color {
            a.fill_on = true;
            a.fill_color = fill.0;
        }
        if let Some(border) = area.border {
            if v.has_area_border() {
                if let Some(number) = self.reference(border, "area border symbol") {
                    a.border_on = true;
                    a.border_symbol = number;
                }
            }
        }

        if let Some(first) = area.hatches.first() {
            a.hatch_mode = 1;
            a.hatch_color = first.color.0;
            a.hatch_line_width = dim(first.width)?;
            a.hatch_dist = if v.hatch_distance_is_pitch() {
                dim(first.spacing)?
            } else {
                dim(first.spacing - first.width)?
            };
            a.hatch_angle1 = to_ocad_angle(first.angle);
            if let Some(second) = area.hatches.get(1) {
                if second.color == first.color
                    && second.width == first.width
                    && second.spacing == first.spacing
                {
                    a.hatch_mode = 2;
                    a.hatch_angle2 = to_ocad_angle(second.angle);
                } else {
                    self.not_supported(format!(
                        "area symbol {}: cross hatch with differing lines",
                        area.common.id
                    ));
                }
            }
            if area.hatches.len() > 2 {
                self.not_supported(format!(
                    "area symbol {}: more than two hatch directions",
                    area.common.id
                ));
            }
        }

        if let Some(pattern) = &area.pattern {
            a.struct_mode = if pattern.offset_rows { 2 } else { 1 };
            a.struct_width = dim(pattern.width)?;
            a.struct_height = dim(pattern.height)?;
            a.struct_angle = to_ocad_angle(pattern.angle);
            a.elements = self.elements(&pattern.glyph)?;
            if v.has_v12_symbol_extras() {
                a.struct_draw = pattern.fill_mode.code();
                if let Some(irregular) = &pattern.irregular {
                    a.struct_irregular_var_x = (irregular.var_x * 100.0).round().clamp(0.0, 255.0) as u8;
                    a.struct_irregular_var_y = (irregular.var_y * 100.0).round().clamp(0.0, 255.0) as u8;
                    a.struct_irregular_min_dist = dim(irregular.min_distance)?;
                }
            }
        }

        Ok(SymbolRecord {
            base,
            extra: SymbolExtra::Area(a),
        })
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn font(&self, t: &TextSymDef) -> FontInfo {
        FontInfo {
            name: t.font_name.clone(),
            color: t.color.0,
            size: (mm_to_points(t.font_size) * 10.0).round() as i16,
            weight: if t.bold { 700 } else { 400 },
            italic: t.italic as u8,
            char_set: 0,
            char_space: (t.char_spacing * 100.0).round() as i16,
            word_space: (t.word_spacing * 100.0).round() as i16,
            alignment: alignment_code(t.horiz_align, t.vert_align, self.version),
        }
    }

    /// Framing fields: the frame record, the v7 width kept in the common
    /// part, and the rectangle insets (left, top, right, bottom).
    fn framing(&mut self, t: &TextSymDef, with_rect: bool) -> Result<(FrameFont, i16, [i16; 4])> {
        let v = self.version;
        let mut frame = FrameFont::default();
        let mut legacy_width = 0;
        let mut rect = [0i16; 4];
        match t.framing {
            Framing::None => {}
            Framing::Line {
                color,
                width,
                style,
            } if v >= FormatVersion::V7 => {
                frame.mode = 2;
                frame.color = color.0;
                if v == FormatVersion::V7 {
                    legacy_width = dim(width)?;
                } else {
                    frame.size = dim(width)?;
                }
                frame.flags = match style {
                    LineStyle::Rounded => 1,
                    LineStyle::Beveled => 2,
                    LineStyle::Mitered | LineStyle::FlatRounded => 3,
                };
            }
            Framing::Shadow { color, dx, dy } if v >= FormatVersion::V9 || v <= FormatVersion::V7 => {
                frame.mode = 1;
                frame.color = color.0;
                frame.offset_x = dim(dx)?;
                frame.offset_y = dim(dy)?;
                if v <= FormatVersion::V7 {
                    frame.name = t.font_name.clone();
                    frame.italic = t.italic as u16;
                    frame.weight = if t.bold { 700 } else { 400 };
                    frame.size = (mm_to_points(t.font_size) * 10.0).round() as i16;
                }
            }
            Framing::Rectangle {
                color,
                left,
                top,
                right,
                bottom,
            } if with_rect && v >= FormatVersion::V9 => {
                frame.mode = 3;
                frame.color = color.0;
                rect = [dim(left)?, dim(top)?, dim(right)?, dim(bottom)?];
            }
            _ => self.not_supported(format!(
                "text symbol {}: framing not stored by OCAD {}",
                t.common.id, v
            )),
        }
        Ok((frame, legacy_width, rect))
    }

    fn text_record(
        &mut self,
        number: i32,
        def: &SymbolDefinition,
        t: &TextSymDef,
    ) -> Result<SymbolRecord> {
        let v = self.version;
        let mut base = self.base(number, symbol_otp::TEXT, def)?;
        base.sym_tp = 1;

        let mut x = TextExtra {
            font: self.font(t),
            ..Default::default()
        };
        x.line_space = if t.font_size > 0.0 {
            (t.line_spacing * 100.0 / t.font_size).round() as i16
        } else {
            100
        };
        let mut paragraph = t.paragraph_spacing;
        if let Some(underline) = &t.underline {
            paragraph -= underline.distance + underline.width;
            x.underline_on = 1;
            x.underline_color = underline.color.0;
            x.underline_width = dim(underline.width)?;
            x.underline_dist = dim(underline.distance)?;
        }
        x.para_space = dim(paragraph)?;
        x.indent_first = dim(t.first_indent)?;
        x.indent_other = dim(t.rest_indent)?;
        if t.tabs.len() > MAX_TABS {
            self.not_supported(format!(
                "text symbol {}: only {} of {} tab stops are stored",
                t.common.id,
                MAX_TABS,
                t.tabs.len()
            ));
        }
        x.tabs = t
            .tabs
            .iter()
            .take(MAX_TABS)
            .map(|tab| to_ocad_dimension(*tab))
            .collect::<Result<_>>()?;

        let (frame, legacy_width, rect) = self.framing(t, true)?;
        x.frame = frame;
        base.frame_width = legacy_width;
        [x.frame_left, x.frame_top, x.frame_right, x.frame_bottom] = rect;

        if let Some(center) = t.center_point {
            if v.has_text_point_symbol() {
                if let Some(number) = self.reference(center, "text center point symbol") {
                    x.point_symbol_on = 1;
                    x.point_symbol = number;
                }
            }
        }

        Ok(SymbolRecord {
            base,
            extra: SymbolExtra::Text(x),
        })
    }

    fn line_text_record(
        &mut self,
        number: i32,
        def: &SymbolDefinition,
        t: &TextSymDef,
    ) -> Result<SymbolRecord> {
        let legacy = self.version.is_legacy();
        let otp = if legacy { symbol_otp::LINE } else { symbol_otp::LINE_TEXT };
        let mut base = self.base(number, otp, def)?;
        base.sym_tp = legacy as u8;

        let (frame, legacy_width, _) = self.framing(t, false)?;
        base.frame_width = legacy_width;
        let extra = LineTextExtra {
            font: self.font(t),
            frame,
        };
        Ok(SymbolRecord {
            base,
            extra: SymbolExtra::LineText(extra),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_codes() {
        use HorizAlign::*;
        use VertAlign::*;
        let v9 = FormatVersion::V9;
        let v10 = FormatVersion::V10;
        assert_eq!(alignment_code(Right, TopAscent, v9), 2);
        assert_eq!(alignment_code(Left, TopAscent, v10), 8);
        assert_eq!(alignment_code(Center, Midpoint, v10), 5);
        assert_eq!(alignment_code(Right, MidpointAllLines, v10), 6);
        assert_eq!(alignment_code(Center, Bottom, v10), 1);
        assert_eq!(alignment_code(Justified, TopAscent, v10), 3);
    }

    #[test]
    fn test_line_style_codes() {
        assert_eq!(line_style_code(LineStyle::Rounded), 1);
        assert_eq!(line_style_code(LineStyle::Mitered), 4);
        assert_eq!(line_style_code(LineStyle::Beveled), 0);
        assert_eq!(line_style_code(LineStyle::FlatRounded), 0);
    }

    #[test]
    fn test_dimension_must_fit_sixteen_bits() {
        assert_eq!(dim(1.5).unwrap(), 150);
        assert_eq!(dim(-327.68).unwrap(), i16::MIN);
        assert!(matches!(dim(1.0e6), Err(OcadError::NumericOverflow(_))));
        assert!(matches!(dim(f64::INFINITY), Err(OcadError::NumericOverflow(_))));
    }
}
