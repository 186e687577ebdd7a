//! Symbol records to definitions.

use super::paths::{area_path, line_path};
use super::rectangle::{RectangleGrid, RectangleInfo};
use super::{ReadSession, SymbolNotes};
use crate::error::{OcadError, Result};
use crate::glyph::{Glyph, GlyphPart};
use crate::io::ocad::constants::{element_type, line_symbol_flags};
use crate::io::ocad::coord::from_ocad_dimension;
use crate::io::ocad::icon;
use crate::io::ocad::ids::symbol_id_from_number;
use crate::io::ocad::records::symbol::{
    AreaExtra, FontInfo, FrameFont, LineExtra, RectangleExtra, TextExtra,
};
use crate::io::ocad::records::{Element, SymbolBase, SymbolExtra, SymbolRecord};
use crate::symbols::{
    AreaPattern, AreaSymDef, DashInfo, DoubleLine, Framing, GlyphInfo, GlyphLocation, Hatch,
    HorizAlign, IrregularPattern, LineStyle, LineSymDef, PatternFillMode, PointSymDef, SecondLine,
    Shortening, SymbolCommon, SymbolDefinition, SymbolKind, TextKind, TextSymDef, ToolboxIcon,
    Underline, VertAlign,
};
use crate::types::{ColorId, FormatVersion, IconEncoding, SymbolId, Vector2};
use ahash::AHashMap;

const GRID_LINE_WIDTH: f64 = 0.15;
const GRID_FONT: &str = "Arial";
const GRID_POINTS: f64 = 15.0;

/// Bit 0 round, bit 2 miter, otherwise bevel.
pub(super) fn import_line_style(flags: i32) -> LineStyle {
    if flags & 1 != 0 {
        LineStyle::Rounded
    } else if flags & 4 != 0 {
        LineStyle::Mitered
    } else {
        LineStyle::Beveled
    }
}

fn points_to_mm(points: f64) -> f64 {
    points * 25.4 / 72.0
}

fn mm(value: i16) -> f64 {
    from_ocad_dimension(value as i32)
}

fn record_kind(extra: &SymbolExtra) -> SymbolKind {
    match extra {
        SymbolExtra::Point(_) => SymbolKind::Point,
        SymbolExtra::Line(_) | SymbolExtra::Rectangle(_) => SymbolKind::Line,
        SymbolExtra::Area(_) => SymbolKind::Area,
        SymbolExtra::Text(_) | SymbolExtra::LineText(_) => SymbolKind::Text,
    }
}

/// Horizontal and vertical parts of a stored alignment code.
fn decode_alignment(code: i16, version: FormatVersion) -> (HorizAlign, VertAlign) {
    let vertical = version.has_vertical_text_alignment();
    match code {
        0 => (HorizAlign::Left, VertAlign::Baseline),
        1 => (HorizAlign::Center, VertAlign::Baseline),
        2 => (HorizAlign::Right, VertAlign::Baseline),
        3 => (HorizAlign::Justified, VertAlign::Baseline),
        4 if vertical => (HorizAlign::Left, VertAlign::Midpoint),
        5 if vertical => (HorizAlign::Center, VertAlign::Midpoint),
        6 if vertical => (HorizAlign::Right, VertAlign::Midpoint),
        8 if vertical => (HorizAlign::Left, VertAlign::TopAscent),
        9 if vertical => (HorizAlign::Center, VertAlign::TopAscent),
        10 if vertical => (HorizAlign::Right, VertAlign::TopAscent),
        _ => (HorizAlign::Left, VertAlign::Baseline),
    }
}

/// A rectangle definition waiting for its synthesized grid definitions.
struct PendingGrid {
    id: SymbolId,
    name: String,
    color: ColorId,
    extra: RectangleExtra,
}

impl<'a> ReadSession<'a> {
    pub(super) fn read_symbols(&mut self, first: i32) -> Result<()> {
        if first == 0 {
            return Ok(());
        }
        let positions = self.chain(first, 4, |r| r.read_i32())?;

        let mut records = Vec::with_capacity(positions.len());
        for pos in positions {
            if pos == 0 {
                continue;
            }
            let result = if self.in_file(pos) {
                self.r
                    .seek(pos as u64)
                    .and_then(|_| SymbolRecord::read(&mut self.r, self.version))
            } else {
                Err(OcadError::MalformedStructure(format!(
                    "symbol record at {} lies outside the file",
                    pos
                )))
            };
            if let Some(record) = self.tolerate(result)? {
                records.push(record);
            }
        }
        log::debug!("read {} symbol records", records.len());

        // References are checked against every record, independent of order.
        let kinds: AHashMap<SymbolId, SymbolKind> = records
            .iter()
            .filter_map(|rec| {
                symbol_id_from_number(rec.base.number, self.version)
                    .map(|id| (id, record_kind(&rec.extra)))
            })
            .collect();

        let mut grids = Vec::new();
        for record in &records {
            let Some(id) = symbol_id_from_number(record.base.number, self.version) else {
                self.doc.notifications.notify_error(&OcadError::MalformedStructure(format!(
                    "symbol record with reserved number {}",
                    record.base.number
                )));
                continue;
            };
            let mut common = SymbolCommon::new(id, record.base.description.clone());
            common.hidden = record.base.status & 2 != 0;
            common.icon = self.icon(&record.base)?;

            let mut def: SymbolDefinition = match &record.extra {
                SymbolExtra::Point(p) => PointSymDef {
                    common,
                    glyph: self.glyph(&p.elements),
                    rotatable: record.base.flags & 1 != 0,
                }
                .into(),
                SymbolExtra::Line(l) => self.line_symbol(common, l).into(),
                SymbolExtra::Area(a) => self.area_symbol(common, record.base.flags, a, &kinds).into(),
                SymbolExtra::Text(t) => self.text_symbol(common, &record.base, t, &kinds).into(),
                SymbolExtra::LineText(t) => {
                    self.line_text_symbol(common, &record.base, &t.font, &t.frame).into()
                }
                SymbolExtra::Rectangle(r) => {
                    let (line, pending) = self.rectangle_symbol(common, r);
                    grids.extend(pending);
                    line.into()
                }
            };
            def.finalize();
            self.doc.add_symbol(def);
        }

        for pending in grids {
            self.add_grid_symbols(pending, &kinds)?;
        }
        Ok(())
    }

    fn notes_mut(&mut self, id: SymbolId) -> &mut SymbolNotes {
        self.notes.entry(id).or_default()
    }

    fn icon(&mut self, base: &SymbolBase) -> Result<Option<ToolboxIcon>> {
        if icon::is_blank(&base.icon) {
            return Ok(None);
        }
        let encoding = if self.version == FormatVersion::V8 && base.flags & 2 == 0 {
            IconEncoding::Packed4Bit
        } else {
            self.version.icon_encoding()
        };
        let decoded = icon::decode_icon(&base.icon, encoding);
        self.tolerate(decoded)
    }

    // ------------------------------------------------------------------
    // Glyphs
    // ------------------------------------------------------------------

    fn glyph(&self, elements: &[Element]) -> Glyph {
        let fix = self.fix_paths();
        let mut glyph = Glyph::new();
        for el in elements {
            let Some(color) = self.color(el.color) else {
                continue;
            };
            let part = match el.kind {
                element_type::LINE => line_path(&el.coords, fix).map(|path| GlyphPart::Line {
                    color,
                    width: mm(el.line_width),
                    style: import_line_style(el.flags as i32),
                    path,
                }),
                element_type::AREA => {
                    area_path(&el.coords, fix).map(|path| GlyphPart::Area { color, path })
                }
                element_type::CIRCLE => {
                    let width = mm(el.line_width);
                    let mut diameter = mm(el.diameter);
                    if self.version.circle_diameter_from_center() && diameter > width {
                        diameter += width;
                    }
                    Some(GlyphPart::Circle {
                        color,
                        center: center_of(el),
                        width,
                        diameter,
                    })
                }
                element_type::FILLED_CIRCLE => Some(GlyphPart::FilledCircle {
                    color,
                    center: center_of(el),
                    diameter: mm(el.diameter),
                }),
                other => {
                    log::debug!("skipping glyph element of type {}", other);
                    None
                }
            };
            if let Some(part) = part {
                glyph.add_part(part);
            }
        }
        glyph.finalize();
        glyph
    }

    // ------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------

    fn line_symbol(&mut self, common: SymbolCommon, l: &LineExtra) -> LineSymDef {
        let id = common.id;
        let width = mm(l.line_width);
        let mut def = LineSymDef::new(id, String::new());
        def.common = common;
        def.width = width;
        def.color = if width > 0.0 { self.color(l.line_color) } else { None };
        def.style = import_line_style(l.line_ends as i32);

        if l.dist_from_start != 0 || l.dist_to_end != 0 {
            def.shortening = Some(Shortening {
                start: mm(l.dist_from_start),
                end: mm(l.dist_to_end),
                pointy_ends: l.line_ends & 2 != 0,
            });
        }

        if l.fr_width > 0 {
            if let Some(color) = self.color(l.fr_color) {
                def.second_line = Some(SecondLine {
                    color,
                    width: mm(l.fr_width),
                    style: import_line_style(l.fr_style as i32),
                });
            }
        }

        if l.dbl_mode > 0 {
            let mut dbl = DoubleLine {
                width: mm(l.dbl_width),
                fill_color: if l.dbl_flags & 1 != 0 { self.color(l.dbl_fill_color) } else { None },
                left_color: self.color(l.dbl_left_color),
                left_width: mm(l.dbl_left_width),
                right_color: self.color(l.dbl_right_color),
                right_width: mm(l.dbl_right_width),
                left_dashed: false,
                right_dashed: false,
                fill_dashed: false,
                dashes: DashInfo::default(),
            };
            if l.dbl_mode > 1 {
                dbl.left_dashed = true;
                dbl.right_dashed = l.dbl_mode >= 3;
                dbl.fill_dashed = l.dbl_mode >= 4;
                let dash = mm(l.dbl_length);
                dbl.dashes = DashInfo {
                    dash_length: dash,
                    first_dash_length: dash,
                    last_dash_length: dash,
                    gap_length: mm(l.dbl_gap),
                    min_gaps: 1,
                    ..DashInfo::default()
                };
            }
            def.double_line = Some(dbl);
        }

        if l.main_gap > 0 || l.sec_gap > 0 {
            let mut dashes = DashInfo {
                dash_length: mm(l.main_length),
                first_dash_length: mm(l.end_length),
                last_dash_length: mm(l.end_length),
                gap_length: mm(l.main_gap),
                min_gaps: l.min_sym as i32 + 1,
                ..DashInfo::default()
            };
            if l.sec_gap > 0 {
                dashes.secondary_middle_gaps = 1;
                dashes.secondary_middle_length = mm(l.sec_gap);
            }
            if l.end_gap > 0 {
                dashes.secondary_end_gaps = 1;
                dashes.secondary_end_length = mm(l.end_gap);
            }
            def.dashes = Some(dashes);
        }

        def.glyphs = self.line_glyphs(id, width, l);
        def
    }

    fn line_glyphs(&mut self, id: SymbolId, width: f64, l: &LineExtra) -> Vec<GlyphInfo> {
        let flagged = |bit: u8| !self.version.has_line_symbol_flags() || l.use_symbol_flags & bit != 0;
        let has_secondary = !l.secondary.is_empty() && flagged(line_symbol_flags::SECONDARY);
        let has_corner = !l.corner.is_empty() && flagged(line_symbol_flags::CORNER);
        let has_start = !l.start.is_empty() && flagged(line_symbol_flags::START);
        let has_end = !l.end.is_empty() && flagged(line_symbol_flags::END);

        let distance = mm(l.main_length) + mm(l.main_gap);
        let end_distance = mm(l.end_length) + mm(l.main_gap) / 2.0;
        let minimum = (l.min_sym as i32 + 1).max(1);
        let spaced = |mut info: GlyphInfo| {
            info.distance = distance;
            info.first_distance = end_distance;
            info.last_distance = end_distance;
            info.minimum = minimum;
            info
        };

        let mut glyphs = Vec::new();
        if !l.primary.is_empty() {
            let glyph = self.glyph(&l.primary);
            let mut info = if l.dec_mode > 0 {
                let mut info = spaced(GlyphInfo::new(glyph, GlyphLocation::SpacedDecrease));
                info.decrease_limit = l.dec_last as f64 / 100.0;
                info.decrease_both_ends = l.dec_mode == 2;
                if self.version.has_v12_symbol_extras() {
                    let reason = if l.dec_mode == 3 {
                        Some("OCAD 12 feature: line decrease toward beginning of line")
                    } else if l.dec_symbol_distance == 0 {
                        Some("OCAD 12 feature: line decrease where symbol distances do not decrease")
                    } else if l.dec_symbol_width != 0 {
                        Some("OCAD 12 feature: line decrease where symbol widths decrease")
                    } else {
                        None
                    };
                    if let Some(reason) = reason {
                        self.notes_mut(id).reasons.push(reason.to_string());
                    }
                }
                info
            } else if (width > 0.0 && l.main_gap > 0) || l.sec_gap > 0 {
                let mut info = GlyphInfo::new(glyph, GlyphLocation::GapCenters);
                info.minimum = 1;
                info
            } else {
                spaced(GlyphInfo::new(glyph, GlyphLocation::Spaced))
            };
            info.number = l.n_prim_sym as i32;
            info.spacing = mm(l.prim_sym_dist);
            glyphs.push(info);
        }
        if has_secondary {
            let mut info = spaced(GlyphInfo::new(self.glyph(&l.secondary), GlyphLocation::SpacedOffset));
            info.offset = mm(l.main_length) / 2.0;
            glyphs.push(info);
        }
        if has_corner {
            glyphs.push(GlyphInfo::new(self.glyph(&l.corner), GlyphLocation::Corners));
        }
        if has_start {
            glyphs.push(GlyphInfo::new(self.glyph(&l.start), GlyphLocation::Start));
        }
        if has_end {
            glyphs.push(GlyphInfo::new(self.glyph(&l.end), GlyphLocation::End));
        }
        glyphs
    }

    // ------------------------------------------------------------------
    // Areas
    // ------------------------------------------------------------------

    fn area_symbol(
        &mut self,
        common: SymbolCommon,
        flags: u8,
        a: &AreaExtra,
        kinds: &AHashMap<SymbolId, SymbolKind>,
    ) -> AreaSymDef {
        let mut def = AreaSymDef::new(common.id, String::new());
        def.common = common;
        def.rotatable = flags & 1 != 0;
        if a.fill_on {
            def.fill_color = self.color(a.fill_color);
        }

        if self.version.has_area_border() && a.border_on {
            let border = symbol_id_from_number(a.border_symbol, self.version);
            match border {
                Some(id) if kinds.get(&id) == Some(&SymbolKind::Line) => def.border = Some(id),
                _ => self.doc.notifications.notify_error(&OcadError::UnknownSymbolReference(
                    format!(
                        "area symbol {} has border {} which is not a line symbol",
                        def.common.id, a.border_symbol
                    ),
                )),
            }
        }

        if a.hatch_mode > 0 {
            if let Some(color) = self.color(a.hatch_color) {
                let width = mm(a.hatch_line_width);
                let spacing = if self.version.hatch_distance_is_pitch() {
                    mm(a.hatch_dist)
                } else {
                    width + mm(a.hatch_dist)
                };
                def.hatches.push(Hatch {
                    color,
                    width,
                    spacing,
                    angle: a.hatch_angle1 as f64 / 10.0,
                });
                if a.hatch_mode == 2 {
                    def.hatches.push(Hatch {
                        color,
                        width,
                        spacing,
                        angle: a.hatch_angle2 as f64 / 10.0,
                    });
                }
            }
        }

        if a.struct_mode > 0 && a.struct_width > 0 && a.struct_height > 0 {
            let v12 = self.version.has_v12_symbol_extras();
            let irregular = (v12 && a.struct_irregular_var_x > 0 && a.struct_irregular_var_y > 0)
                .then(|| IrregularPattern {
                    var_x: a.struct_irregular_var_x as f64 / 100.0,
                    var_y: a.struct_irregular_var_y as f64 / 100.0,
                    min_distance: mm(a.struct_irregular_min_dist),
                });
            def.pattern = Some(AreaPattern {
                glyph: self.glyph(&a.elements),
                width: mm(a.struct_width),
                height: mm(a.struct_height),
                angle: a.struct_angle as f64 / 10.0,
                offset_rows: a.struct_mode == 2,
                fill_mode: if v12 {
                    PatternFillMode::from_code(a.struct_draw)
                } else {
                    PatternFillMode::Clip
                },
                irregular,
            });
        }
        def
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn font_basics(&self, def: &mut TextSymDef, font: &FontInfo) {
        def.font_name = font.name.clone();
        def.font_size = points_to_mm(font.size as f64 / 10.0);
        def.bold = font.weight >= 500;
        def.italic = font.italic != 0;
        def.color = self.color(font.color).unwrap_or(ColorId(font.color));
        def.char_spacing = font.char_space as f64 / 100.0;
        def.word_spacing = font.word_space as f64 / 100.0;
        let (horiz, vert) = decode_alignment(font.alignment, self.version);
        def.horiz_align = horiz;
        def.vert_align = vert;
    }

    /// Framing of a text or line-text symbol. `rect` is left, top, right, bottom.
    fn framing(&self, frame: &FrameFont, legacy_width: i16, rect: [i16; 4]) -> Framing {
        let v = self.version;
        let Some(color) = self.color(frame.color) else {
            return Framing::None;
        };
        match frame.mode {
            2 if v >= FormatVersion::V7 => Framing::Line {
                color,
                width: mm(if v == FormatVersion::V7 { legacy_width } else { frame.size }),
                style: match frame.flags {
                    1 => LineStyle::Rounded,
                    2 => LineStyle::Beveled,
                    _ => LineStyle::Mitered,
                },
            },
            1 if v >= FormatVersion::V9 || v <= FormatVersion::V7 => Framing::Shadow {
                color,
                dx: mm(frame.offset_x),
                dy: mm(frame.offset_y),
            },
            3 if v >= FormatVersion::V9 => Framing::Rectangle {
                color,
                left: mm(rect[0]),
                top: mm(rect[1]),
                right: mm(rect[2]),
                bottom: mm(rect[3]),
            },
            _ => Framing::None,
        }
    }

    fn text_symbol(
        &mut self,
        common: SymbolCommon,
        base: &SymbolBase,
        t: &TextExtra,
        kinds: &AHashMap<SymbolId, SymbolKind>,
    ) -> TextSymDef {
        let mut def = TextSymDef::new(common.id, String::new());
        def.common = common;
        self.font_basics(&mut def, &t.font);
        def.line_spacing = def.font_size * t.line_space as f64 / 100.0;
        def.paragraph_spacing = mm(t.para_space);
        def.first_indent = mm(t.indent_first);
        def.rest_indent = mm(t.indent_other);
        def.tabs = t.tabs.iter().map(|tab| from_ocad_dimension(*tab)).collect();

        if t.underline_on != 0 {
            def.paragraph_spacing += mm(t.underline_dist) + mm(t.underline_width);
            if let Some(color) = self.color(t.underline_color) {
                def.underline = Some(Underline {
                    color,
                    width: mm(t.underline_width),
                    distance: mm(t.underline_dist),
                });
            }
        }

        def.framing = self.framing(
            &t.frame,
            base.frame_width,
            [t.frame_left, t.frame_top, t.frame_right, t.frame_bottom],
        );

        if self.version.has_text_point_symbol() && t.point_symbol_on != 0 {
            match symbol_id_from_number(t.point_symbol, self.version) {
                Some(id) if kinds.get(&id) == Some(&SymbolKind::Point) => def.center_point = Some(id),
                _ => self.doc.notifications.notify_error(&OcadError::UnknownSymbolReference(
                    format!(
                        "text symbol {} has center point {} which is not a point symbol",
                        def.common.id, t.point_symbol
                    ),
                )),
            }
        }
        def
    }

    fn line_text_symbol(
        &self,
        common: SymbolCommon,
        base: &SymbolBase,
        font: &FontInfo,
        frame: &FrameFont,
    ) -> TextSymDef {
        let mut def = TextSymDef::new(common.id, String::new());
        def.common = common;
        def.kind = TextKind::LineText;
        self.font_basics(&mut def, font);
        def.line_spacing = def.font_size;
        def.framing = self.framing(frame, base.frame_width, [0; 4]);
        def
    }

    // ------------------------------------------------------------------
    // Rectangles
    // ------------------------------------------------------------------

    fn rectangle_symbol(
        &mut self,
        common: SymbolCommon,
        r: &RectangleExtra,
    ) -> (LineSymDef, Option<PendingGrid>) {
        let id = common.id;
        let name = common.name.clone();
        let width = mm(r.line_width);
        let color = self.color(r.line_color);
        let radius = mm(r.radius);

        let mut def = LineSymDef::new(id, String::new());
        def.common = common;
        def.width = width;
        def.color = if width > 0.0 { color } else { None };
        def.style = if radius > 0.0 {
            LineStyle::Rounded
        } else {
            LineStyle::Mitered
        };

        self.notes_mut(id).rectangle = Some(RectangleInfo {
            corner_radius: radius,
            grid: None,
        });
        let pending = match color {
            Some(color) if r.grid_flags & 1 != 0 => Some(PendingGrid {
                id,
                name,
                color,
                extra: r.clone(),
            }),
            _ => None,
        };
        (def, pending)
    }

    fn add_grid_symbols(
        &mut self,
        pending: PendingGrid,
        kinds: &AHashMap<SymbolId, SymbolKind>,
    ) -> Result<()> {
        let r = &pending.extra;
        let lines = self.allocate_synthetic(kinds)?;
        self.doc.add_symbol(LineSymDef::solid(
            lines,
            format!("{} grid lines", pending.name),
            pending.color,
            GRID_LINE_WIDTH,
            LineStyle::Beveled,
        ));

        let text_size = if self.version >= FormatVersion::V10 && r.font_size > 0 {
            points_to_mm(r.font_size as f64 / 10.0)
        } else {
            points_to_mm(GRID_POINTS)
        };
        let text = self.allocate_synthetic(kinds)?;
        let mut def = TextSymDef::new(text, format!("{} grid text", pending.name));
        def.font_name = GRID_FONT.to_string();
        def.font_size = text_size;
        def.bold = true;
        def.color = pending.color;
        def.line_spacing = 0.0;
        def.word_spacing = 1.0;
        def.horiz_align = HorizAlign::Left;
        def.vert_align = VertAlign::TopAscent;
        self.doc.add_symbol(def);

        let grid = RectangleGrid {
            lines,
            text,
            number_from_bottom: r.grid_flags & 4 != 0,
            cell_width: mm(r.cell_width),
            cell_height: mm(r.cell_height),
            unnumbered_cells: r.unnumbered_cells as i32,
            unnumbered_text: r.unnumbered_text.clone(),
        };
        if let Some(info) = self.notes_mut(pending.id).rectangle.as_mut() {
            info.grid = Some(grid);
        }
        Ok(())
    }

    fn allocate_synthetic(&mut self, kinds: &AHashMap<SymbolId, SymbolKind>) -> Result<SymbolId> {
        let doc = &self.doc;
        self.synthetic
            .allocate(|id| kinds.contains_key(&id) || doc.symbol(id).is_some())
    }
}

fn center_of(el: &Element) -> Vector2 {
    el.coords.first().map(|c| c.point()).unwrap_or(Vector2::ZERO)
}
