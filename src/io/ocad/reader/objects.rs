//! Object records to instances.

use super::paths::{area_path, line_path};
use super::symbols::import_line_style;
use super::ReadSession;
use crate::error::{OcadError, Result};
use crate::instances::{
    AreaInstance, GraphicsArea, GraphicsLine, ImageArea, ImageLine, LineInstance,
    LineTextInstance, PointInstance, SymbolInstance, TextInstance,
};
use crate::io::ocad::constants::{object_otp, object_symbol};
use crate::io::ocad::coord::{from_ocad_angle, from_ocad_dimension};
use crate::io::ocad::ids::symbol_id_from_number;
use crate::io::ocad::records::{IndexEntry, ObjectRecord, ParamString};
use crate::symbols::{SymbolDefinition, SymbolKind};
use crate::types::{Cmyk, SymbolId, Vector2};

/// Packed image color: cyan in the low byte, black in the high byte.
pub(crate) fn cmyk_from_packed(packed: u32) -> Cmyk {
    let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
    Cmyk::new(channel(0), channel(8), channel(16), channel(24))
}

/// Split stored text into lines. A single leading empty line is not part of
/// the text.
pub(crate) fn split_text_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    if text.is_empty() {
        lines.clear();
    } else if lines.len() > 1 && lines[0].is_empty() {
        lines.remove(0);
    }
    lines
}

fn malformed(what: &str, obj: &ObjectRecord) -> OcadError {
    OcadError::MalformedStructure(format!(
        "{} object of symbol {} has only {} coordinates",
        what,
        obj.symbol,
        obj.coords.len()
    ))
}

impl<'a> ReadSession<'a> {
    pub(super) fn read_objects(&mut self, first: i32) -> Result<()> {
        if first == 0 {
            return Ok(());
        }
        let version = self.version;
        let entries = self.chain(first, IndexEntry::size(version), |r| {
            IndexEntry::read(r, version)
        })?;

        let mut count = 0usize;
        for entry in entries {
            if !entry.is_live(version) || entry.pos <= 0 {
                continue;
            }
            let result = if self.in_file(entry.pos) {
                self.r
                    .seek(entry.pos as u64)
                    .and_then(|_| ObjectRecord::read(&mut self.r, version))
            } else {
                Err(OcadError::MalformedStructure(format!(
                    "object record at {} lies outside the file",
                    entry.pos
                )))
            };
            if let Some(obj) = self.tolerate(result)? {
                let converted = self.object(&obj);
                self.tolerate(converted)?;
                count += 1;
            }
        }
        log::debug!("read {} object records", count);
        Ok(())
    }

    fn object(&mut self, obj: &ObjectRecord) -> Result<()> {
        if self.version.has_inline_objects() {
            match obj.symbol {
                object_symbol::IMPORTED => return Ok(()),
                object_symbol::GRAPHICS => return self.graphics_object(obj),
                object_symbol::IMAGE => return self.image_object(obj, false),
                object_symbol::LAYOUT => return self.image_object(obj, true),
                _ => {}
            }
        }

        // Unknown definitions and otp values that disagree with the
        // definition kind are dropped without notice.
        let Some(id) = symbol_id_from_number(obj.symbol, self.version) else {
            return Ok(());
        };
        let Some(kind) = self.doc.symbol(id).map(SymbolDefinition::kind) else {
            return Ok(());
        };
        let rectangle = self
            .notes
            .get(&id)
            .and_then(|notes| notes.rectangle.clone());

        let instances = match (obj.otp, kind) {
            (object_otp::POINT, SymbolKind::Point) => self.point_object(id, obj)?,
            (object_otp::LINE, SymbolKind::Line) => self.line_object(id, obj)?,
            (object_otp::LINE, SymbolKind::Text) | (object_otp::LINE_TEXT, SymbolKind::Text) => {
                self.line_text_object(id, obj)?
            }
            (object_otp::AREA, SymbolKind::Area) => self.area_object(id, obj)?,
            (object_otp::UNFORMATTED_TEXT, SymbolKind::Text) => self.text_object(id, obj, false)?,
            (object_otp::FORMATTED_TEXT, SymbolKind::Text)
            | (object_otp::RECTANGLE, SymbolKind::Text) => self.text_object(id, obj, true)?,
            (object_otp::FORMATTED_TEXT, SymbolKind::Line)
            | (object_otp::RECTANGLE, SymbolKind::Line) => match rectangle {
                Some(info) => {
                    let corners: Vec<Vector2> = obj.coords.iter().map(|c| c.point()).collect();
                    info.expand(id, &corners)
                }
                None => Vec::new(),
            },
            (otp, kind) => {
                log::debug!(
                    "dropping object with otp {} on {:?} symbol {}",
                    otp,
                    kind,
                    id
                );
                Vec::new()
            }
        };

        if !instances.is_empty() {
            self.check_renderable(id);
        }
        for instance in instances {
            self.doc.add_instance(instance);
        }
        Ok(())
    }

    /// Count the object against every reason its definition cannot be drawn.
    fn check_renderable(&mut self, id: SymbolId) {
        let Some(notes) = self.notes.get(&id) else {
            return;
        };
        let Some(def) = self.doc.symbol(id) else {
            return;
        };
        if def.common().hidden {
            return;
        }
        let id_text = id.to_string();
        for reason in &notes.reasons {
            self.diagnostics
                .not_renderable(reason, Some((id_text.as_str(), def.name())));
        }
    }

    fn check_font(&mut self, id: SymbolId) {
        if let Some(SymbolDefinition::Text(def)) = self.doc.symbol(id) {
            if !self.fonts.is_font_installed(&def.font_name) {
                self.diagnostics.missing_font(&def.font_name);
            }
        }
    }

    // ------------------------------------------------------------------
    // Symbol objects
    // ------------------------------------------------------------------

    fn point_object(&mut self, id: SymbolId, obj: &ObjectRecord) -> Result<Vec<SymbolInstance>> {
        let Some(location) = obj.coords.first() else {
            return Err(malformed("point", obj));
        };
        // Further coordinates are gap angle pairs in tenths of a degree.
        let gaps = obj.coords[1..]
            .iter()
            .map(|c| (from_ocad_angle(c.x), from_ocad_angle(c.y)))
            .collect();
        Ok(vec![SymbolInstance::Point(PointInstance {
            symbol: id,
            location: location.point(),
            rotation: from_ocad_angle(obj.angle as i32),
            gaps,
        })])
    }

    fn line_object(&mut self, id: SymbolId, obj: &ObjectRecord) -> Result<Vec<SymbolInstance>> {
        if obj.coords.len() < 2 {
            return Err(malformed("line", obj));
        }
        Ok(line_path(&obj.coords, self.fix_paths())
            .map(|path| SymbolInstance::Line(LineInstance { symbol: id, path }))
            .into_iter()
            .collect())
    }

    fn line_text_object(
        &mut self,
        id: SymbolId,
        obj: &ObjectRecord,
    ) -> Result<Vec<SymbolInstance>> {
        if obj.coords.len() < 2 {
            return Err(malformed("line text", obj));
        }
        let Some(path) = line_path(&obj.coords, self.fix_paths()) else {
            return Ok(Vec::new());
        };
        self.check_font(id);
        Ok(vec![SymbolInstance::LineText(LineTextInstance {
            symbol: id,
            path,
            text: obj.text.clone(),
        })])
    }

    fn area_object(&mut self, id: SymbolId, obj: &ObjectRecord) -> Result<Vec<SymbolInstance>> {
        Ok(area_path(&obj.coords, self.fix_paths())
            .map(|path| {
                SymbolInstance::Area(AreaInstance {
                    symbol: id,
                    path,
                    angle: from_ocad_angle(obj.angle as i32),
                })
            })
            .into_iter()
            .collect())
    }

    /// Formatted text objects store a box: the top-left corner is the fourth
    /// coordinate and the top-right corner the third.
    fn text_object(
        &mut self,
        id: SymbolId,
        obj: &ObjectRecord,
        formatted: bool,
    ) -> Result<Vec<SymbolInstance>> {
        let (location, width) = if formatted {
            let [_, _, top_right, top_left, ..] = obj.coords.as_slice() else {
                return Err(malformed("formatted text", obj));
            };
            let location = top_left.point();
            (location, location.distance(&top_right.point()))
        } else {
            let Some(anchor) = obj.coords.first() else {
                return Err(malformed("text", obj));
            };
            (anchor.point(), 0.0)
        };
        self.check_font(id);
        Ok(vec![SymbolInstance::Text(TextInstance {
            symbol: id,
            lines: split_text_lines(&obj.text),
            location,
            rotation: from_ocad_angle(obj.angle as i32),
            width,
        })])
    }

    // ------------------------------------------------------------------
    // Inline objects (v9+)
    // ------------------------------------------------------------------

    fn graphics_object(&mut self, obj: &ObjectRecord) -> Result<()> {
        let Some(color) = self.color(obj.color as i16) else {
            return Ok(());
        };
        let fix = self.fix_paths();
        let instance = match obj.otp {
            object_otp::LINE if obj.coords.len() >= 2 => {
                line_path(&obj.coords, fix).map(|path| {
                    SymbolInstance::GraphicsLine(GraphicsLine {
                        color,
                        width: from_ocad_dimension(obj.line_width as i32),
                        style: import_line_style(obj.diam_flags as i32),
                        path,
                    })
                })
            }
            object_otp::AREA => area_path(&obj.coords, fix)
                .map(|path| SymbolInstance::GraphicsArea(GraphicsArea { color, path })),
            otp => {
                log::debug!("skipping graphics object with otp {}", otp);
                None
            }
        };
        if let Some(instance) = instance {
            self.doc.add_instance(instance);
        }
        Ok(())
    }

    fn image_object(&mut self, obj: &ObjectRecord, layout: bool) -> Result<()> {
        let cmyk = cmyk_from_packed(obj.color);
        let fix = self.fix_paths();
        let instance = match obj.otp {
            object_otp::LINE if obj.coords.len() >= 2 => line_path(&obj.coords, fix).map(|path| {
                SymbolInstance::ImageLine(ImageLine {
                    cmyk,
                    width: from_ocad_dimension(obj.line_width as i32),
                    style: import_line_style(obj.diam_flags as i32),
                    path,
                    layout,
                })
            }),
            object_otp::AREA => area_path(&obj.coords, fix).map(|path| {
                SymbolInstance::ImageArea(ImageArea {
                    cmyk,
                    path,
                    layout,
                })
            }),
            otp => {
                log::debug!("skipping image object with otp {}", otp);
                None
            }
        };

        if self.version.has_v12_symbol_extras() && !obj.object_string.is_empty() {
            let attributes = ParamString::parse(0, &obj.object_string);
            if attributes.get_i32('o', 100) != 100 {
                self.diagnostics
                    .not_renderable("OCAD 12 feature: opacity < 100% for layout layer", None);
            }
        }

        if let Some(instance) = instance {
            self.doc.add_instance(instance);
        }
        Ok(())
    }
}
