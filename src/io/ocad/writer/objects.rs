//! Instances to object records and index entries.

use super::paths::{area_coords, path_coords, ring_line_coords};
use super::symbols::{dim, line_style_code};
use super::text::{anchored_box, formatted_box, joined_text};
use super::WriteSession;
use crate::document::MapDocument;
use crate::error::{OcadError, Result};
use crate::instances::{SymbolInstance, TextInstance};
use crate::io::ocad::block_chain::BlockBuilder;
use crate::io::ocad::constants::{object_otp, object_symbol};
use crate::io::ocad::coord::{to_ocad_angle, CoordFlags, OcadCoord};
use crate::io::ocad::metrics::TextMetrics;
use crate::io::ocad::records::index::STATUS_NORMAL;
use crate::io::ocad::records::{IndexEntry, ObjectRecord};
use crate::io::ocad::stream::OcadStreamWriter;
use crate::symbols::{SymbolDefinition, TextSymDef};
use crate::types::{Cmyk, SymbolId, Vector2};

/// Image color packed with cyan in the low byte.
pub(crate) fn packed_cmyk(cmyk: Cmyk) -> u32 {
    let [c, m, y, k] = cmyk.scaled(255.0);
    (c as u32) | (m as u32) << 8 | (y as u32) << 16 | (k as u32) << 24
}

/// An encoded record with the index fields that depend on its origin.
struct PendingObject {
    record: ObjectRecord,
    /// Index color: the graphics color, the only color of the definition,
    /// or -1.
    color: i16,
    /// Leading coordinates that are positions (point gaps are angles).
    located: usize,
}

impl PendingObject {
    fn new(record: ObjectRecord, color: i16) -> Self {
        let located = record.coords.len();
        PendingObject {
            record,
            color,
            located,
        }
    }
}

/// Corners of the box around `coords`, flags cleared.
fn coord_bounds(coords: &[OcadCoord]) -> (OcadCoord, OcadCoord) {
    let mut iter = coords.iter();
    let Some(first) = iter.next() else {
        return (OcadCoord::default(), OcadCoord::default());
    };
    let (mut min_x, mut min_y) = (first.x_value(), first.y_value());
    let (mut max_x, mut max_y) = (min_x, min_y);
    for c in iter {
        min_x = min_x.min(c.x_value());
        min_y = min_y.min(c.y_value());
        max_x = max_x.max(c.x_value());
        max_y = max_y.max(c.y_value());
    }
    (
        OcadCoord::raw(min_x << 8, min_y << 8),
        OcadCoord::raw(max_x << 8, max_y << 8),
    )
}

fn encode_points(points: &[Vector2]) -> Result<Vec<OcadCoord>> {
    points
        .iter()
        .map(|p| OcadCoord::encode(*p, CoordFlags::empty()))
        .collect()
}

impl<'a> WriteSession<'a> {
    pub(super) fn write_objects(&mut self) -> Result<i32> {
        let doc = self.doc;
        let version = self.version;
        let write_entry = move |e: &IndexEntry, w: &mut OcadStreamWriter| e.write(w, version);
        let mut builder = BlockBuilder::new(IndexEntry::size(version));

        let mut count = 0usize;
        let mut skipped_inline = 0usize;
        for instance in doc.instances() {
            if instance.is_inline() && !version.has_inline_objects() {
                skipped_inline += 1;
                continue;
            }
            let converted = self.object_records(instance);
            let Some(pending) = self.tolerate(converted)? else {
                continue;
            };
            for object in pending {
                let entry = self.write_object(&object)?;
                builder.push(&mut self.w, entry, write_entry)?;
                count += 1;
            }
        }
        if skipped_inline > 0 {
            self.not_supported(format!(
                "OCAD {} has no graphics or image objects; {} dropped",
                version, skipped_inline
            ));
        }

        let chain = builder.finish(&mut self.w, true, write_entry)?;
        log::debug!("wrote {} object records in {} blocks", count, chain.block_count());
        Ok(chain.first())
    }

    fn write_object(&mut self, object: &PendingObject) -> Result<IndexEntry> {
        let v = self.version;
        let record = &object.record;
        let pos = self.offset()?;
        record.write(&mut self.w, v)?;

        let (lower_left, upper_right) = coord_bounds(&record.coords[..object.located]);
        let mut entry = IndexEntry {
            lower_left,
            upper_right,
            pos,
            len: record.index_len(v),
            symbol: record.symbol,
            ..Default::default()
        };
        if !v.is_legacy() {
            entry.obj_type = record.otp;
            entry.status = STATUS_NORMAL;
            entry.color = object.color;
        }
        Ok(entry)
    }

    /// Stored number and index color of the definition `id`.
    fn symbol_ref(&self, id: SymbolId) -> Result<(i32, &'a SymbolDefinition, i16)> {
        let doc: &'a MapDocument = self.doc;
        let (Some(number), Some(def)) = (self.numbering.number_of(id), doc.symbol(id)) else {
            return Err(OcadError::UnknownSymbolReference(format!(
                "object of undefined symbol {}",
                id
            )));
        };
        let colors = def.colors();
        let color = match colors.as_slice() {
            [only] => only.0,
            _ => -1,
        };
        Ok((number, def, color))
    }

    fn object_records(&mut self, instance: &SymbolInstance) -> Result<Vec<PendingObject>> {
        let v = self.version;
        let out = match instance {
            SymbolInstance::Point(p) => {
                let (number, _, color) = self.symbol_ref(p.symbol)?;
                let mut record = ObjectRecord::new(number, object_otp::POINT);
                record.angle = to_ocad_angle(p.rotation);
                record.coords.push(OcadCoord::encode(p.location, CoordFlags::empty())?);
                record.coords.extend(p.gaps.iter().map(|(start, end)| {
                    OcadCoord::raw(to_ocad_angle(*start) as i32, to_ocad_angle(*end) as i32)
                }));
                vec![PendingObject {
                    record,
                    color,
                    located: 1,
                }]
            }
            SymbolInstance::Line(l) => {
                let (number, _, color) = self.symbol_ref(l.symbol)?;
                let mut record = ObjectRecord::new(number, object_otp::LINE);
                record.coords = path_coords(&l.path, v)?;
                vec![PendingObject::new(record, color)]
            }
            SymbolInstance::Area(a) => {
                let (number, def, color) = self.symbol_ref(a.symbol)?;
                let mut record = ObjectRecord::new(number, object_otp::AREA);
                record.angle = to_ocad_angle(a.angle);
                record.coords = area_coords(&a.path, v)?;
                let mut out = vec![PendingObject::new(record, color)];

                // Without border references the border is drawn as lines.
                let border = match def {
                    SymbolDefinition::Area(area) if !v.has_area_border() => area.border,
                    _ => None,
                };
                if let Some(border) = border {
                    match self.symbol_ref(border) {
                        Ok((border_number, _, border_color)) => {
                            for ring in std::iter::once(&a.path.main).chain(&a.path.holes) {
                                let mut line = ObjectRecord::new(border_number, object_otp::LINE);
                                line.coords = ring_line_coords(ring, v)?;
                                out.push(PendingObject::new(line, border_color));
                            }
                        }
                        Err(err) => self.notifications.notify_error(&err),
                    }
                }
                out
            }
            SymbolInstance::Text(t) => {
                let (number, def, color) = self.symbol_ref(t.symbol)?;
                let SymbolDefinition::Text(text_def) = def else {
                    return Err(OcadError::UnknownSymbolReference(format!(
                        "text object of non-text symbol {}",
                        t.symbol
                    )));
                };
                vec![PendingObject::new(self.text_object(number, t, text_def)?, color)]
            }
            SymbolInstance::LineText(t) => {
                let (number, _, color) = self.symbol_ref(t.symbol)?;
                let otp = if v.is_legacy() {
                    object_otp::LINE
                } else {
                    object_otp::LINE_TEXT
                };
                let mut record = ObjectRecord::new(number, otp);
                record.coords = path_coords(&t.path, v)?;
                record.text = t.text.clone();
                vec![PendingObject::new(record, color)]
            }
            SymbolInstance::GraphicsLine(g) => {
                let mut record = ObjectRecord::new(object_symbol::GRAPHICS, object_otp::LINE);
                record.color = g.color.0 as u16 as u32;
                record.line_width = dim(g.width)?;
                record.diam_flags = line_style_code(g.style);
                record.coords = path_coords(&g.path, v)?;
                vec![PendingObject::new(record, g.color.0)]
            }
            SymbolInstance::GraphicsArea(g) => {
                let mut record = ObjectRecord::new(object_symbol::GRAPHICS, object_otp::AREA);
                record.color = g.color.0 as u16 as u32;
                record.coords = area_coords(&g.path, v)?;
                vec![PendingObject::new(record, g.color.0)]
            }
            SymbolInstance::ImageLine(i) => {
                let symbol = if i.layout {
                    object_symbol::LAYOUT
                } else {
                    object_symbol::IMAGE
                };
                let mut record = ObjectRecord::new(symbol, object_otp::LINE);
                record.color = packed_cmyk(i.cmyk);
                record.line_width = dim(i.width)?;
                record.diam_flags = line_style_code(i.style);
                record.coords = path_coords(&i.path, v)?;
                vec![PendingObject::new(record, -1)]
            }
            SymbolInstance::ImageArea(i) => {
                let symbol = if i.layout {
                    object_symbol::LAYOUT
                } else {
                    object_symbol::IMAGE
                };
                let mut record = ObjectRecord::new(symbol, object_otp::AREA);
                record.color = packed_cmyk(i.cmyk);
                record.coords = area_coords(&i.path, v)?;
                vec![PendingObject::new(record, -1)]
            }
        };
        Ok(out)
    }

    /// Formatted texts store their box with the top-left corner fourth;
    /// unformatted texts store the anchor first, then the box.
    fn text_object(&self, number: i32, t: &TextInstance, def: &TextSymDef) -> Result<ObjectRecord> {
        let v = self.version;
        let metrics = TextMetrics::fixed(def);
        let formatted = t.is_formatted();
        let otp = if formatted {
            object_otp::FORMATTED_TEXT
        } else {
            object_otp::UNFORMATTED_TEXT
        };
        let mut record = ObjectRecord::new(number, otp);
        record.angle = to_ocad_angle(t.rotation);
        record.text = joined_text(&t.lines);

        let points = if formatted {
            let height = metrics.extent(&t.lines).y;
            formatted_box(t.location, t.width, height, t.rotation)
        } else {
            anchored_box(t.location, t.rotation, &t.lines, def, &metrics, v)
        };
        record.coords = encode_points(&points)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_cmyk() {
        assert_eq!(packed_cmyk(Cmyk::new(1.0, 0.0, 0.0, 1.0)), 0xFF00_00FF);
        assert_eq!(packed_cmyk(Cmyk::new(0.0, 1.0, 0.0, 0.0)), 0x0000_FF00);
    }

    #[test]
    fn test_coord_bounds_strip_flags() {
        let a = OcadCoord::encode(Vector2::new(1.0, 5.0), CoordFlags::CORNER).unwrap();
        let b = OcadCoord::encode(Vector2::new(-2.0, 3.0), CoordFlags::DASH).unwrap();
        let (ll, ur) = coord_bounds(&[a, b]);
        assert_eq!((ll.x_value(), ll.y_value()), (-200, 300));
        assert_eq!((ur.x_value(), ur.y_value()), (100, 500));
        assert!(ll.flags().is_empty());
        assert!(ur.flags().is_empty());
    }

    #[test]
    fn test_empty_bounds() {
        let (ll, ur) = coord_bounds(&[]);
        assert_eq!(ll, OcadCoord::default());
        assert_eq!(ur, OcadCoord::default());
    }
}
