//! Map settings: the v6–v8 symbol header and setup, and v8+ string parameters.

use super::ReadSession;
use crate::error::{OcadError, Result};
use crate::io::ocad::constants::{param_type, FILE_HEADER_SIZE};
use crate::io::ocad::records::{FileHeader, ParamString, Setup, StringIndexEntry, SymbolHeader};
use crate::io::ocad::stream::decode_ansi;
use crate::template::Template;
use crate::types::{BoundingBox2D, Cmyk, Color, FormatVersion, Vector2};
use ahash::AHashMap;

/// String parameters grouped by type.
#[derive(Debug, Default)]
struct ParamTable {
    singles: AHashMap<i32, ParamString>,
    lists: AHashMap<i32, Vec<ParamString>>,
}

impl ParamTable {
    fn single(&self, kind: i32) -> Option<&ParamString> {
        self.singles.get(&kind)
    }

    fn list(&self, kind: i32) -> &[ParamString] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<'a> ReadSession<'a> {
    // ------------------------------------------------------------------
    // v6–v8 fixed structures
    // ------------------------------------------------------------------

    pub(super) fn read_legacy_header(&mut self, header: &FileHeader) -> Result<()> {
        let result = self
            .r
            .seek(FILE_HEADER_SIZE as u64)
            .and_then(|_| SymbolHeader::read(&mut self.r));
        if let Some(symbol_header) = self.tolerate(result)? {
            for color in symbol_header.palette() {
                self.doc.add_color(color);
            }
            self.doc.saved.symbol_header = Some(symbol_header.without_colors().to_bytes()?);
        }

        if header.setup_size > 0 {
            let result = self.section_bytes(header.setup_pos, header.setup_size, "setup");
            if let Some(bytes) = self.tolerate(result)? {
                let setup = Setup::from_bytes(&bytes);
                if let Some(setup) = self.tolerate(setup)? {
                    self.apply_setup(&setup);
                    self.doc.saved.setup = Some(bytes);
                }
            }
        }

        if header.info_size > 0 {
            let result = self.section_bytes(header.info_pos, header.info_size, "file info");
            if let Some(bytes) = self.tolerate(result)? {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                self.doc.file_info = decode_ansi(&bytes[..end]);
            }
        }
        Ok(())
    }

    fn section_bytes(&mut self, pos: i32, size: i32, what: &str) -> Result<Vec<u8>> {
        if !self.r.contains(pos as i64, size.max(0) as u64) {
            return Err(OcadError::MalformedStructure(format!(
                "{} at {} ({} bytes) lies outside the file",
                what, pos, size
            )));
        }
        self.r.seek(pos as u64)?;
        self.r.read_bytes(size as usize)
    }

    fn apply_setup(&mut self, setup: &Setup) {
        let doc = &mut self.doc;
        doc.map_scale = setup.map_scale;
        doc.print_scale = setup.print_scale;
        doc.real_world.offset = Vector2::new(setup.real_world_offset_x, setup.real_world_offset_y);
        doc.real_world.angle = setup.real_world_angle;
        doc.real_world.grid_distance = setup.real_world_grid;
        doc.real_world.paper_grid_distance = setup.grid_distance;
        doc.real_world.enabled = if self.version == FormatVersion::V6 {
            // No switch before v7; any georeference counts as enabled.
            setup.real_world_offset_x != 0.0
                || setup.real_world_offset_y != 0.0
                || setup.real_world_angle != 0.0
        } else {
            setup.real_world_coord != 0
        };
        doc.print_area = BoundingBox2D::new(setup.print_lower_left.point(), setup.print_upper_right.point());

        if self.version.has_setup_template()
            && setup.template_enabled != 0
            && !setup.template_file_name.is_empty()
        {
            let mut template = Template::new(
                self.paths.resolve(&setup.template_file_name),
                setup.template_offset.point(),
                setup.template_resolution as f64,
            );
            template.angle = setup.template_angle.to_degrees();
            template.shear_angle = template.angle;
            template.visible = setup.hide_template == 0;
            doc.templates.push(template);
        }
    }

    // ------------------------------------------------------------------
    // v8+ string parameters
    // ------------------------------------------------------------------

    pub(super) fn read_string_params(&mut self, first: i32) -> Result<()> {
        if first == 0 {
            return Ok(());
        }
        let entries = self.chain(first, StringIndexEntry::SIZE, StringIndexEntry::read)?;
        let mut table = ParamTable::default();

        for entry in entries {
            let kind = if entry.kind == -param_type::ZOOM {
                param_type::ZOOM
            } else {
                entry.kind
            };
            if kind <= 0 {
                continue;
            }
            let result = if self.r.contains(entry.pos as i64, entry.len.max(0) as u64) {
                ParamString::read(&mut self.r, &entry)
            } else {
                Err(OcadError::MalformedStructure(format!(
                    "string parameter at {} lies outside the file",
                    entry.pos
                )))
            };
            let Some(mut param) = self.tolerate(result)? else {
                continue;
            };
            param.kind = kind;
            if kind < param_type::COUNT_LIST {
                table.lists.entry(kind).or_default().push(param);
            } else if (param_type::FIRST_SINGLE..=param_type::LAST_SINGLE).contains(&kind) {
                table.singles.insert(kind, param);
            }
        }
        log::debug!(
            "read {} single and {} list string parameter types",
            table.singles.len(),
            table.lists.len()
        );

        if !self.version.is_legacy() {
            self.apply_scale_params(&table);
            self.apply_print_params(&table);
            self.apply_color_params(&table);
            self.apply_view_params(&table);
            self.doc.file_info = table
                .list(param_type::FILE_INFO)
                .iter()
                .map(|p| format!("{}\r\n", p.first))
                .collect();
        }
        self.apply_template_params(&table);
        Ok(())
    }

    fn apply_scale_params(&mut self, table: &ParamTable) {
        let Some(p) = table.single(param_type::SCALE) else {
            return;
        };
        let rw = &mut self.doc.real_world;
        self.doc.map_scale = p.get_f64('m', 10000.0);
        rw.paper_grid_distance = p.get_f64('g', rw.paper_grid_distance);
        rw.offset = Vector2::new(p.get_f64('x', rw.offset.x), p.get_f64('y', rw.offset.y));
        rw.angle = p.get_f64('a', rw.angle);
        rw.grid_distance = p.get_f64('d', rw.grid_distance);
        rw.enabled = p.get_i32('r', 0) != 0;
        rw.local_offset = Vector2::new(
            p.get_f64('b', rw.local_offset.x),
            p.get_f64('c', rw.local_offset.y),
        );
        rw.grid_and_zone = p.get_i32('i', 0);
    }

    fn apply_print_params(&mut self, table: &ParamTable) {
        let Some(p) = table.single(param_type::PRINT) else {
            return;
        };
        self.doc.print_scale = p.get_f64('a', self.doc.map_scale);
        // Bottom and top are stored as the smaller and larger y.
        self.doc.print_area = BoundingBox2D::new(
            Vector2::new(p.get_f64('L', 0.0), p.get_f64('B', 0.0)),
            Vector2::new(p.get_f64('R', 0.0), p.get_f64('T', 0.0)),
        );
    }

    fn apply_color_params(&mut self, table: &ParamTable) {
        for p in table.list(param_type::COLOR).iter().rev() {
            let cmyk = Cmyk::new(
                (p.get_f64('c', 0.0) / 100.0) as f32,
                (p.get_f64('m', 0.0) / 100.0) as f32,
                (p.get_f64('y', 0.0) / 100.0) as f32,
                (p.get_f64('k', 0.0) / 100.0) as f32,
            )
            .clamped();
            let number = p.get_i32('n', 0);
            let Ok(number) = i16::try_from(number) else {
                self.doc.notifications.notify_error(&OcadError::NumericOverflow(format!(
                    "color '{}' has number {} outside the 16-bit range",
                    p.first, number
                )));
                continue;
            };
            let mut color = Color::new(number, p.first.clone(), cmyk);
            color.overprint = p.get_i32('o', 0) != 0;
            self.doc.add_color(color);
        }
    }

    fn apply_view_params(&mut self, table: &ParamTable) {
        let Some(p) = table.single(param_type::VIEW) else {
            return;
        };
        self.doc.hide_templates = p.get_i32('d', 0) != 0;
        self.doc.hide_layout = p.get_i32('l', 0) != 0;
        if self.version.has_euclidean_view_option() {
            self.doc.use_euclidean_distance = p.get_i32('p', 0) == 0;
        }
    }

    fn apply_template_params(&mut self, table: &ParamTable) {
        let hundredths = self.version.template_params_in_hundredths();
        let unit = if hundredths { 100.0 } else { 1.0 };
        for p in table.list(param_type::TEMPLATE) {
            let center = Vector2::new(p.get_f64('x', 0.0) / unit, p.get_f64('y', 0.0) / unit);
            let angle = p.get_f64('a', 0.0);
            let pixel_x = p.get_f64('u', 0.0) / unit;
            let pixel_y = p.get_f64('v', 0.0) / unit;

            let mut template = Template::new(self.paths.resolve(&p.first), center, 0.0);
            template.angle = angle;
            template.shear_angle = p.get_f64('b', angle);
            if pixel_x != 0.0 && pixel_y != 0.0 {
                template.dpi = 25.4 / pixel_x;
                template.scale_x = 1.0;
                template.scale_y = pixel_y / pixel_x;
            }
            template.visible = p.get_i32('s', 1) != 0;
            self.doc.templates.push(template);
        }
    }
}
