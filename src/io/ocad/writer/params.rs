//! Map settings: the v6–v8 symbol header, setup and file info, and v8+
//! string parameters.

use super::WriteSession;
use crate::error::{OcadError, Result};
use crate::io::ocad::block_chain::BlockBuilder;
use crate::io::ocad::constants::{param_type, MAX_COLORS};
use crate::io::ocad::coord::{CoordFlags, OcadCoord};
use crate::io::ocad::records::{ParamString, Setup, StringIndexEntry, SymbolHeader};
use crate::io::ocad::stream::encode_ansi;
use crate::template::Template;

impl<'a> WriteSession<'a> {
    // ------------------------------------------------------------------
    // v6–v8 fixed structures
    // ------------------------------------------------------------------

    /// The symbol header directly follows the file header.
    pub(super) fn write_symbol_header(&mut self) -> Result<()> {
        let doc = self.doc;
        let saved = doc.saved.symbol_header.as_deref().map(SymbolHeader::from_bytes);
        let mut header = match saved {
            Some(parsed) => self.tolerate(parsed)?.unwrap_or_default(),
            None => SymbolHeader::default(),
        };
        let palette = doc.colors();
        if palette.len() > MAX_COLORS {
            self.not_supported(format!(
                "only {} of {} colors fit the OCAD {} color table",
                MAX_COLORS,
                palette.len(),
                self.version
            ));
        }
        header.set_palette(palette);
        header.write(&mut self.w)
    }

    /// Returns the setup position and size.
    pub(super) fn write_setup(&mut self) -> Result<(i32, i32)> {
        let v = self.version;
        let doc = self.doc;
        let saved = doc.saved.setup.as_deref().map(Setup::from_bytes);
        let mut setup = match saved {
            Some(parsed) => self.tolerate(parsed)?,
            None => None,
        }
        .unwrap_or_else(|| Setup::for_version(v));

        setup.map_scale = doc.map_scale;
        setup.print_scale = if doc.print_scale > 0.0 {
            doc.print_scale
        } else {
            doc.map_scale
        };
        let corners = OcadCoord::encode(doc.print_area.min, CoordFlags::empty()).and_then(|ll| {
            Ok((ll, OcadCoord::encode(doc.print_area.max, CoordFlags::empty())?))
        });
        if let Some((ll, ur)) = self.tolerate(corners)? {
            setup.print_lower_left = ll;
            setup.print_upper_right = ur;
        }

        let rw = &doc.real_world;
        setup.real_world_offset_x = rw.offset.x;
        setup.real_world_offset_y = rw.offset.y;
        setup.real_world_angle = rw.angle;
        setup.real_world_grid = rw.grid_distance;
        setup.grid_distance = rw.paper_grid_distance;
        setup.real_world_coord = rw.enabled as u16;

        if v.has_setup_template() {
            if let Some(template) = doc.templates.first() {
                self.setup_template(&mut setup, template)?;
            }
            if doc.templates.len() > 1 {
                self.not_supported(format!(
                    "OCAD {} stores one template; {} more dropped",
                    v,
                    doc.templates.len() - 1
                ));
            }
        }

        let pos = self.offset()?;
        let start = self.w.position();
        setup.write(&mut self.w, v)?;
        let size = (self.w.position() - start) as i32;
        Ok((pos, size))
    }

    fn setup_template(&mut self, setup: &mut Setup, template: &Template) -> Result<()> {
        let Some(offset) = self.tolerate(OcadCoord::encode(template.center, CoordFlags::empty()))?
        else {
            return Ok(());
        };
        setup.template_enabled = 1;
        setup.template_file_name = template.path.clone();
        setup.template_offset = offset;
        setup.template_angle = template.angle.to_radians();
        setup.template_resolution = template.dpi.round().clamp(0.0, i16::MAX as f64) as i16;
        setup.hide_template = !(template.visible && !self.doc.hide_templates) as u16;
        Ok(())
    }

    /// NUL-terminated ANSI text padded to an even size. Returns position and
    /// size.
    pub(super) fn write_file_info(&mut self) -> Result<(i32, i32)> {
        let mut bytes = encode_ansi(&self.doc.file_info);
        bytes.push(0);
        if bytes.len() % 2 != 0 {
            bytes.push(0);
        }
        let size = i32::try_from(bytes.len())
            .map_err(|_| OcadError::NumericOverflow("file info exceeds 2 GiB".to_string()))?;
        let pos = self.offset()?;
        self.w.write_bytes(&bytes)?;
        Ok((pos, size))
    }

    // ------------------------------------------------------------------
    // v8+ string parameters
    // ------------------------------------------------------------------

    pub(super) fn write_string_params(&mut self) -> Result<i32> {
        let params = self.string_params();
        let mut builder = BlockBuilder::new(StringIndexEntry::SIZE);
        for param in &params {
            let entry = param.write(&mut self.w)?;
            builder.push(&mut self.w, entry, StringIndexEntry::write)?;
        }
        let chain = builder.finish(&mut self.w, false, StringIndexEntry::write)?;
        log::debug!("wrote {} string parameters", params.len());
        Ok(chain.first())
    }

    fn string_params(&self) -> Vec<ParamString> {
        let mut out = Vec::new();
        if !self.version.is_legacy() {
            out.extend(self.color_params());
            out.push(self.scale_param());
            out.push(self.print_param());
            out.push(self.view_param());
            out.extend(self.file_info_params());
        }
        out.extend(self.template_params());
        out
    }

    /// Colors are stored bottom-most first, the reverse of the palette.
    fn color_params(&self) -> Vec<ParamString> {
        self.doc
            .colors()
            .iter()
            .rev()
            .map(|color| {
                let [c, m, y, k] = color.cmyk.clamped().scaled(100.0);
                let mut p = ParamString::new(param_type::COLOR, color.name.clone());
                p.push('n', color.id.0)
                    .push('c', c)
                    .push('m', m)
                    .push('y', y)
                    .push('k', k)
                    .push_bool('o', color.overprint);
                p
            })
            .collect()
    }

    fn scale_param(&self) -> ParamString {
        let doc = self.doc;
        let rw = &doc.real_world;
        let mut p = ParamString::new(param_type::SCALE, "");
        p.push_f64('m', doc.map_scale)
            .push_f64('g', rw.paper_grid_distance)
            .push_bool('r', rw.enabled)
            .push_f64('x', rw.offset.x)
            .push_f64('y', rw.offset.y)
            .push_f64('a', rw.angle)
            .push_f64('d', rw.grid_distance);
        if self.version.has_local_grid_offset() {
            p.push_f64('b', rw.local_offset.x).push_f64('c', rw.local_offset.y);
        }
        if rw.grid_and_zone != 0 {
            p.push('i', rw.grid_and_zone);
        }
        p
    }

    fn print_param(&self) -> ParamString {
        let doc = self.doc;
        let area = &doc.print_area;
        let scale = if doc.print_scale > 0.0 {
            doc.print_scale
        } else {
            doc.map_scale
        };
        let mut p = ParamString::new(param_type::PRINT, "");
        p.push_f64('a', scale)
            .push_bool('r', !area.is_zero())
            .push_f64('L', area.min.x)
            .push_f64('B', area.min.y)
            .push_f64('R', area.max.x)
            .push_f64('T', area.max.y);
        p
    }

    fn view_param(&self) -> ParamString {
        let doc = self.doc;
        let mut p = ParamString::new(param_type::VIEW, "");
        p.push_bool('d', doc.hide_templates)
            .push_bool('l', doc.hide_layout);
        if self.version.has_euclidean_view_option() {
            p.push_bool('p', !doc.use_euclidean_distance);
        }
        p
    }

    /// One parameter per line; a single trailing line break is dropped.
    fn file_info_params(&self) -> Vec<ParamString> {
        let info = &self.doc.file_info;
        if info.is_empty() {
            return Vec::new();
        }
        let info = info.strip_suffix("\r\n").unwrap_or(info);
        info.split("\r\n")
            .map(|line| ParamString::new(param_type::FILE_INFO, line))
            .collect()
    }

    fn template_params(&self) -> Vec<ParamString> {
        let unit = if self.version.template_params_in_hundredths() {
            100.0
        } else {
            1.0
        };
        self.doc
            .templates
            .iter()
            .map(|t| {
                let pixel = t.mm_per_pixel();
                let mut p = ParamString::new(param_type::TEMPLATE, t.path.clone());
                p.push_bool('r', t.visible)
                    .push_bool('s', t.visible)
                    .push_f64('x', t.center.x * unit)
                    .push_f64('y', t.center.y * unit)
                    .push_f64('a', t.angle)
                    .push_f64('u', pixel * t.scale_x * unit)
                    .push_f64('v', pixel * t.scale_y * unit);
                if t.shear_angle != t.angle {
                    p.push_f64('b', t.shear_angle);
                }
                p
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::OcadWriter;
    use crate::document::MapDocument;
    use crate::io::ocad::records::{FileHeader, Setup};
    use crate::io::ocad::stream::OcadStreamReader;
    use crate::template::Template;
    use crate::types::{FormatVersion, Vector2};

    fn header(bytes: &[u8]) -> FileHeader {
        FileHeader::read(&mut OcadStreamReader::new(bytes)).unwrap()
    }

    #[test]
    fn test_legacy_file_info_section() {
        let mut doc = MapDocument::new();
        doc.file_info = "abc".to_string();
        let bytes = OcadWriter::new(FormatVersion::V7).write_to_vec(&doc).unwrap();
        let h = header(&bytes);
        assert_eq!(h.info_size, 4);
        let pos = h.info_pos as usize;
        assert_eq!(&bytes[pos..pos + 4], b"abc\0");
    }

    #[test]
    fn test_legacy_setup_size() {
        let doc = MapDocument::new();
        let v6 = header(&OcadWriter::new(FormatVersion::V6).write_to_vec(&doc).unwrap());
        let v8 = header(&OcadWriter::new(FormatVersion::V8).write_to_vec(&doc).unwrap());
        assert_eq!(v6.setup_size as usize, Setup::SIZE_V6);
        assert_eq!(v8.setup_size as usize, Setup::SIZE_V7);
    }

    #[test]
    fn test_extra_setup_templates_are_reported() {
        let mut doc = MapDocument::new();
        doc.templates.push(Template::new("a.bmp", Vector2::ZERO, 300.0));
        doc.templates.push(Template::new("b.bmp", Vector2::ZERO, 300.0));
        let mut writer = OcadWriter::new(FormatVersion::V6);
        writer.write_to_vec(&doc).unwrap();
        assert!(writer.notifications().mentions("template"));

        let mut writer = OcadWriter::new(FormatVersion::V9);
        writer.write_to_vec(&doc).unwrap();
        assert!(writer.notifications().is_empty());
    }
}
