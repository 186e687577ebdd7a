//! The v6–v8 setup record.
//!
//! The v7 tail (template display options, real-world flag) is written for
//! v7 and v8 only. Shorter records read as if zero-extended.

use super::super::coord::OcadCoord;
use super::super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::Result;
use crate::types::FormatVersion;

const GPS_ADJUST_BYTES: usize = 12 * 48;
const ZOOM_HISTORY_BYTES: usize = 9 * 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Setup {
    pub offset: OcadCoord,
    pub grid_distance: f64,
    pub work_mode: i16,
    pub line_mode: i16,
    pub edit_mode: i16,
    pub active_symbol: i16,
    pub map_scale: f64,
    pub real_world_offset_x: f64,
    pub real_world_offset_y: f64,
    pub real_world_angle: f64,
    pub real_world_grid: f64,
    pub gps_angle: f64,
    /// Twelve GPS reference points, kept unparsed.
    pub gps_adjust: Vec<u8>,
    pub n_gps_adjust: i32,
    pub draft_scale_x: f64,
    pub draft_scale_y: f64,
    pub template_offset: OcadCoord,
    pub template_file_name: String,
    pub template_enabled: u16,
    pub template_resolution: i16,
    /// Radians.
    pub template_angle: f64,
    pub reserved_coord: OcadCoord,
    pub reserved_real: f64,
    pub print_lower_left: OcadCoord,
    pub print_upper_right: OcadCoord,
    pub print_grid: u16,
    pub print_grid_color: i16,
    pub print_overlap_x: i16,
    pub print_overlap_y: i16,
    pub print_scale: f64,
    pub print_intensity: i16,
    pub print_line_width: i16,
    pub print_reserved: u16,
    pub print_std_fonts: u16,
    pub print_reserved2: u16,
    pub print_reserved3: u16,
    pub partial_lower_left: OcadCoord,
    pub partial_upper_right: OcadCoord,
    pub zoom: f64,
    /// Nine zoom history entries, kept unparsed.
    pub zoom_history: Vec<u8>,
    pub n_zoom_history: i32,
    // v7+
    pub real_world_coord: u16,
    pub file_name: String,
    pub hatch_areas: u16,
    pub dim_template: u16,
    pub hide_template: u16,
    pub template_mode: i16,
    pub template_color: i16,
}

impl Default for Setup {
    fn default() -> Self {
        Setup {
            offset: OcadCoord::default(),
            grid_distance: 10.0,
            work_mode: 0,
            line_mode: 0,
            edit_mode: 0,
            active_symbol: 0,
            map_scale: 15000.0,
            real_world_offset_x: 0.0,
            real_world_offset_y: 0.0,
            real_world_angle: 0.0,
            real_world_grid: 0.0,
            gps_angle: 0.0,
            gps_adjust: vec![0; GPS_ADJUST_BYTES],
            n_gps_adjust: 0,
            draft_scale_x: 0.0,
            draft_scale_y: 0.0,
            template_offset: OcadCoord::default(),
            template_file_name: String::new(),
            template_enabled: 0,
            template_resolution: 0,
            template_angle: 0.0,
            reserved_coord: OcadCoord::default(),
            reserved_real: 0.0,
            print_lower_left: OcadCoord::default(),
            print_upper_right: OcadCoord::default(),
            print_grid: 0,
            print_grid_color: 0,
            print_overlap_x: 0,
            print_overlap_y: 0,
            print_scale: 15000.0,
            print_intensity: 0,
            print_line_width: 0,
            print_reserved: 0,
            print_std_fonts: 0,
            print_reserved2: 0,
            print_reserved3: 0,
            partial_lower_left: OcadCoord::default(),
            partial_upper_right: OcadCoord::default(),
            zoom: 4.0,
            zoom_history: vec![0; ZOOM_HISTORY_BYTES],
            n_zoom_history: 0,
            real_world_coord: 0,
            file_name: String::new(),
            hatch_areas: 0,
            dim_template: 0,
            hide_template: 0,
            template_mode: 0,
            template_color: 0,
        }
    }
}

impl Setup {
    /// Serialized size of the v6 layout.
    pub const SIZE_V6: usize = 1176;
    /// Serialized size of the v7 and v8 layout.
    pub const SIZE_V7: usize = 1444;

    /// Defaults written when no setup was read.
    pub fn for_version(version: FormatVersion) -> Self {
        let mut setup = Setup::default();
        if version.number() < 8 {
            setup.draft_scale_x = setup.map_scale;
            setup.draft_scale_y = setup.map_scale;
        }
        setup
    }

    pub fn size(version: FormatVersion) -> usize {
        if version == FormatVersion::V6 {
            Self::SIZE_V6
        } else {
            Self::SIZE_V7
        }
    }

    /// Parse `SetupSize` bytes of setup data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut padded = bytes.to_vec();
        if padded.len() < Self::SIZE_V7 {
            padded.resize(Self::SIZE_V7, 0);
        }
        Setup::read_full(&mut OcadStreamReader::new(&padded))
    }

    fn read_full(r: &mut OcadStreamReader<'_>) -> Result<Self> {
        Ok(Setup {
            offset: OcadCoord::read(r)?,
            grid_distance: r.read_f64()?,
            work_mode: r.read_i16()?,
            line_mode: r.read_i16()?,
            edit_mode: r.read_i16()?,
            active_symbol: r.read_i16()?,
            map_scale: r.read_f64()?,
            real_world_offset_x: r.read_f64()?,
            real_world_offset_y: r.read_f64()?,
            real_world_angle: r.read_f64()?,
            real_world_grid: r.read_f64()?,
            gps_angle: r.read_f64()?,
            gps_adjust: r.read_bytes(GPS_ADJUST_BYTES)?,
            n_gps_adjust: r.read_i32()?,
            draft_scale_x: r.read_f64()?,
            draft_scale_y: r.read_f64()?,
            template_offset: OcadCoord::read(r)?,
            template_file_name: r.read_delphi_string(255)?,
            template_enabled: r.read_u16()?,
            template_resolution: r.read_i16()?,
            template_angle: r.read_f64()?,
            reserved_coord: OcadCoord::read(r)?,
            reserved_real: r.read_f64()?,
            print_lower_left: OcadCoord::read(r)?,
            print_upper_right: OcadCoord::read(r)?,
            print_grid: r.read_u16()?,
            print_grid_color: r.read_i16()?,
            print_overlap_x: r.read_i16()?,
            print_overlap_y: r.read_i16()?,
            print_scale: r.read_f64()?,
            print_intensity: r.read_i16()?,
            print_line_width: r.read_i16()?,
            print_reserved: r.read_u16()?,
            print_std_fonts: r.read_u16()?,
            print_reserved2: r.read_u16()?,
            print_reserved3: r.read_u16()?,
            partial_lower_left: OcadCoord::read(r)?,
            partial_upper_right: OcadCoord::read(r)?,
            zoom: r.read_f64()?,
            zoom_history: r.read_bytes(ZOOM_HISTORY_BYTES)?,
            n_zoom_history: r.read_i32()?,
            real_world_coord: r.read_u16()?,
            file_name: r.read_delphi_string(255)?,
            hatch_areas: r.read_u16()?,
            dim_template: r.read_u16()?,
            hide_template: r.read_u16()?,
            template_mode: r.read_i16()?,
            template_color: r.read_i16()?,
        })
    }

    pub fn write(&self, w: &mut OcadStreamWriter, version: FormatVersion) -> Result<()> {
        self.offset.write(w)?;
        w.write_f64(self.grid_distance)?;
        w.write_i16(self.work_mode)?;
        w.write_i16(self.line_mode)?;
        w.write_i16(self.edit_mode)?;
        w.write_i16(self.active_symbol)?;
        w.write_f64(self.map_scale)?;
        w.write_f64(self.real_world_offset_x)?;
        w.write_f64(self.real_world_offset_y)?;
        w.write_f64(self.real_world_angle)?;
        w.write_f64(self.real_world_grid)?;
        w.write_f64(self.gps_angle)?;
        write_fixed(w, &self.gps_adjust, GPS_ADJUST_BYTES)?;
        w.write_i32(self.n_gps_adjust)?;
        w.write_f64(self.draft_scale_x)?;
        w.write_f64(self.draft_scale_y)?;
        self.template_offset.write(w)?;
        w.write_delphi_string(Some(&self.template_file_name), 255)?;
        w.write_u16(self.template_enabled)?;
        w.write_i16(self.template_resolution)?;
        w.write_f64(self.template_angle)?;
        self.reserved_coord.write(w)?;
        w.write_f64(self.reserved_real)?;
        self.print_lower_left.write(w)?;
        self.print_upper_right.write(w)?;
        w.write_u16(self.print_grid)?;
        w.write_i16(self.print_grid_color)?;
        w.write_i16(self.print_overlap_x)?;
        w.write_i16(self.print_overlap_y)?;
        w.write_f64(self.print_scale)?;
        w.write_i16(self.print_intensity)?;
        w.write_i16(self.print_line_width)?;
        w.write_u16(self.print_reserved)?;
        w.write_u16(self.print_std_fonts)?;
        w.write_u16(self.print_reserved2)?;
        w.write_u16(self.print_reserved3)?;
        self.partial_lower_left.write(w)?;
        self.partial_upper_right.write(w)?;
        w.write_f64(self.zoom)?;
        write_fixed(w, &self.zoom_history, ZOOM_HISTORY_BYTES)?;
        w.write_i32(self.n_zoom_history)?;
        if version.number() >= 7 {
            w.write_u16(self.real_world_coord)?;
            w.write_delphi_string(Some(&self.file_name), 255)?;
            w.write_u16(self.hatch_areas)?;
            w.write_u16(self.dim_template)?;
            w.write_u16(self.hide_template)?;
            w.write_i16(self.template_mode)?;
            w.write_i16(self.template_color)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self, version: FormatVersion) -> Result<Vec<u8>> {
        let mut w = OcadStreamWriter::new();
        self.write(&mut w, version)?;
        Ok(w.into_inner())
    }
}

fn write_fixed(w: &mut OcadStreamWriter, bytes: &[u8], size: usize) -> Result<()> {
    let mut buf = bytes.to_vec();
    buf.resize(size, 0);
    w.write_bytes(&buf)
}
