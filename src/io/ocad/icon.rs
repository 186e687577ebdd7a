//! Toolbox icon codec.
//!
//! Icons are stored as 22x22 palette bitmaps, bottom row first. In memory
//! they are 24x24 RGBA with a transparent one-pixel border.

use super::compression::{Compressor, Decompressor, Lzw};
use super::constants::{ICON_BYTES, ICON_BYTES_LEGACY, ICON_COMPRESSED_PREFIX, ICON_PIXELS};
use crate::error::{OcadError, Result};
use crate::symbols::ToolboxIcon;
use crate::types::IconEncoding;
use once_cell::sync::Lazy;

const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];

/// The 16-color palette of 4-bit icons. Index 15 is transparent.
static PALETTE_4BIT: Lazy<[[u8; 4]; 16]> = Lazy::new(|| {
    [
        [0, 0, 0, 255],
        [128, 0, 0, 255],
        [0, 128, 0, 255],
        [128, 128, 0, 255],
        [0, 0, 128, 255],
        [128, 0, 128, 255],
        [0, 128, 128, 255],
        [192, 192, 192, 255],
        [128, 128, 128, 255],
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [255, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 0, 255, 255],
        [0, 255, 255, 255],
        ToolboxIcon::TRANSPARENT,
    ]
});

/// The 125-entry color cube of 8-bit icons. Index 124 is transparent.
static PALETTE_8BIT: Lazy<Vec<[u8; 4]>> = Lazy::new(|| {
    (0..125usize)
        .map(|i| {
            if i == 124 {
                return ToolboxIcon::TRANSPARENT;
            }
            let level = |n: usize| (n * 64).min(255) as u8;
            [level(i / 25), level((i / 5) % 5), level(i % 5), 255]
        })
        .collect()
});

const TRANSPARENT_4BIT: u8 = 15;

fn color_4bit(index: u8) -> [u8; 4] {
    PALETTE_4BIT.get(index as usize).copied().unwrap_or(OPAQUE_WHITE)
}

fn color_8bit(index: u8) -> [u8; 4] {
    PALETTE_8BIT.get(index as usize).copied().unwrap_or(OPAQUE_WHITE)
}

fn nearest_4bit(rgba: [u8; 4]) -> u8 {
    let dist = |p: &[u8; 4]| -> i32 {
        (0..3)
            .map(|c| {
                let d = rgba[c] as i32 - p[c] as i32;
                d * d
            })
            .sum()
    };
    PALETTE_4BIT
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| dist(p))
        .map(|(i, _)| i as u8)
        .unwrap_or(TRANSPARENT_4BIT)
}

/// Nearest of the levels 0, 64, 128, 192 and 255; ties go to the lower.
fn level_8bit(v: u8) -> u32 {
    match v {
        0..=32 => 0,
        33..=96 => 1,
        97..=160 => 2,
        161..=223 => 3,
        _ => 4,
    }
}

fn index_8bit(rgba: [u8; 4]) -> u8 {
    let index = level_8bit(rgba[0]) * 25 + level_8bit(rgba[1]) * 5 + level_8bit(rgba[2]);
    if index > 128 {
        0
    } else {
        index as u8
    }
}

/// Stored bytes that mean "no icon".
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == 0)
}

/// Icon bytes written for a symbol without an icon.
pub fn blank_icon(encoding: IconEncoding) -> Vec<u8> {
    vec![0u8; stored_size(encoding)]
}

pub fn stored_size(encoding: IconEncoding) -> usize {
    match encoding {
        IconEncoding::Raw8Bit => ICON_BYTES,
        IconEncoding::Packed4Bit | IconEncoding::Compressed8Bit => ICON_BYTES_LEGACY,
    }
}

/// Decode stored icon bytes.
pub fn decode_icon(bytes: &[u8], encoding: IconEncoding) -> Result<ToolboxIcon> {
    let mut icon = ToolboxIcon::new();
    match encoding {
        IconEncoding::Packed4Bit => {
            check_len(bytes, ICON_BYTES_LEGACY)?;
            for row in 1..=ICON_PIXELS {
                for col in (1..=ICON_PIXELS).step_by(2) {
                    let byte = bytes[(ICON_PIXELS - row) * 12 + (col - 1) / 2];
                    icon.set_pixel(col, row, color_4bit(byte >> 4));
                    icon.set_pixel(col + 1, row, color_4bit(byte & 0x0F));
                }
            }
        }
        IconEncoding::Compressed8Bit => {
            check_len(bytes, ICON_BYTES_LEGACY)?;
            let mut raw = vec![0u8; ICON_BYTES];
            Lzw::new().expand(&bytes[ICON_COMPRESSED_PREFIX..], &mut raw)?;
            fill_8bit(&mut icon, &raw);
        }
        IconEncoding::Raw8Bit => {
            check_len(bytes, ICON_BYTES)?;
            fill_8bit(&mut icon, bytes);
        }
    }
    Ok(icon)
}

fn fill_8bit(icon: &mut ToolboxIcon, raw: &[u8]) {
    for row in 1..=ICON_PIXELS {
        for col in 1..=ICON_PIXELS {
            icon.set_pixel(col, row, color_8bit(raw[(ICON_PIXELS - row) * ICON_PIXELS + col - 1]));
        }
    }
}

fn check_len(bytes: &[u8], needed: usize) -> Result<()> {
    if bytes.len() < needed {
        return Err(OcadError::MalformedStructure(format!(
            "icon holds {} bytes, expected {}",
            bytes.len(),
            needed
        )));
    }
    Ok(())
}

/// Encode an icon. `Compressed8Bit` fails with
/// [`OcadError::BufferCapacityExceeded`] when the LZW output does not fit.
pub fn encode_icon(icon: &ToolboxIcon, encoding: IconEncoding) -> Result<Vec<u8>> {
    match encoding {
        IconEncoding::Packed4Bit => {
            let mut out = vec![0u8; ICON_BYTES_LEGACY];
            for row in 1..=ICON_PIXELS {
                for col in (1..=ICON_PIXELS).step_by(2) {
                    let c1 = nearest_4bit(icon.pixel(col, row));
                    let c2 = nearest_4bit(icon.pixel(col + 1, row));
                    out[(ICON_PIXELS - row) * 12 + (col - 1) / 2] = (c1 << 4) | c2;
                }
            }
            Ok(out)
        }
        IconEncoding::Compressed8Bit => {
            let raw = raw_8bit(icon);
            let mut out = vec![0xFFu8; ICON_BYTES_LEGACY];
            Lzw::new().compress(&raw, &mut out[ICON_COMPRESSED_PREFIX..])?;
            Ok(out)
        }
        IconEncoding::Raw8Bit => Ok(raw_8bit(icon)),
    }
}

fn raw_8bit(icon: &ToolboxIcon) -> Vec<u8> {
    let mut raw = vec![0u8; ICON_BYTES];
    for row in 1..=ICON_PIXELS {
        for col in 1..=ICON_PIXELS {
            raw[(ICON_PIXELS - row) * ICON_PIXELS + col - 1] = index_8bit(icon.pixel(col, row));
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_icon() -> ToolboxIcon {
        let mut icon = ToolboxIcon::new();
        for i in 1..=22 {
            icon.set_pixel(i, i, [0, 0, 0, 255]);
            icon.set_pixel(23 - i, i, [255, 0, 0, 255]);
        }
        icon
    }

    #[test]
    fn test_palettes() {
        assert_eq!(PALETTE_8BIT.len(), 125);
        assert_eq!(PALETTE_8BIT[124], ToolboxIcon::TRANSPARENT);
        assert_eq!(PALETTE_8BIT[25], [64, 0, 0, 255]);
        assert_eq!(color_8bit(200), OPAQUE_WHITE);
        assert_eq!(index_8bit(ToolboxIcon::TRANSPARENT), 124);
        assert_eq!(nearest_4bit(ToolboxIcon::TRANSPARENT), 15);
        assert_eq!(nearest_4bit([250, 10, 5, 255]), 9);
    }

    #[test]
    fn test_8bit_levels_pick_nearest() {
        assert_eq!(level_8bit(32), 0);
        assert_eq!(level_8bit(33), 1);
        assert_eq!(level_8bit(223), 3);
        assert_eq!(level_8bit(224), 4);
        assert_eq!(index_8bit([224, 0, 224, 255]), 104);
        assert_eq!(color_8bit(index_8bit([230, 100, 10, 255])), [255, 128, 0, 255]);
    }

    #[test]
    fn test_4bit_round_trip() {
        let icon = sample_icon();
        let bytes = encode_icon(&icon, IconEncoding::Packed4Bit).unwrap();
        assert_eq!(bytes.len(), 264);
        assert_eq!(decode_icon(&bytes, IconEncoding::Packed4Bit).unwrap(), icon);
    }

    #[test]
    fn test_compressed_round_trip() {
        let icon = sample_icon();
        let bytes = encode_icon(&icon, IconEncoding::Compressed8Bit).unwrap();
        assert_eq!(bytes.len(), 264);
        assert!(bytes[..16].iter().all(|b| *b == 0xFF));
        assert_eq!(decode_icon(&bytes, IconEncoding::Compressed8Bit).unwrap(), icon);
    }

    #[test]
    fn test_raw_layout_is_bottom_up() {
        let mut icon = ToolboxIcon::new();
        icon.set_pixel(1, 22, [0, 0, 0, 255]);
        let bytes = encode_icon(&icon, IconEncoding::Raw8Bit).unwrap();
        assert_eq!(bytes.len(), 484);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 124);
        assert_eq!(decode_icon(&bytes, IconEncoding::Raw8Bit).unwrap(), icon);
    }

    #[test]
    fn test_short_buffer_is_malformed() {
        let err = decode_icon(&[0u8; 10], IconEncoding::Raw8Bit).unwrap_err();
        assert!(matches!(err, OcadError::MalformedStructure(_)));
    }
}
