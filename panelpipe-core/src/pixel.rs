//! Pixel format conversion
//!
//! The rendering library always draws RGB565 in host byte order. Panels
//! want one of four wire layouts: channel order RGB or BGR, and pixel
//! bytes in host order (parallel/DSI) or big-endian (SPI controllers that
//! clock out the high byte first).
//!
//! Conversion is pure shifts and masks. The layout match is hoisted out of
//! the row loop so the per-pixel body carries no branches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Red channel mask in an RGB565 word
const RED_MASK: u16 = 0xF800;
/// Green channel mask in an RGB565 word
const GREEN_MASK: u16 = 0x07E0;
/// Blue channel mask in an RGB565 word
const BLUE_MASK: u16 = 0x001F;

/// Panel wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WireFormat {
    /// RGB565, host byte order (same as the surface)
    #[default]
    Rgb565,
    /// BGR565, host byte order
    Bgr565,
    /// RGB565, high byte first in memory
    Rgb565BigEndian,
    /// BGR565, high byte first in memory
    Bgr565BigEndian,
}

impl WireFormat {
    /// Check if red and blue trade places
    pub const fn swaps_channels(self) -> bool {
        matches!(self, WireFormat::Bgr565 | WireFormat::Bgr565BigEndian)
    }

    /// Check if pixels must be stored high byte first
    pub const fn big_endian(self) -> bool {
        matches!(self, WireFormat::Rgb565BigEndian | WireFormat::Bgr565BigEndian)
    }
}

/// One RGB565 pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(RED_MASK);
    pub const GREEN: Self = Self(GREEN_MASK);
    pub const BLUE: Self = Self(BLUE_MASK);

    /// Wrap a raw RGB565 word
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Build from channel values
    ///
    /// `r` and `b` keep their low 5 bits, `g` its low 6 bits.
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0x1F) << 11) | ((g as u16 & 0x3F) << 5) | (b as u16 & 0x1F))
    }

    /// Split into (red 0-31, green 0-63, blue 0-31)
    pub const fn channels(self) -> (u8, u8, u8) {
        (
            ((self.0 & RED_MASK) >> 11) as u8,
            ((self.0 & GREEN_MASK) >> 5) as u8,
            (self.0 & BLUE_MASK) as u8,
        )
    }

    /// Raw RGB565 word
    pub const fn bits(self) -> u16 {
        self.0
    }
}

/// Exchange the red and blue fields of a 5-6-5 word
#[inline(always)]
const fn swap_red_blue(px: u16) -> u16 {
    ((px & RED_MASK) >> 11) | (px & GREEN_MASK) | ((px & BLUE_MASK) << 11)
}

/// Convert one surface pixel to the wire format
#[inline(always)]
pub const fn convert_pixel(px: u16, format: WireFormat) -> u16 {
    match format {
        WireFormat::Rgb565 => px,
        WireFormat::Bgr565 => swap_red_blue(px),
        WireFormat::Rgb565BigEndian => px.to_be(),
        WireFormat::Bgr565BigEndian => swap_red_blue(px).to_be(),
    }
}

/// Turn a wire-format pixel back into a surface pixel
///
/// Inverse of [`convert_pixel`] for every format.
#[inline(always)]
pub const fn restore_pixel(wire: u16, format: WireFormat) -> u16 {
    match format {
        WireFormat::Rgb565 => wire,
        WireFormat::Bgr565 => swap_red_blue(wire),
        WireFormat::Rgb565BigEndian => u16::from_be(wire),
        WireFormat::Bgr565BigEndian => swap_red_blue(u16::from_be(wire)),
    }
}

/// Convert a run of surface pixels into `dst`
///
/// Converts `min(src.len(), dst.len())` pixels.
pub fn convert_row(src: &[u16], dst: &mut [u16], format: WireFormat) {
    let len = src.len().min(dst.len());
    let (src, dst) = (&src[..len], &mut dst[..len]);

    match format {
        WireFormat::Rgb565 => dst.copy_from_slice(src),
        WireFormat::Bgr565 => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = swap_red_blue(s);
            }
        }
        WireFormat::Rgb565BigEndian => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.to_be();
            }
        }
        WireFormat::Bgr565BigEndian => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = swap_red_blue(s).to_be();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_FORMATS: [WireFormat; 4] = [
        WireFormat::Rgb565,
        WireFormat::Bgr565,
        WireFormat::Rgb565BigEndian,
        WireFormat::Bgr565BigEndian,
    ];

    #[test]
    fn test_channel_layout() {
        assert_eq!(Rgb565::RED.channels(), (31, 0, 0));
        assert_eq!(Rgb565::GREEN.channels(), (0, 63, 0));
        assert_eq!(Rgb565::BLUE.channels(), (0, 0, 31));
        assert_eq!(Rgb565::from_channels(31, 63, 31), Rgb565::WHITE);
    }

    #[test]
    fn test_from_channels_masks_overflow() {
        // Bits above the field width are dropped, not carried
        assert_eq!(Rgb565::from_channels(0xFF, 0, 0), Rgb565::RED);
        assert_eq!(Rgb565::from_channels(0, 0xFF, 0), Rgb565::GREEN);
    }

    #[test]
    fn test_bgr_swaps_red_and_blue() {
        assert_eq!(convert_pixel(Rgb565::RED.bits(), WireFormat::Bgr565), Rgb565::BLUE.bits());
        assert_eq!(convert_pixel(Rgb565::BLUE.bits(), WireFormat::Bgr565), Rgb565::RED.bits());
        assert_eq!(convert_pixel(Rgb565::GREEN.bits(), WireFormat::Bgr565), Rgb565::GREEN.bits());
    }

    #[test]
    fn test_big_endian_memory_order() {
        let wire = convert_pixel(0xF800, WireFormat::Rgb565BigEndian);
        assert_eq!(wire.to_ne_bytes(), [0xF8, 0x00]);
    }

    #[test]
    fn test_convert_row_partial() {
        let src = [Rgb565::RED.bits(); 8];
        let mut dst = [0u16; 4];
        convert_row(&src, &mut dst, WireFormat::Bgr565);
        assert_eq!(dst, [Rgb565::BLUE.bits(); 4]);
    }

    proptest! {
        #[test]
        fn prop_channels_round_trip(bits in any::<u16>()) {
            let (r, g, b) = Rgb565::from_bits(bits).channels();
            prop_assert_eq!(Rgb565::from_channels(r, g, b).bits(), bits);
        }

        #[test]
        fn prop_restore_inverts_convert(bits in any::<u16>()) {
            for format in ALL_FORMATS {
                prop_assert_eq!(restore_pixel(convert_pixel(bits, format), format), bits);
            }
        }

        #[test]
        fn prop_row_matches_pixel(row in proptest::collection::vec(any::<u16>(), 0..64)) {
            for format in ALL_FORMATS {
                let mut dst = alloc::vec![0u16; row.len()];
                convert_row(&row, &mut dst, format);
                for (&s, &d) in row.iter().zip(&dst) {
                    prop_assert_eq!(d, convert_pixel(s, format));
                }
            }
        }
    }
}
