//! Display capability descriptor

use crate::pixel::WireFormat;

/// What the board offers, fixed once probing is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayCapabilities {
    /// Board identity, for logs and diagnostics
    pub board_name: &'static str,
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Pixel layout the panel controller expects
    pub native_format: WireFormat,
    /// A touch controller is present and answered the probe
    pub has_touch: bool,
    /// A rotate/scale unit is available
    pub has_accelerator: bool,
}

impl DisplayCapabilities {
    /// Descriptor for a bare panel (no touch, no accelerator)
    pub const fn new(board_name: &'static str, width: u16, height: u16, native_format: WireFormat) -> Self {
        Self {
            board_name,
            width,
            height,
            native_format,
            has_touch: false,
            has_accelerator: false,
        }
    }

    /// Set touch presence
    pub const fn with_touch(mut self, has_touch: bool) -> Self {
        self.has_touch = has_touch;
        self
    }

    /// Set accelerator presence
    pub const fn with_accelerator(mut self, has_accelerator: bool) -> Self {
        self.has_accelerator = has_accelerator;
        self
    }

    /// Panel size as `(width, height)`
    pub const fn panel_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Pixels in one full frame
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if the resolution is usable
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let caps = DisplayCapabilities::new("test", 320, 240, WireFormat::Rgb565BigEndian)
            .with_touch(true);
        assert_eq!(caps.panel_size(), (320, 240));
        assert_eq!(caps.pixel_count(), 76_800);
        assert!(caps.has_touch);
        assert!(!caps.has_accelerator);
        assert!(caps.is_valid());
    }

    #[test]
    fn test_zero_size_invalid() {
        assert!(!DisplayCapabilities::new("test", 0, 240, WireFormat::Rgb565).is_valid());
    }
}
