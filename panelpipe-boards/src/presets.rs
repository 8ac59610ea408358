//! Known boards

use panelpipe_core::{DisplayCapabilities, WireFormat};

/// What a board is expected to carry
///
/// The probe still decides: a preset that lists touch yields
/// `has_touch = false` if the controller does not answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardPreset {
    pub name: &'static str,
    pub width: u16,
    pub height: u16,
    pub format: WireFormat,
    pub touch: bool,
    pub accelerator: bool,
}

impl BoardPreset {
    /// Descriptor before optional peripherals are probed
    pub const fn capabilities(&self) -> DisplayCapabilities {
        DisplayCapabilities::new(self.name, self.width, self.height, self.format)
    }
}

/// ESP32-S3-BOX-3: 320x240 ILI9341 on SPI, capacitive touch
pub const ESP32_S3_BOX_3: BoardPreset = BoardPreset {
    name: "ESP32-S3-BOX-3",
    width: 320,
    height: 240,
    format: WireFormat::Rgb565BigEndian,
    touch: true,
    accelerator: false,
};

/// M5Stack Tab5: 720x1280 MIPI-DSI portrait panel, touch, PPA
pub const M5STACK_TAB5: BoardPreset = BoardPreset {
    name: "M5Stack Tab5",
    width: 720,
    height: 1280,
    format: WireFormat::Rgb565,
    touch: true,
    accelerator: true,
};

/// ESP32-P4 Function EV: 1024x600 MIPI-DSI panel, PPA
pub const ESP32_P4_FUNCTION_EV: BoardPreset = BoardPreset {
    name: "ESP32-P4 Function EV",
    width: 1024,
    height: 600,
    format: WireFormat::Rgb565,
    touch: false,
    accelerator: true,
};

/// Look up a preset by board name (ASCII case-insensitive)
pub fn by_name(name: &str) -> Option<BoardPreset> {
    [ESP32_S3_BOX_3, M5STACK_TAB5, ESP32_P4_FUNCTION_EV]
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(by_name("m5stack tab5"), Some(M5STACK_TAB5));
        assert_eq!(by_name("unknown"), None);
    }

    #[test]
    fn test_capabilities_start_bare() {
        let caps = ESP32_S3_BOX_3.capabilities();
        assert_eq!(caps.panel_size(), (320, 240));
        assert!(!caps.has_touch);
        assert!(caps.native_format.big_endian());
    }
}
