//! SPI/i80 panel adapter

use panelpipe_core::{Board, BoardParts, NoAccel, ProbeError};
use panelpipe_hal::PanelDriver;

use crate::bsp::{probe_touch, DisplayBsp};
use crate::presets::BoardPreset;

/// Board whose panel sits on SPI or i80 and has no rotate/scale unit
///
/// Power-up order: panel, backlight, display-on, then touch.
pub struct SpiPanelBoard<B> {
    bsp: B,
    preset: BoardPreset,
}

impl<B> SpiPanelBoard<B> {
    pub fn new(bsp: B, preset: BoardPreset) -> Self {
        Self { bsp, preset }
    }
}

impl<'d, B: DisplayBsp<'d>> Board<'d> for SpiPanelBoard<B> {
    type Panel = B::Panel;
    type Touch = B::Touch;
    type Accel = NoAccel;

    fn probe(mut self) -> Result<BoardParts<B::Panel, B::Touch, NoAccel>, ProbeError> {
        let name = self.preset.name;

        let mut panel = self.bsp.new_panel().map_err(|err| {
            error!("{}: panel init failed: {:?}", name, err);
            ProbeError::PanelInit
        })?;
        self.bsp.backlight_on().map_err(|_| ProbeError::Backlight)?;
        panel.set_display_on(true).map_err(|_| ProbeError::DisplayOn)?;

        let touch = if self.preset.touch {
            probe_touch(self.bsp.new_touch(), name)
        } else {
            None
        };

        Ok(BoardParts::new(self.preset.capabilities(), panel, touch, None))
    }
}
