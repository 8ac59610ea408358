//! MIPI-DSI panel adapter

use panelpipe_core::{Board, BoardParts, ProbeError};

use crate::bsp::{probe_touch, AcceleratorBsp};
use crate::presets::BoardPreset;

/// Board with a MIPI-DSI panel and, usually, a rotate/scale unit
///
/// DSI panels come up enabled, so no display-on command is sent. A missing
/// or failing accelerator only disables the accelerated path.
pub struct DsiPanelBoard<B> {
    bsp: B,
    preset: BoardPreset,
}

impl<B> DsiPanelBoard<B> {
    pub fn new(bsp: B, preset: BoardPreset) -> Self {
        Self { bsp, preset }
    }
}

impl<'d, B: AcceleratorBsp<'d>> Board<'d> for DsiPanelBoard<B> {
    type Panel = B::Panel;
    type Touch = B::Touch;
    type Accel = B::Accel;

    fn probe(mut self) -> Result<BoardParts<B::Panel, B::Touch, B::Accel>, ProbeError> {
        let name = self.preset.name;

        let panel = self.bsp.new_panel().map_err(|err| {
            error!("{}: panel init failed: {:?}", name, err);
            ProbeError::PanelInit
        })?;
        self.bsp.backlight_on().map_err(|_| ProbeError::Backlight)?;

        let touch = if self.preset.touch {
            probe_touch(self.bsp.new_touch(), name)
        } else {
            None
        };

        let accel = if self.preset.accelerator {
            match self.bsp.new_accelerator() {
                Ok(accel) => Some(accel),
                Err(err) => {
                    warn!("{}: accelerator unavailable ({:?})", name, err);
                    None
                }
            }
        } else {
            None
        };

        Ok(BoardParts::new(self.preset.capabilities(), panel, touch, accel))
    }
}
