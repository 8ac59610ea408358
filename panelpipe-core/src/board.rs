//! Board probing trait
//!
//! Each board-support variant implements [`Board`] once. Probing consumes
//! the board description and hands back the capability descriptor plus the
//! driver handles, so the rest of the backend never sees which BSP it runs
//! on.

use panelpipe_hal::{
    AccelError, PanelDriver, RotateScaleJob, RotateScaleUnit, TouchDriver, TouchError, TouchSample,
};

use crate::caps::DisplayCapabilities;

/// Board probe errors
///
/// Any of these stops video startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    /// The panel could not be brought up
    PanelInit,
    /// The backlight could not be switched on
    Backlight,
    /// The panel rejected the display-on command
    DisplayOn,
    /// The board reported a zero-sized panel
    InvalidResolution,
}

impl ProbeError {
    /// Short human-readable description
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProbeError::PanelInit => "panel initialization failed",
            ProbeError::Backlight => "backlight control failed",
            ProbeError::DisplayOn => "display-on command failed",
            ProbeError::InvalidResolution => "panel reports zero resolution",
        }
    }
}

/// Everything a successful probe produces
pub struct BoardParts<P, T, A> {
    pub caps: DisplayCapabilities,
    pub panel: P,
    pub touch: Option<T>,
    pub accel: Option<A>,
}

impl<P, T, A> BoardParts<P, T, A> {
    /// Bundle probe results
    ///
    /// The touch and accelerator flags of `caps` are overwritten from the
    /// handles actually present, so the descriptor cannot disagree with them.
    pub fn new(caps: DisplayCapabilities, panel: P, touch: Option<T>, accel: Option<A>) -> Self {
        let caps = caps
            .with_touch(touch.is_some())
            .with_accelerator(accel.is_some());
        Self {
            caps,
            panel,
            touch,
            accel,
        }
    }
}

/// A board-support variant
pub trait Board<'d> {
    type Panel: PanelDriver<'d>;
    type Touch: TouchDriver;
    type Accel: RotateScaleUnit;

    /// Bring up the panel and probe optional peripherals
    ///
    /// Called once per process; re-probing is not supported.
    fn probe(self) -> Result<BoardParts<Self::Panel, Self::Touch, Self::Accel>, ProbeError>;
}

/// Touch placeholder for boards without a touch controller
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTouch;

impl TouchDriver for NoTouch {
    fn read_sample(&mut self) -> Result<TouchSample, TouchError> {
        Err(TouchError::Unsupported)
    }
}

/// Accelerator placeholder for boards without a rotate/scale unit
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccel;

impl RotateScaleUnit for NoAccel {
    fn rotate_scale(&mut self, _job: RotateScaleJob<'_>) -> Result<(), AccelError> {
        Err(AccelError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::WireFormat;

    #[test]
    fn test_parts_sync_flags() {
        let caps = DisplayCapabilities::new("test", 10, 10, WireFormat::Rgb565)
            .with_touch(true)
            .with_accelerator(true);
        let parts: BoardParts<(), NoTouch, NoAccel> = BoardParts::new(caps, (), None, None);
        assert!(!parts.caps.has_touch);
        assert!(!parts.caps.has_accelerator);

        let parts: BoardParts<(), NoTouch, NoAccel> =
            BoardParts::new(caps, (), Some(NoTouch), Some(NoAccel));
        assert!(parts.caps.has_touch);
        assert!(parts.caps.has_accelerator);
    }

    #[test]
    fn test_placeholders_unsupported() {
        assert_eq!(NoTouch.read_sample(), Err(TouchError::Unsupported));
    }
}
