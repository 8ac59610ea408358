//! Board-support package contracts

use panelpipe_hal::{AccelError, PanelDriver, RotateScaleUnit, TouchDriver, TouchError};

/// BSP call failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BspError {
    /// The vendor call returned an error code
    Failed(i32),
    /// Out of (DMA-capable) memory
    NoMemory,
}

/// Display side of a board-support package
pub trait DisplayBsp<'d> {
    type Panel: PanelDriver<'d>;
    type Touch: TouchDriver;

    /// Create the bus and panel controller and reset the panel
    fn new_panel(&mut self) -> Result<Self::Panel, BspError>;

    /// Switch the backlight on
    fn backlight_on(&mut self) -> Result<(), BspError>;

    /// Bring up the touch controller
    ///
    /// `TouchError::Unsupported` means the board has none.
    fn new_touch(&mut self) -> Result<Self::Touch, TouchError>;
}

/// BSP of a board with a rotate/scale unit
pub trait AcceleratorBsp<'d>: DisplayBsp<'d> {
    type Accel: RotateScaleUnit;

    /// Register a rotate/scale client
    fn new_accelerator(&mut self) -> Result<Self::Accel, AccelError>;
}

/// Probe touch, treating every failure as "no touch"
pub(crate) fn probe_touch<T>(result: Result<T, TouchError>, board: &'static str) -> Option<T> {
    match result {
        Ok(touch) => Some(touch),
        Err(TouchError::Unsupported) => {
            info!("{}: touch not supported", board);
            None
        }
        Err(TouchError::Bus) => {
            warn!("{}: touch init failed, continuing without touch", board);
            None
        }
    }
}
