//! Touch controller abstractions

/// Touch driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Board has no touch controller (or the BSP does not expose it)
    Unsupported,
    /// Bus error while reading the controller
    Bus,
}

/// One touch controller sample
///
/// Coordinates are raw controller units; no calibration applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    /// A finger is on the panel
    pub pressed: bool,
    pub x: u16,
    pub y: u16,
}

impl TouchSample {
    /// Sample with a finger down at `(x, y)`
    pub const fn pressed(x: u16, y: u16) -> Self {
        Self { pressed: true, x, y }
    }

    /// Sample with no finger down
    pub const fn released() -> Self {
        Self {
            pressed: false,
            x: 0,
            y: 0,
        }
    }
}

/// Touch controller
pub trait TouchDriver {
    /// Read the latest sample
    ///
    /// Must not block waiting for a touch: returns the controller's current
    /// state, which is `pressed == false` when nothing touches the panel.
    fn read_sample(&mut self) -> Result<TouchSample, TouchError>;
}
