//! Backend error types

use core::fmt;

use panelpipe_core::{ConfigError, ProbeError};
use panelpipe_hal::PanelError;

/// Errors that stop the video subsystem from starting
///
/// Each maps to one stable code/message pair for the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Board probe failed
    Probe(ProbeError),
    /// Configuration out of range
    Config(ConfigError),
    /// The panel refused the completion callback
    CallbackRegistration,
    /// Surface or staging buffer could not be allocated
    OutOfMemory,
    /// A framebuffer already exists for this backend
    FramebufferExists,
    /// The previous framebuffer's last transfer has not completed
    TransferInFlight,
}

impl InitError {
    /// Stable negative error code
    pub const fn code(&self) -> i32 {
        match self {
            InitError::Probe(_) => -1,
            InitError::Config(_) => -2,
            InitError::CallbackRegistration => -3,
            InitError::OutOfMemory => -4,
            InitError::FramebufferExists => -5,
            InitError::TransferInFlight => -6,
        }
    }

    /// Short description for the windowing layer
    pub const fn message(&self) -> &'static str {
        match self {
            InitError::Probe(err) => err.as_str(),
            InitError::Config(_) => "invalid video configuration",
            InitError::CallbackRegistration => "could not register panel completion callback",
            InitError::OutOfMemory => "could not allocate frame buffers",
            InitError::FramebufferExists => "framebuffer already created",
            InitError::TransferInFlight => "panel transfer still in flight",
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

impl From<ProbeError> for InitError {
    fn from(err: ProbeError) -> Self {
        InitError::Probe(err)
    }
}

impl From<ConfigError> for InitError {
    fn from(err: ConfigError) -> Self {
        InitError::Config(err)
    }
}

/// Errors from a single frame update or a settings change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoError {
    /// No framebuffer has been created
    NoFramebuffer,
    /// Surface size does not match the panel
    SurfaceMismatch,
    /// Panel driver rejected a transfer; the rest of the frame was dropped
    Panel(PanelError),
    /// The panel did not report completion within the timeout
    TransferStalled,
    /// A stalled transfer still owns the staging buffer
    TransferInFlight,
    /// Rotation and scale cannot change after the first frame
    ConfigLocked,
    /// Requested setting out of range
    Config(ConfigError),
}

impl From<PanelError> for VideoError {
    fn from(err: PanelError) -> Self {
        VideoError::Panel(err)
    }
}
