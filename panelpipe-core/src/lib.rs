//! Board-agnostic core of the panelpipe display backend
//!
//! This crate contains every piece of the frame path that does not depend
//! on a particular board:
//!
//! - Pixel format conversion into the panel wire format
//! - Strip planning and the fixed-size staging buffer
//! - The single-slot transfer completion signal
//! - Rotate/scale geometry and the aligned accelerator output buffer
//! - Touch edge detection
//! - Capability descriptor, board probing trait and configuration

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod accel;
pub mod board;
pub mod caps;
pub mod config;
pub mod pixel;
pub mod strip;
pub mod sync;
pub mod touch;

pub use accel::{
    center_offset, AcceleratedFrame, AcceleratorBuffer, AcceleratorPath, OutputGeometry, RenderError,
    SourcePicture, Transform,
};
pub use board::{Board, BoardParts, NoAccel, NoTouch, ProbeError};
pub use caps::DisplayCapabilities;
pub use config::{ConfigError, Rect, Rotation, VideoConfig};
pub use pixel::{Rgb565, WireFormat};
pub use strip::{strip_count, OutOfMemory, StagingBuffer, Strip, StripPlan};
pub use sync::{CompletionSignal, SyncError, TransferState};
pub use touch::{Calibration, TouchBridge, TouchEvent, MAX_CONSECUTIVE_READ_ERRORS};
