//! Windowing backend for panelpipe
//!
//! This crate provides:
//! - `VideoDevice` trait, the contract the rendering library drives
//! - `Surface`, the RGB565 pixel buffer the library draws into
//! - `EventQueue` and the touch polling loop
//! - `VideoBackend`, the context object that owns every handle
//!
//! # Architecture
//!
//! ```text
//!  rendering library
//!        │ create / update / destroy / pump
//!        ▼
//!  VideoBackend ──strips──► StagingBuffer ──draw_bitmap──► Panel
//!        │                                                   │ irq
//!        └──rotate/scale──► AcceleratorPath                  ▼
//!                                                    CompletionSignal
//! ```
//!
//! The backend never touches statics: the completion signal and event queue
//! are borrowed for the backend's lifetime, so the firmware decides where
//! they live.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod backend;
pub mod device;
pub mod error;
pub mod input;
pub mod surface;

pub use backend::{FrameStats, VideoBackend};
pub use device::{DisplayMode, VideoDevice};
pub use error::{InitError, VideoError};
pub use input::{post_event, touch_poll_loop, EventQueue, VideoEvent, EVENT_QUEUE_DEPTH};
pub use surface::{Surface, SurfaceFormat};
