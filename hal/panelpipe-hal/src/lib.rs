//! Panelpipe Hardware Abstraction Layer
//!
//! This crate defines the contracts the display backend consumes from a
//! board-support package. The BSP owns the actual peripherals (SPI/i80 bus,
//! MIPI-DSI host, touch controller, 2D accelerator); panelpipe only sees
//! them through these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Rendering library (surface, events)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  panelpipe-video / panelpipe-core       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  panelpipe-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  SPI panel    │       │  DSI panel +  │
//! │  BSP          │       │  accelerator  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`panel::PanelDriver`] - Asynchronous bitmap transfer to the panel
//! - [`panel::CompletionSink`] - Interrupt-side transfer-done notification
//! - [`touch::TouchDriver`] - Non-blocking touch sample reads
//! - [`accel::RotateScaleUnit`] - Hardware rotate/scale engine

#![no_std]
#![deny(unsafe_code)]

pub mod accel;
pub mod panel;
pub mod touch;

// Re-export key traits at crate root for convenience
pub use accel::{AccelError, RotateScaleJob, RotateScaleUnit, RotationAngle};
pub use panel::{CompletionSink, DrawArea, PanelDriver, PanelError};
pub use touch::{TouchDriver, TouchError, TouchSample};
