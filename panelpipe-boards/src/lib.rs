//! Board-support adapters for panelpipe
//!
//! Board-support packages disagree on almost everything: how the panel is
//! created, whether it needs an explicit display-on command, whether touch
//! and a rotate/scale unit exist. This crate folds them into two adapters
//! implementing [`panelpipe_core::Board`]:
//!
//! - [`SpiPanelBoard`]: SPI/i80 panels, display-on after init, no accelerator
//! - [`DsiPanelBoard`]: MIPI-DSI panels with an optional rotate/scale unit
//!
//! A BSP only has to implement [`DisplayBsp`] (and [`AcceleratorBsp`] for
//! DSI boards); the adapter handles power-up order and optional peripherals.

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod bsp;
pub mod dsi;
pub mod presets;
pub mod spi;
pub mod touch;

pub use bsp::{AcceleratorBsp, BspError, DisplayBsp};
pub use dsi::DsiPanelBoard;
pub use presets::BoardPreset;
pub use spi::SpiPanelBoard;
pub use touch::CoordinatePress;
