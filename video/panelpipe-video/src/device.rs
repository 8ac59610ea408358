//! Windowing contract
//!
//! The rendering library talks to the display only through [`VideoDevice`].
//! There is exactly one window; its framebuffer is a [`Surface`] the library
//! owns between create and destroy.

use heapless::Vec;
use panelpipe_core::Rect;

use crate::backend::FrameStats;
use crate::error::{InitError, VideoError};
use crate::input::{VideoEvent, EVENT_QUEUE_DEPTH};
use crate::surface::{Surface, SurfaceFormat};

/// Display mode reported to the rendering library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayMode {
    pub width: u16,
    pub height: u16,
    pub format: SurfaceFormat,
    pub board_name: &'static str,
}

/// Video device driven by the rendering library
#[allow(async_fn_in_trait)]
pub trait VideoDevice {
    /// The single display mode this device offers
    fn display_mode(&self) -> DisplayMode;

    /// Allocate the window surface and the transfer buffers behind it
    fn create_framebuffer(&mut self) -> Result<Surface, InitError>;

    /// Push the surface to the panel
    ///
    /// `dirty` limits the transfer to the rows the rectangles cover; an
    /// empty slice sends the whole frame.
    async fn update_framebuffer(&mut self, surface: &Surface, dirty: &[Rect]) -> Result<FrameStats, VideoError>;

    /// Release the surface and the transfer buffers
    fn destroy_framebuffer(&mut self, surface: Surface);

    /// Collect pending input events
    fn pump_events(&mut self) -> Vec<VideoEvent, EVENT_QUEUE_DEPTH>;

    /// Window was moved by the library
    fn set_window_position(&mut self, x: i32, y: i32);

    /// Window was resized by the library
    fn set_window_size(&mut self, width: u16, height: u16);
}
