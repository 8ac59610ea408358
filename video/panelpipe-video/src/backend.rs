//! Backend context
//!
//! [`VideoBackend`] owns the panel, touch and accelerator handles plus every
//! buffer of the frame path. The completion signal and event queue are
//! borrowed for `'d`, the lifetime of the backend itself.
//!
//! One update runs strictly in row order with at most one panel transfer in
//! flight:
//!
//! ```text
//! for each strip:
//!     convert rows into staging
//!     issue ─► draw_bitmap ─► wait (bounded)
//!     yield every N rows
//! ```

use embassy_futures::yield_now;
use embassy_time::Duration;
use heapless::Vec;
use panelpipe_core::{
    AcceleratorPath, Board, Calibration, CompletionSignal, DisplayCapabilities, ProbeError, Rect,
    Rotation, SourcePicture, StagingBuffer, StripPlan, SyncError, TouchBridge, TransferState,
    Transform, VideoConfig,
};
use panelpipe_hal::{DrawArea, PanelDriver, RotateScaleUnit, TouchDriver};

use crate::device::{DisplayMode, VideoDevice};
use crate::error::{InitError, VideoError};
use crate::input::{post_event, EventQueue, VideoEvent, EVENT_QUEUE_DEPTH};
use crate::surface::{Surface, SurfaceFormat};

/// What one update did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Panel transfers issued
    pub transfers: u32,
    /// Completions waited for
    pub completions: u32,
    /// Rows sent on the chunked path
    pub rows: u16,
    /// Cooperative yields taken between strips
    pub yields: u32,
    /// The frame went through the accelerator
    pub accelerated: bool,
    /// The accelerator failed and the chunked path sent the frame
    pub fallback: bool,
    /// A completion left over from a stalled transfer was consumed first
    pub reaped_late: bool,
}

/// Video backend context
pub struct VideoBackend<'d, P, T, A> {
    caps: DisplayCapabilities,
    config: VideoConfig,
    panel: P,
    touch: Option<TouchBridge<T>>,
    accel: Option<AcceleratorPath<A>>,
    signal: &'d CompletionSignal,
    events: &'d EventQueue,
    staging: Option<StagingBuffer>,
    /// Staging buffer of a destroyed framebuffer the panel may still read
    retired: Option<StagingBuffer>,
    /// Frame buffers stay allocated until the stalled transfer completes
    parked: bool,
    frames: u32,
}

impl<'d, P, T, A> VideoBackend<'d, P, T, A>
where
    P: PanelDriver<'d>,
    T: TouchDriver,
    A: RotateScaleUnit,
{
    /// Probe the board and bring up the backend
    ///
    /// Any failure leaves nothing initialized.
    pub fn init<B>(
        board: B,
        config: VideoConfig,
        signal: &'d CompletionSignal,
        events: &'d EventQueue,
    ) -> Result<Self, InitError>
    where
        B: Board<'d, Panel = P, Touch = T, Accel = A>,
    {
        config.validate()?;

        let parts = board.probe()?;
        let caps = parts.caps;
        if !caps.is_valid() {
            return Err(InitError::Probe(ProbeError::InvalidResolution));
        }

        let mut panel = parts.panel;
        panel
            .register_completion(signal)
            .map_err(|_| InitError::CallbackRegistration)?;

        if config.needs_transform() && !caps.has_accelerator {
            warn!(
                "{} has no accelerator, rotation/scale ignored",
                caps.board_name
            );
        }

        info!(
            "Video init: {} {}x{} touch={} accel={}",
            caps.board_name,
            caps.width,
            caps.height,
            caps.has_touch,
            caps.has_accelerator
        );

        Ok(Self {
            caps,
            config,
            panel,
            touch: parts.touch.map(TouchBridge::new),
            accel: parts.accel.map(AcceleratorPath::new),
            signal,
            events,
            staging: None,
            retired: None,
            parked: false,
            frames: 0,
        })
    }

    /// Capability descriptor from the probe
    pub fn caps(&self) -> &DisplayCapabilities {
        &self.caps
    }

    /// Active configuration
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Panel driver
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Panel driver, mutable
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Frames submitted so far
    pub fn frames_submitted(&self) -> u32 {
        self.frames
    }

    /// Free buffers parked by `destroy_framebuffer` once the panel let go
    ///
    /// Returns false while the stalled transfer is still pending.
    fn reclaim_parked(&mut self) -> bool {
        if !self.parked {
            return true;
        }
        if self.signal.reap_late() {
            warn!("Consumed late completion of a stalled transfer");
        }
        if self.signal.state() == TransferState::Pending {
            return false;
        }

        self.parked = false;
        if let Some(staging) = self.retired.take() {
            debug!("Freeing parked staging buffer ({} bytes)", staging.capacity_bytes());
        }
        if let Some(accel) = self.accel.as_mut() {
            accel.release();
        }
        info!("Parked frame buffers freed");
        true
    }

    /// Frames the accelerator failed to produce
    pub fn accelerator_failures(&self) -> u32 {
        self.accel.as_ref().map_or(0, |accel| accel.failures())
    }

    /// Hand the touch bridge to a separate polling task
    ///
    /// After this, `pump_events` only drains the queue.
    pub fn take_touch_bridge(&mut self) -> Option<TouchBridge<T>> {
        self.touch.take()
    }

    /// Install a touch calibration (None = raw coordinates)
    pub fn set_touch_calibration(&mut self, calibration: Option<Calibration>) {
        if let Some(bridge) = self.touch.as_mut() {
            bridge.set_calibration(calibration);
        }
    }

    /// Set the accelerator rotation; only before the first frame
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), VideoError> {
        if self.frames > 0 {
            return Err(VideoError::ConfigLocked);
        }
        self.config.rotation = rotation;
        Ok(())
    }

    /// Set the accelerator scale; only before the first frame
    pub fn set_scale(&mut self, scale: u8) -> Result<(), VideoError> {
        if self.frames > 0 {
            return Err(VideoError::ConfigLocked);
        }
        let config = VideoConfig { scale, ..self.config };
        config.validate().map_err(VideoError::Config)?;
        self.config = config;
        Ok(())
    }
}

impl<'d, P, T, A> VideoDevice for VideoBackend<'d, P, T, A>
where
    P: PanelDriver<'d>,
    T: TouchDriver,
    A: RotateScaleUnit,
{
    fn display_mode(&self) -> DisplayMode {
        DisplayMode {
            width: self.caps.width,
            height: self.caps.height,
            format: SurfaceFormat::Rgb565,
            board_name: self.caps.board_name,
        }
    }

    fn create_framebuffer(&mut self) -> Result<Surface, InitError> {
        if self.staging.is_some() {
            return Err(InitError::FramebufferExists);
        }
        if !self.reclaim_parked() {
            return Err(InitError::TransferInFlight);
        }

        let (width, height) = self.caps.panel_size();
        let surface = Surface::allocate(width, height).map_err(|_| InitError::OutOfMemory)?;
        let staging = StagingBuffer::allocate(width, self.config.max_strip_rows)
            .map_err(|_| InitError::OutOfMemory)?;

        info!(
            "Framebuffer {}x{} created, staging buffer {} bytes",
            width,
            height,
            staging.capacity_bytes()
        );

        self.staging = Some(staging);
        Ok(surface)
    }

    async fn update_framebuffer(&mut self, surface: &Surface, dirty: &[Rect]) -> Result<FrameStats, VideoError> {
        if self.staging.is_none() {
            return Err(VideoError::NoFramebuffer);
        }
        if (surface.width(), surface.height()) != self.caps.panel_size() {
            return Err(VideoError::SurfaceMismatch);
        }

        let mut stats = FrameStats::default();
        if self.signal.reap_late() {
            warn!("Consumed late completion of a stalled transfer");
            stats.reaped_late = true;
        }
        if self.signal.state() != TransferState::Idle {
            return Err(VideoError::TransferInFlight);
        }

        self.frames = self.frames.saturating_add(1);
        let timeout = Duration::from_millis(self.config.transfer_timeout_ms as u64);

        if self.config.needs_transform() {
            if let Some(accel) = self.accel.as_mut() {
                let source = SourcePicture {
                    pixels: surface.pixels(),
                    stride: surface.width(),
                    height: surface.height(),
                    width: surface.width(),
                };
                let transform = Transform {
                    rotation: self.config.rotation,
                    scale: self.config.scale,
                    format: self.caps.native_format,
                };
                let content = self.config.content.unwrap_or(surface.bounds());

                match accel.render(source, content, transform, self.caps.panel_size()) {
                    Ok(frame) => {
                        transfer(&mut self.panel, self.signal, frame.area, frame.pixels, timeout).await?;
                        stats.transfers = 1;
                        stats.completions = 1;
                        stats.accelerated = true;
                        return Ok(stats);
                    }
                    Err(err) => {
                        warn!("Accelerator failed ({:?}), sending frame in strips", err);
                        stats.fallback = true;
                    }
                }
            }
        }

        let Some(staging) = self.staging.as_mut() else {
            return Err(VideoError::NoFramebuffer);
        };
        let (start, end) = dirty_rows(dirty, surface.height());
        let format = self.caps.native_format;
        let mut since_yield = 0u16;

        for strip in StripPlan::over_rows(start, end, staging.max_rows()) {
            let pixels = staging.fill_strip(strip, surface.pixels(), surface.stride(), format);
            let area = DrawArea::from_origin(0, strip.y, surface.width(), strip.rows);
            transfer(&mut self.panel, self.signal, area, pixels, timeout).await?;

            stats.transfers += 1;
            stats.completions += 1;
            stats.rows += strip.rows;

            since_yield += strip.rows;
            if since_yield >= self.config.yield_every_rows {
                since_yield = 0;
                stats.yields += 1;
                yield_now().await;
            }
        }

        trace!(
            "Frame {} sent: {} strips, rows {}..{}",
            self.frames,
            stats.transfers,
            start,
            end
        );
        Ok(stats)
    }

    fn destroy_framebuffer(&mut self, surface: Surface) {
        drop(surface);
        if self.signal.reap_late() {
            warn!("Consumed late completion of a stalled transfer");
        }

        let staging = self.staging.take();
        if self.signal.state() == TransferState::Pending {
            warn!("Transfer still pending, frame buffers parked until it completes");
            self.retired = staging.or(self.retired.take());
            self.parked = true;
            return;
        }

        if let Some(accel) = self.accel.as_mut() {
            accel.release();
        }
        info!("Framebuffer destroyed");
    }

    fn pump_events(&mut self) -> Vec<VideoEvent, EVENT_QUEUE_DEPTH> {
        if let Some(event) = self.touch.as_mut().and_then(|bridge| bridge.poll()) {
            post_event(self.events, VideoEvent::Touch(event));
        }

        let mut pending = Vec::new();
        while !pending.is_full() {
            match self.events.try_receive() {
                Ok(event) => {
                    let _ = pending.push(event);
                }
                Err(_) => break,
            }
        }
        pending
    }

    fn set_window_position(&mut self, x: i32, y: i32) {
        post_event(self.events, VideoEvent::WindowMoved { x, y });
    }

    fn set_window_size(&mut self, width: u16, height: u16) {
        post_event(self.events, VideoEvent::WindowResized { width, height });
    }
}

/// Send one bitmap and wait for the panel to release it
async fn transfer<'d, P: PanelDriver<'d>>(
    panel: &mut P,
    signal: &CompletionSignal,
    area: DrawArea,
    pixels: &[u16],
    timeout: Duration,
) -> Result<(), VideoError> {
    signal.issue().map_err(|_| VideoError::TransferInFlight)?;

    if let Err(err) = panel.draw_bitmap(area, pixels) {
        signal.abandon();
        error!("Panel rejected transfer at row {}: {:?}", area.y0, err);
        return Err(VideoError::Panel(err));
    }

    match signal.wait_for_completion(timeout).await {
        Ok(()) => Ok(()),
        Err(SyncError::Stalled) => {
            error!("Panel transfer stalled at row {}", area.y0);
            Err(VideoError::TransferStalled)
        }
        Err(SyncError::NotPending | SyncError::TransferInFlight) => Err(VideoError::TransferInFlight),
    }
}

/// Row span `[start, end)` covered by `dirty`, clipped to `height`
///
/// No rectangles means the whole frame.
fn dirty_rows(dirty: &[Rect], height: u16) -> (u16, u16) {
    if dirty.is_empty() {
        return (0, height);
    }

    let (start, end) = dirty
        .iter()
        .filter(|rect| !rect.is_empty())
        .fold((height, 0u16), |(start, end), rect| {
            let bottom = rect.bottom().min(height as u32) as u16;
            (start.min(rect.y), end.max(bottom))
        });

    if start < end {
        (start, end)
    } else {
        (0, 0)
    }
}
