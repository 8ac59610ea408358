//! Panel driver abstractions
//!
//! A panel accepts one bitmap at a time. `draw_bitmap` only queues the
//! transfer; the BSP reports completion from interrupt context through the
//! registered [`CompletionSink`].

/// Panel driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Bus or DMA engine rejected the transfer
    Bus,
    /// Draw area is empty or lies outside what the controller accepts
    InvalidArea,
    /// Panel has not been initialized or is powered off
    NotReady,
    /// Completion callback could not be registered
    CallbackRegistration,
}

/// Half-open rectangle in panel coordinates
///
/// Matches the `(x0, y0, x1, y1)` convention of LCD panel drivers:
/// `x1` and `y1` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawArea {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl DrawArea {
    /// Create an area from origin and size
    pub const fn from_origin(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x.saturating_add(width),
            y1: y.saturating_add(height),
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        self.y1.saturating_sub(self.y0)
    }

    /// Number of pixels covered
    pub const fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Check if the area covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Receiver for transfer-done notifications
///
/// Called from interrupt or DMA callback context. Implementations must do
/// nothing beyond raising a flag or signal: no allocation, no buffer access.
pub trait CompletionSink: Sync {
    /// The most recently queued transfer has left the staging buffer
    fn transfer_done(&self);
}

/// Panel driver
///
/// `'d` is the lifetime of the completion sink the driver keeps a
/// reference to; it is owned by the backend context, not by a static.
pub trait PanelDriver<'d> {
    /// Register the sink notified after every finished transfer
    ///
    /// Replaces any previously registered sink.
    fn register_completion(&mut self, sink: &'d dyn CompletionSink) -> Result<(), PanelError>;

    /// Queue a bitmap transfer
    ///
    /// `pixels` holds `area.pixel_count()` pixels in the panel's native
    /// wire format, row-major. The call returns once the transfer is
    /// queued; the buffer must stay untouched until the sink fires.
    fn draw_bitmap(&mut self, area: DrawArea, pixels: &[u16]) -> Result<(), PanelError>;

    /// Switch the panel output on or off
    ///
    /// Panels that start enabled may keep the default no-op.
    fn set_display_on(&mut self, _on: bool) -> Result<(), PanelError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_from_origin() {
        let area = DrawArea::from_origin(260, 480, 200, 320);
        assert_eq!(area.x1, 460);
        assert_eq!(area.y1, 800);
        assert_eq!(area.width(), 200);
        assert_eq!(area.height(), 320);
        assert_eq!(area.pixel_count(), 64_000);
    }

    #[test]
    fn test_empty_area() {
        assert!(DrawArea::from_origin(0, 0, 0, 4).is_empty());
        assert!(DrawArea { x0: 10, y0: 0, x1: 5, y1: 4 }.is_empty());
        assert!(!DrawArea::from_origin(0, 0, 1, 1).is_empty());
    }
}
