//! Video configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use panelpipe_hal::RotationAngle as Rotation;

/// Largest strip height accepted
///
/// Bounds the staging buffer to `width * 64` pixels.
pub const MAX_STRIP_ROWS: u16 = 64;

/// Default strip height
pub const DEFAULT_STRIP_ROWS: u16 = 4;

/// Largest integer scale the accelerator path accepts
pub const MAX_SCALE: u8 = 8;

/// Default number of converted rows between cooperative yields
pub const DEFAULT_YIELD_EVERY_ROWS: u16 = 16;

/// Default bound on a single panel transfer
pub const DEFAULT_TRANSFER_TIMEOUT_MS: u32 = 1000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Strip height is zero or above `MAX_STRIP_ROWS`
    StripRows,
    /// Scale is zero or above `MAX_SCALE`
    Scale,
    /// Yield interval is zero
    YieldInterval,
    /// Transfer timeout is zero
    Timeout,
    /// Content region is empty
    EmptyContent,
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin
    pub const fn with_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// Check if `other` lies completely inside this rectangle
    pub const fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Frame path configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VideoConfig {
    /// Rotation applied by the accelerator
    pub rotation: Rotation,
    /// Integer upscale applied by the accelerator (1 = none)
    pub scale: u8,
    /// Rows per panel transfer on the chunked path
    pub max_strip_rows: u16,
    /// Converted rows between cooperative yields
    pub yield_every_rows: u16,
    /// Upper bound on one panel transfer, in milliseconds
    pub transfer_timeout_ms: u32,
    /// Region of the surface fed to the accelerator (None = whole surface)
    pub content: Option<Rect>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            rotation: Rotation::Deg0,
            scale: 1,
            max_strip_rows: DEFAULT_STRIP_ROWS,
            yield_every_rows: DEFAULT_YIELD_EVERY_ROWS,
            transfer_timeout_ms: DEFAULT_TRANSFER_TIMEOUT_MS,
            content: None,
        }
    }
}

impl VideoConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_strip_rows == 0 || self.max_strip_rows > MAX_STRIP_ROWS {
            return Err(ConfigError::StripRows);
        }
        if self.scale == 0 || self.scale > MAX_SCALE {
            return Err(ConfigError::Scale);
        }
        if self.yield_every_rows == 0 {
            return Err(ConfigError::YieldInterval);
        }
        if self.transfer_timeout_ms == 0 {
            return Err(ConfigError::Timeout);
        }
        if matches!(self.content, Some(rect) if rect.is_empty()) {
            return Err(ConfigError::EmptyContent);
        }
        Ok(())
    }

    /// Check if frames need the rotate/scale unit
    pub fn needs_transform(&self) -> bool {
        self.rotation != Rotation::Deg0 || self.scale > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = VideoConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(!config.needs_transform());
        assert_eq!(config.max_strip_rows, 4);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let base = VideoConfig::default();

        let config = VideoConfig { max_strip_rows: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::StripRows));

        let config = VideoConfig { max_strip_rows: MAX_STRIP_ROWS + 1, ..base };
        assert_eq!(config.validate(), Err(ConfigError::StripRows));

        let config = VideoConfig { scale: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::Scale));

        let config = VideoConfig { yield_every_rows: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::YieldInterval));

        let config = VideoConfig { transfer_timeout_ms: 0, ..base };
        assert_eq!(config.validate(), Err(ConfigError::Timeout));

        let config = VideoConfig { content: Some(Rect::with_size(0, 200)), ..base };
        assert_eq!(config.validate(), Err(ConfigError::EmptyContent));
    }

    #[test]
    fn test_needs_transform() {
        let base = VideoConfig::default();
        assert!(VideoConfig { rotation: Rotation::Deg90, ..base }.needs_transform());
        assert!(VideoConfig { scale: 2, ..base }.needs_transform());
    }

    #[test]
    fn test_rect_contains() {
        let surface = Rect::with_size(320, 240);
        assert!(surface.contains(&Rect::with_size(320, 200)));
        assert!(surface.contains(&Rect::new(10, 10, 310, 230)));
        assert!(!surface.contains(&Rect::new(10, 10, 311, 230)));
    }
}
