//! 2D rotate/scale accelerator abstractions
//!
//! Only some boards carry a pixel-processing unit. Boards without one hand
//! the backend no accelerator at all, so nothing in the frame path ever
//! calls through this trait on them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Accelerator errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelError {
    /// The unit is absent or refused the client registration
    Unsupported,
    /// Job geometry or buffer sizes rejected by the unit
    InvalidJob,
    /// The unit reported a failure while processing
    Hardware,
}

/// Clockwise rotation applied by the accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationAngle {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// Angle in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }

    /// Parse an angle in degrees; only right angles are valid
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(RotationAngle::Deg0),
            90 => Some(RotationAngle::Deg90),
            180 => Some(RotationAngle::Deg180),
            270 => Some(RotationAngle::Deg270),
            _ => None,
        }
    }

    /// Check if the rotation exchanges width and height
    pub const fn swaps_axes(self) -> bool {
        matches!(self, RotationAngle::Deg90 | RotationAngle::Deg270)
    }
}

/// One rotate/scale operation
///
/// The input is a block inside a larger RGB565 picture; the output is a
/// whole picture of `out_width` x `out_height` pixels.
#[derive(Debug)]
pub struct RotateScaleJob<'a> {
    /// Source picture, row-major, `in_pic_width` pixels per row
    pub input: &'a [u16],
    pub in_pic_width: u16,
    pub in_pic_height: u16,
    /// Block of the source picture to process
    pub block_x: u16,
    pub block_y: u16,
    pub block_width: u16,
    pub block_height: u16,
    /// Destination picture; at least `out_width * out_height` pixels
    pub output: &'a mut [u16],
    pub out_width: u16,
    pub out_height: u16,
    pub angle: RotationAngle,
    pub scale_x: u8,
    pub scale_y: u8,
    /// Swap red and blue channels on output
    pub rgb_swap: bool,
    /// Swap the two bytes of every output pixel
    pub byte_swap: bool,
}

/// Rotate/scale accelerator
pub trait RotateScaleUnit {
    /// Run one job to completion
    ///
    /// Blocks until the unit is done. This wait is independent of the
    /// panel's transfer completion.
    fn rotate_scale(&mut self, job: RotateScaleJob<'_>) -> Result<(), AccelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_round_trip() {
        for degrees in [0u16, 90, 180, 270] {
            let angle = RotationAngle::from_degrees(degrees).unwrap();
            assert_eq!(angle.degrees(), degrees);
        }
        assert_eq!(RotationAngle::from_degrees(45), None);
    }

    #[test]
    fn test_swaps_axes() {
        assert!(!RotationAngle::Deg0.swaps_axes());
        assert!(RotationAngle::Deg90.swaps_axes());
        assert!(!RotationAngle::Deg180.swaps_axes());
        assert!(RotationAngle::Deg270.swaps_axes());
    }
}
