//! Touch driver adapters

use panelpipe_hal::{TouchDriver, TouchError, TouchSample};

/// Derives the pressed flag from the coordinates
///
/// Some touch BSPs never report a usable pressed flag and leave the
/// coordinates at zero while nothing touches the panel. This wrapper
/// treats any non-zero coordinate as a press.
pub struct CoordinatePress<T> {
    inner: T,
}

impl<T> CoordinatePress<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: TouchDriver> TouchDriver for CoordinatePress<T> {
    fn read_sample(&mut self) -> Result<TouchSample, TouchError> {
        let sample = self.inner.read_sample()?;
        Ok(TouchSample {
            pressed: sample.x != 0 || sample.y != 0,
            ..sample
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(TouchSample);

    impl TouchDriver for Fixed {
        fn read_sample(&mut self) -> Result<TouchSample, TouchError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_nonzero_is_pressed() {
        let raw = TouchSample {
            pressed: false,
            x: 12,
            y: 0,
        };
        let mut touch = CoordinatePress::new(Fixed(raw));
        assert_eq!(touch.read_sample(), Ok(TouchSample::pressed(12, 0)));
    }

    #[test]
    fn test_origin_is_released() {
        let raw = TouchSample {
            pressed: true,
            x: 0,
            y: 0,
        };
        let mut touch = CoordinatePress::new(Fixed(raw));
        assert_eq!(touch.read_sample(), Ok(TouchSample::released()));
    }
}
