//! Touch event bridge
//!
//! Polls the touch controller once per call and turns the pressed flag into
//! press, move and release events by comparing with the previous sample.

use panelpipe_hal::{TouchDriver, TouchError};

/// Consecutive read errors after which the bridge gives up on the controller
pub const MAX_CONSECUTIVE_READ_ERRORS: u8 = 16;

/// Touch event emitted by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEvent {
    /// Finger went down
    Down { x: u16, y: u16 },
    /// Finger still down, at a new sample position
    Motion { x: u16, y: u16 },
    /// Finger lifted
    Up { x: u16, y: u16 },
}

/// Three-point affine touch calibration
///
/// Maps raw controller coordinates to panel coordinates with
/// `x' = (a*x + b*y + c) / d` and `y' = (e*x + f*y + g) / d`, all in
/// integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    a: i64,
    b: i64,
    c: i64,
    e: i64,
    f: i64,
    g: i64,
    divider: i64,
}

impl Calibration {
    /// Solve the transform from three reference points
    ///
    /// `screen[i]` is where target `i` was drawn, `touch[i]` the raw sample
    /// read while touching it. Returns `None` if the touch points are
    /// collinear. Every product of `u16` coordinates fits in `i64`.
    pub fn from_points(screen: [(u16, u16); 3], touch: [(u16, u16); 3]) -> Option<Self> {
        let [(x0, y0), (x1, y1), (x2, y2)] = touch.map(|(x, y)| (x as i64, y as i64));
        let [(sx0, sy0), (sx1, sy1), (sx2, sy2)] = screen.map(|(x, y)| (x as i64, y as i64));

        let divider = (x0 - x2) * (y1 - y2) - (x1 - x2) * (y0 - y2);
        if divider == 0 {
            return None;
        }

        Some(Self {
            a: (sx0 - sx2) * (y1 - y2) - (sx1 - sx2) * (y0 - y2),
            b: (x0 - x2) * (sx1 - sx2) - (sx0 - sx2) * (x1 - x2),
            c: y0 * (x2 * sx1 - x1 * sx2) + y1 * (x0 * sx2 - x2 * sx0) + y2 * (x1 * sx0 - x0 * sx1),
            e: (sy0 - sy2) * (y1 - y2) - (sy1 - sy2) * (y0 - y2),
            f: (x0 - x2) * (sy1 - sy2) - (sy0 - sy2) * (x1 - x2),
            g: y0 * (x2 * sy1 - x1 * sy2) + y1 * (x0 * sy2 - x2 * sy0) + y2 * (x1 * sy0 - x0 * sy1),
            divider,
        })
    }

    /// Map a raw sample to panel coordinates, clamped to `u16`
    pub fn apply(&self, x: u16, y: u16) -> (u16, u16) {
        let (x, y) = (x as i64, y as i64);
        let clamp = |v: i64| v.clamp(0, u16::MAX as i64) as u16;
        (
            clamp((self.a * x + self.b * y + self.c) / self.divider),
            clamp((self.e * x + self.f * y + self.g) / self.divider),
        )
    }
}

/// Touch edge detector
///
/// Becomes a permanent no-op when the controller reports `Unsupported`, or
/// after `MAX_CONSECUTIVE_READ_ERRORS` failed reads in a row. Single read
/// errors just skip that poll.
pub struct TouchBridge<T> {
    driver: Option<T>,
    was_pressed: bool,
    read_errors: u8,
    calibration: Option<Calibration>,
}

impl<T: TouchDriver> TouchBridge<T> {
    /// Bridge polling `driver`
    pub fn new(driver: T) -> Self {
        Self {
            driver: Some(driver),
            was_pressed: false,
            read_errors: 0,
            calibration: None,
        }
    }

    /// Bridge for a board without touch
    pub fn inert() -> Self {
        Self {
            driver: None,
            was_pressed: false,
            read_errors: 0,
            calibration: None,
        }
    }

    /// Check if the bridge stopped polling for good
    pub fn is_inert(&self) -> bool {
        self.driver.is_none()
    }

    /// Last known press state
    pub fn is_pressed(&self) -> bool {
        self.was_pressed
    }

    /// Install or remove a calibration (None = raw coordinates)
    pub fn set_calibration(&mut self, calibration: Option<Calibration>) {
        self.calibration = calibration;
    }

    /// Read one sample and report the resulting event, if any
    pub fn poll(&mut self) -> Option<TouchEvent> {
        let driver = self.driver.as_mut()?;

        let sample = match driver.read_sample() {
            Ok(sample) => {
                self.read_errors = 0;
                sample
            }
            Err(TouchError::Unsupported) => {
                info!("Touch not supported on this board, polling disabled");
                self.driver = None;
                return None;
            }
            Err(TouchError::Bus) => {
                self.read_errors = self.read_errors.saturating_add(1);
                if self.read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                    warn!("Touch controller failed {} reads in a row, polling disabled", self.read_errors);
                    self.driver = None;
                }
                return None;
            }
        };

        let (x, y) = match &self.calibration {
            Some(calibration) => calibration.apply(sample.x, sample.y),
            None => (sample.x, sample.y),
        };

        match (self.was_pressed, sample.pressed) {
            (false, true) => {
                self.was_pressed = true;
                debug!("touch down [{}, {}]", x, y);
                Some(TouchEvent::Down { x, y })
            }
            (true, false) => {
                self.was_pressed = false;
                debug!("touch up [{}, {}]", x, y);
                Some(TouchEvent::Up { x, y })
            }
            (true, true) => Some(TouchEvent::Motion { x, y }),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use panelpipe_hal::TouchSample;
    use proptest::prelude::*;

    /// Replays a fixed list of read results
    struct ScriptedTouch {
        script: Vec<Result<TouchSample, TouchError>>,
        reads: usize,
    }

    impl ScriptedTouch {
        fn new(script: Vec<Result<TouchSample, TouchError>>) -> Self {
            Self { script, reads: 0 }
        }
    }

    impl TouchDriver for ScriptedTouch {
        fn read_sample(&mut self) -> Result<TouchSample, TouchError> {
            let result = self
                .script
                .get(self.reads)
                .copied()
                .unwrap_or(Ok(TouchSample::released()));
            self.reads += 1;
            result
        }
    }

    fn drain(bridge: &mut TouchBridge<ScriptedTouch>, polls: usize) -> Vec<TouchEvent> {
        (0..polls).filter_map(|_| bridge.poll()).collect()
    }

    #[test]
    fn test_press_move_release() {
        let mut bridge = TouchBridge::new(ScriptedTouch::new(alloc::vec![
            Ok(TouchSample::released()),
            Ok(TouchSample::pressed(10, 20)),
            Ok(TouchSample::pressed(11, 21)),
            Ok(TouchSample::released()),
        ]));

        let events = drain(&mut bridge, 4);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], TouchEvent::Down { x: 10, y: 20 });
        assert_eq!(events[1], TouchEvent::Motion { x: 11, y: 21 });
        assert!(matches!(events[2], TouchEvent::Up { .. }));
        assert!(!bridge.is_pressed());
    }

    #[test]
    fn test_idle_emits_nothing() {
        let mut bridge = TouchBridge::new(ScriptedTouch::new(alloc::vec![Ok(TouchSample::released()); 5]));
        assert!(drain(&mut bridge, 5).is_empty());
    }

    #[test]
    fn test_unsupported_goes_inert() {
        let mut bridge = TouchBridge::new(ScriptedTouch::new(alloc::vec![
            Err(TouchError::Unsupported),
            Ok(TouchSample::pressed(1, 1)),
        ]));

        assert_eq!(bridge.poll(), None);
        assert!(bridge.is_inert());
        assert_eq!(bridge.poll(), None);
    }

    #[test]
    fn test_single_bus_error_skips_poll() {
        let mut bridge = TouchBridge::new(ScriptedTouch::new(alloc::vec![
            Ok(TouchSample::pressed(5, 5)),
            Err(TouchError::Bus),
            Ok(TouchSample::pressed(6, 6)),
        ]));

        let events = drain(&mut bridge, 3);
        assert_eq!(
            events,
            alloc::vec![TouchEvent::Down { x: 5, y: 5 }, TouchEvent::Motion { x: 6, y: 6 }]
        );
        assert!(!bridge.is_inert());
    }

    #[test]
    fn test_persistent_bus_errors_go_inert() {
        let script = alloc::vec![Err(TouchError::Bus); MAX_CONSECUTIVE_READ_ERRORS as usize];
        let mut bridge = TouchBridge::new(ScriptedTouch::new(script));

        drain(&mut bridge, MAX_CONSECUTIVE_READ_ERRORS as usize - 1);
        assert!(!bridge.is_inert());
        bridge.poll();
        assert!(bridge.is_inert());
    }

    #[test]
    fn test_inert_bridge() {
        let mut bridge = TouchBridge::<ScriptedTouch>::inert();
        assert!(bridge.is_inert());
        assert_eq!(bridge.poll(), None);
    }

    #[test]
    fn test_calibration_scale_and_offset() {
        let calibration = Calibration::from_points(
            [(10, 10), (210, 10), (10, 210)],
            [(0, 0), (100, 0), (0, 100)],
        )
        .unwrap();
        assert_eq!(calibration.apply(50, 50), (110, 110));
        assert_eq!(calibration.apply(0, 0), (10, 10));
    }

    #[test]
    fn test_calibration_swapped_axes() {
        // Controller mounted with x and y exchanged
        let calibration = Calibration::from_points(
            [(0, 0), (0, 100), (100, 0)],
            [(0, 0), (100, 0), (0, 100)],
        )
        .unwrap();
        assert_eq!(calibration.apply(30, 70), (70, 30));
    }

    #[test]
    fn test_calibration_collinear_rejected() {
        let calibration = Calibration::from_points(
            [(0, 0), (1, 1), (2, 2)],
            [(0, 0), (10, 10), (20, 20)],
        );
        assert_eq!(calibration, None);
    }

    #[test]
    fn test_calibrated_events() {
        let mut bridge = TouchBridge::new(ScriptedTouch::new(alloc::vec![Ok(TouchSample::pressed(50, 50))]));
        bridge.set_calibration(Calibration::from_points(
            [(10, 10), (210, 10), (10, 210)],
            [(0, 0), (100, 0), (0, 100)],
        ));
        assert_eq!(bridge.poll(), Some(TouchEvent::Down { x: 110, y: 110 }));
    }

    #[test]
    fn test_calibration_extreme_points() {
        let corners = [(0, 0), (u16::MAX, 0), (0, u16::MAX)];
        let identity = Calibration::from_points(corners, corners).unwrap();
        assert_eq!(identity.apply(0, 0), (0, 0));
        assert_eq!(identity.apply(u16::MAX, u16::MAX), (u16::MAX, u16::MAX));

        // Full-range controller onto a small panel, mirrored in x
        let mirrored = Calibration::from_points([(319, 0), (0, 0), (319, 239)], corners).unwrap();
        assert_eq!(mirrored.apply(0, 0), (319, 0));
        assert_eq!(mirrored.apply(u16::MAX, u16::MAX), (0, 239));
    }

    proptest! {
        #[test]
        fn prop_identity_calibration_is_exact(
            points in proptest::array::uniform3((any::<u16>(), any::<u16>())),
            x in any::<u16>(),
            y in any::<u16>(),
        ) {
            if let Some(identity) = Calibration::from_points(points, points) {
                prop_assert_eq!(identity.apply(x, y), (x, y));
            }
        }
    }
}
