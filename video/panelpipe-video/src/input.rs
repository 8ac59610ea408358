//! Input event queue
//!
//! The render loop drains the queue from `pump_events`. Producers (the
//! backend itself, or a separate touch polling task) only ever use
//! non-blocking sends; a full queue drops the event.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use panelpipe_core::{TouchBridge, TouchEvent};
use panelpipe_hal::TouchDriver;

/// Event queue capacity
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Event delivered to the rendering library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoEvent {
    /// Touch press, move or release
    Touch(TouchEvent),
    /// Window was moved
    WindowMoved { x: i32, y: i32 },
    /// Window was resized
    WindowResized { width: u16, height: u16 },
}

/// Queue shared between input producers and the render loop
pub type EventQueue = Channel<CriticalSectionRawMutex, VideoEvent, EVENT_QUEUE_DEPTH>;

/// Queue an event without blocking
///
/// Returns `false` if the queue was full and the event was dropped.
pub fn post_event(queue: &EventQueue, event: VideoEvent) -> bool {
    match queue.try_send(event) {
        Ok(()) => true,
        Err(_) => {
            warn!("Event queue full, dropping {:?}", event);
            false
        }
    }
}

/// Poll the touch controller every `period` and post its events
///
/// Runs until the bridge goes inert.
pub async fn touch_poll_loop<T: TouchDriver>(
    mut bridge: TouchBridge<T>,
    queue: &EventQueue,
    period: Duration,
) {
    info!("Touch poll loop started");

    let mut ticker = Ticker::every(period);

    while !bridge.is_inert() {
        if let Some(event) = bridge.poll() {
            post_event(queue, VideoEvent::Touch(event));
        }
        ticker.next().await;
    }

    info!("Touch poll loop stopped");
}
