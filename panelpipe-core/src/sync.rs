//! Transfer completion signal
//!
//! Bridges the panel's transfer-done interrupt to the render loop. At most
//! one transfer is in flight: [`CompletionSignal::issue`] only succeeds from
//! `Idle`, and only consuming the completion returns the signal to `Idle`.
//!
//! ```text
//!          issue()              notify() [irq]
//!   Idle ─────────► Pending ─────────────────► Signaled
//!    ▲                 │                          │
//!    │   abandon()     │                          │
//!    ├─────────────────┘                          │
//!    │      wait_for_completion() / try_complete() │
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! The interrupt side is a single compare-exchange plus a signal raise.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use panelpipe_hal::CompletionSink;
use portable_atomic::{AtomicU32, AtomicU8, Ordering};

const IDLE: u8 = 0;
const PENDING: u8 = 1;
const SIGNALED: u8 = 2;

/// Transfer state as seen by the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferState {
    /// No transfer outstanding
    Idle,
    /// A transfer was issued and the hardware has not reported back
    Pending,
    /// The hardware reported completion; not yet consumed
    Signaled,
}

/// Completion signal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// A previous transfer has not been consumed yet
    TransferInFlight,
    /// Waited without an issued transfer
    NotPending,
    /// The hardware did not report completion within the timeout
    Stalled,
}

/// Single-slot transfer completion signal
pub struct CompletionSignal {
    state: AtomicU8,
    done: Signal<CriticalSectionRawMutex, ()>,
    issued: AtomicU32,
    completed: AtomicU32,
    spurious: AtomicU32,
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSignal {
    /// Create an idle signal
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
            done: Signal::new(),
            issued: AtomicU32::new(0),
            completed: AtomicU32::new(0),
            spurious: AtomicU32::new(0),
        }
    }

    /// Current state
    pub fn state(&self) -> TransferState {
        match self.state.load(Ordering::Acquire) {
            PENDING => TransferState::Pending,
            SIGNALED => TransferState::Signaled,
            _ => TransferState::Idle,
        }
    }

    /// Mark a transfer as issued
    ///
    /// Call before handing the buffer to the hardware, so a completion that
    /// fires immediately is not lost.
    pub fn issue(&self) -> Result<(), SyncError> {
        self.state
            .compare_exchange(IDLE, PENDING, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::TransferInFlight)?;
        self.done.reset();
        self.issued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Report hardware completion (interrupt context)
    ///
    /// Completions with nothing pending are counted and otherwise ignored.
    pub fn notify(&self) {
        match self
            .state
            .compare_exchange(PENDING, SIGNALED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => self.done.signal(()),
            Err(_) => {
                self.spurious.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Wait until the issued transfer completes
    ///
    /// On timeout the transfer stays `Pending`: the hardware may still own
    /// the buffer. A completion arriving later is picked up by
    /// [`reap_late`](Self::reap_late).
    pub async fn wait_for_completion(&self, timeout: Duration) -> Result<(), SyncError> {
        if self.state() == TransferState::Idle {
            return Err(SyncError::NotPending);
        }

        match with_timeout(timeout, self.done.wait()).await {
            Ok(()) if self.consume() => Ok(()),
            Ok(()) => Err(SyncError::NotPending),
            Err(_) => Err(SyncError::Stalled),
        }
    }

    /// Consume a completion without blocking
    ///
    /// Returns `Ok(true)` if the transfer completed and the signal is idle
    /// again, `Ok(false)` if it is still pending.
    pub fn try_complete(&self) -> Result<bool, SyncError> {
        match self.state() {
            TransferState::Idle => Err(SyncError::NotPending),
            TransferState::Pending => Ok(false),
            TransferState::Signaled => Ok(self.reap_late()),
        }
    }

    /// Consume a completion left over from a timed-out wait
    pub fn reap_late(&self) -> bool {
        if self
            .state
            .compare_exchange(SIGNALED, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.done.reset();
            self.completed.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Withdraw an issued transfer the hardware never accepted
    pub fn abandon(&self) -> bool {
        self.state
            .compare_exchange(PENDING, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Transfers issued so far
    pub fn issued_count(&self) -> u32 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Completions consumed so far
    pub fn completed_count(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Completions that arrived with nothing pending
    pub fn spurious_count(&self) -> u32 {
        self.spurious.load(Ordering::Relaxed)
    }

    fn consume(&self) -> bool {
        let consumed = self
            .state
            .compare_exchange(SIGNALED, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if consumed {
            self.completed.fetch_add(1, Ordering::Relaxed);
        }
        consumed
    }
}

impl CompletionSink for CompletionSignal {
    fn transfer_done(&self) {
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use proptest::prelude::*;

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[test]
    fn test_issue_notify_wait() {
        let signal = CompletionSignal::new();
        assert_eq!(signal.state(), TransferState::Idle);

        signal.issue().unwrap();
        assert_eq!(signal.state(), TransferState::Pending);

        signal.notify();
        assert_eq!(signal.state(), TransferState::Signaled);

        block_on(signal.wait_for_completion(TIMEOUT)).unwrap();
        assert_eq!(signal.state(), TransferState::Idle);
        assert_eq!(signal.issued_count(), 1);
        assert_eq!(signal.completed_count(), 1);
    }

    #[test]
    fn test_double_issue_rejected() {
        let signal = CompletionSignal::new();
        signal.issue().unwrap();
        assert_eq!(signal.issue(), Err(SyncError::TransferInFlight));

        // Still rejected after the hardware signals but before consumption
        signal.notify();
        assert_eq!(signal.issue(), Err(SyncError::TransferInFlight));
    }

    #[test]
    fn test_wait_without_issue() {
        let signal = CompletionSignal::new();
        assert_eq!(
            block_on(signal.wait_for_completion(TIMEOUT)),
            Err(SyncError::NotPending)
        );
    }

    #[test]
    fn test_spurious_notify_ignored() {
        let signal = CompletionSignal::new();
        signal.notify();
        assert_eq!(signal.state(), TransferState::Idle);
        assert_eq!(signal.spurious_count(), 1);

        // A stale notify must not satisfy the next wait
        signal.issue().unwrap();
        assert_eq!(signal.try_complete(), Ok(false));
    }

    #[test]
    fn test_stall_then_late_completion() {
        let signal = CompletionSignal::new();
        signal.issue().unwrap();

        let result = block_on(signal.wait_for_completion(Duration::from_millis(5)));
        assert_eq!(result, Err(SyncError::Stalled));
        assert_eq!(signal.state(), TransferState::Pending);

        signal.notify();
        assert!(signal.reap_late());
        assert_eq!(signal.state(), TransferState::Idle);
        signal.issue().unwrap();
    }

    #[test]
    fn test_abandon_only_from_pending() {
        let signal = CompletionSignal::new();
        assert!(!signal.abandon());
        signal.issue().unwrap();
        assert!(signal.abandon());
        assert_eq!(signal.state(), TransferState::Idle);
    }

    #[test]
    fn test_sink_raises_signal() {
        let signal = CompletionSignal::new();
        let sink: &dyn CompletionSink = &signal;
        signal.issue().unwrap();
        sink.transfer_done();
        assert_eq!(signal.try_complete(), Ok(true));
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Issue,
        Notify,
        TryComplete,
        Wait,
        Abandon,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Issue),
            Just(Op::Notify),
            Just(Op::TryComplete),
            Just(Op::Wait),
            Just(Op::Abandon),
        ]
    }

    proptest! {
        #[test]
        fn prop_never_two_transfers_in_flight(ops in proptest::collection::vec(op_strategy(), 0..200)) {
            let signal = CompletionSignal::new();
            // True between a successful issue and its consumption
            let mut in_flight = false;

            for op in ops {
                match op {
                    Op::Issue => {
                        let result = signal.issue();
                        prop_assert_eq!(result.is_ok(), !in_flight);
                        in_flight = true;
                    }
                    Op::Notify => signal.notify(),
                    Op::TryComplete => {
                        if let Ok(true) = signal.try_complete() {
                            prop_assert!(in_flight);
                            in_flight = false;
                        }
                    }
                    Op::Wait => {
                        let before = signal.state();
                        let result = block_on(signal.wait_for_completion(Duration::from_millis(1)));
                        match before {
                            TransferState::Idle => prop_assert_eq!(result, Err(SyncError::NotPending)),
                            TransferState::Pending => prop_assert_eq!(result, Err(SyncError::Stalled)),
                            TransferState::Signaled => {
                                prop_assert_eq!(result, Ok(()));
                                prop_assert!(in_flight);
                                in_flight = false;
                            }
                        }
                    }
                    Op::Abandon => {
                        if signal.abandon() {
                            in_flight = false;
                        }
                    }
                }
                prop_assert_eq!(signal.state() != TransferState::Idle, in_flight);
            }
        }
    }
}
