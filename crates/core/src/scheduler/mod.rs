//! Discrete-event scheduling abstraction
//!
//! The controller never owns a clock or a timer. It asks an
//! [`EventScheduler`] to deliver a [`TimedEvent`] back to it at some
//! simulation time, and the scheduling substrate calls the controller's
//! handler with that tag once the time is reached.
//!
//! Simulation time is an integer count of microseconds so that deadlines
//! like "10 s" and "+0.1 s" are exact.
//!
//! # Components
//!
//! - [`TimedEvent`]: tag identifying which self-event fired
//! - [`EventScheduler`]: the substrate contract
//! - [`MockScheduler`]: controllable scheduler for host testing

use core::fmt;

use heapless::Vec;

/// Microseconds per simulated second
pub const US_PER_SECOND: u64 = 1_000_000;

/// Convert seconds to simulation microseconds (negative values clamp to 0)
pub fn secs_to_us(secs: f64) -> u64 {
    if secs <= 0.0 {
        return 0;
    }
    (secs * US_PER_SECOND as f64 + 0.5) as u64
}

/// Convert simulation microseconds to seconds
pub fn us_to_secs(us: u64) -> f64 {
    us as f64 / US_PER_SECOND as f64
}

/// Self-addressed events of the abandonment controller
///
/// At most one instance of each tag is outstanding at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimedEvent {
    /// Tighten the cooperative spacing and begin polling the radar
    StartBraking,
    /// Read the radar and decide whether the gap is wide enough
    CheckDistance,
}

impl TimedEvent {
    /// Event name for logging and telemetry
    pub const fn name(&self) -> &'static str {
        match self {
            TimedEvent::StartBraking => "start_braking",
            TimedEvent::CheckDistance => "check_distance",
        }
    }
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduling substrate used by the controller
///
/// Implementations must deliver events in nondecreasing time order and must
/// never run a handler concurrently with another handler of the same
/// controller.
///
/// Scheduling a tag that is already pending replaces the pending instance.
/// Cancelling a tag that is not pending is a no-op.
pub trait EventScheduler {
    /// Current simulation time in microseconds
    fn now_us(&self) -> u64;

    /// Deliver `event` at absolute time `at_us`
    ///
    /// A deadline in the past is delivered at the current time.
    fn schedule_at(&mut self, at_us: u64, event: TimedEvent);

    /// Cancel the pending instance of `event`, if any
    fn cancel(&mut self, event: TimedEvent);

    /// Deliver `event` `delay_us` microseconds from now
    fn schedule_after(&mut self, delay_us: u64, event: TimedEvent) {
        let at_us = self.now_us().saturating_add(delay_us);
        self.schedule_at(at_us, event);
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Scheduler with manually driven time, for host tests
///
/// # Example
///
/// ```
/// use platoon_core::scheduler::{EventScheduler, MockScheduler, TimedEvent};
///
/// let mut scheduler = MockScheduler::new();
/// scheduler.schedule_after(100_000, TimedEvent::CheckDistance);
///
/// let (at_us, event) = scheduler.fire_next().unwrap();
/// assert_eq!(at_us, 100_000);
/// assert_eq!(event, TimedEvent::CheckDistance);
/// assert_eq!(scheduler.now_us(), 100_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockScheduler {
    now_us: u64,
    pending: Vec<(u64, TimedEvent), 2>,
    scheduled_total: u32,
    cancelled_total: u32,
}

impl MockScheduler {
    /// Create a scheduler at time 0 with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler starting at `now_us`
    pub fn with_initial(now_us: u64) -> Self {
        Self {
            now_us,
            ..Self::default()
        }
    }

    /// Pending events as `(deadline_us, event)` pairs
    pub fn pending(&self) -> &[(u64, TimedEvent)] {
        &self.pending
    }

    /// Deadline of `event` if it is pending
    pub fn deadline(&self, event: TimedEvent) -> Option<u64> {
        self.pending
            .iter()
            .find(|(_, e)| *e == event)
            .map(|(at, _)| *at)
    }

    /// Check whether `event` is pending
    pub fn is_pending(&self, event: TimedEvent) -> bool {
        self.deadline(event).is_some()
    }

    /// Number of `schedule_at` calls observed
    pub fn scheduled_total(&self) -> u32 {
        self.scheduled_total
    }

    /// Number of `cancel` calls that removed a pending event
    pub fn cancelled_total(&self) -> u32 {
        self.cancelled_total
    }

    /// Remove the earliest pending event and advance the clock to it
    pub fn fire_next(&mut self) -> Option<(u64, TimedEvent)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (at, _))| *at)
            .map(|(i, _)| i)?;
        let (at_us, event) = self.pending.swap_remove(index);
        self.now_us = self.now_us.max(at_us);
        Some((at_us, event))
    }

    fn remove(&mut self, event: TimedEvent) -> bool {
        match self.pending.iter().position(|(_, e)| *e == event) {
            Some(index) => {
                self.pending.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

impl EventScheduler for MockScheduler {
    fn now_us(&self) -> u64 {
        self.now_us
    }

    fn schedule_at(&mut self, at_us: u64, event: TimedEvent) {
        self.remove(event);
        // Capacity equals the number of tags, so this cannot overflow
        let _ = self.pending.push((at_us.max(self.now_us), event));
        self.scheduled_total = self.scheduled_total.saturating_add(1);
    }

    fn cancel(&mut self, event: TimedEvent) {
        if self.remove(event) {
            self.cancelled_total = self.cancelled_total.saturating_add(1);
        }
    }
}
