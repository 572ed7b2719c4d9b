//! Discrete-event queue shared by all controllers.
//!
//! Events are delivered in nondecreasing time order, FIFO among equal
//! times. Each `(vehicle, event)` key has at most one live entry:
//! rescheduling or cancelling a key leaves the old heap entry stale, and
//! stale entries are skipped when popped.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use platoon_core::{EventScheduler, TimedEvent, VehicleId};

/// An event popped from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub at_us: u64,
    pub vehicle: VehicleId,
    pub event: TimedEvent,
}

type Key = (VehicleId, TimedEvent);

/// Priority queue of timed events with keyed cancellation.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<(u64, u64, VehicleId, TimedEvent)>>,
    /// Sequence number of the live entry for each key
    live: HashMap<Key, u64>,
    next_seq: u64,
    now_us: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in microseconds.
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Move the clock forward. Time never goes backwards.
    pub fn advance_to(&mut self, at_us: u64) {
        self.now_us = self.now_us.max(at_us);
    }

    /// Schedule `event` for `vehicle`, replacing any pending instance.
    ///
    /// Deadlines in the past are moved to the current time.
    pub fn schedule(&mut self, vehicle: VehicleId, at_us: u64, event: TimedEvent) {
        let at_us = at_us.max(self.now_us);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert((vehicle, event), seq);
        self.heap.push(Reverse((at_us, seq, vehicle, event)));
    }

    /// Cancel the pending instance of `event` for `vehicle`.
    pub fn cancel(&mut self, vehicle: VehicleId, event: TimedEvent) -> bool {
        self.live.remove(&(vehicle, event)).is_some()
    }

    /// Cancel every pending event of `vehicle`. Returns how many were live.
    pub fn cancel_all(&mut self, vehicle: VehicleId) -> usize {
        let before = self.live.len();
        self.live.retain(|(v, _), _| *v != vehicle);
        before - self.live.len()
    }

    pub fn is_pending(&self, vehicle: VehicleId, event: TimedEvent) -> bool {
        self.live.contains_key(&(vehicle, event))
    }

    /// Number of live events.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of live events addressed to `vehicle`.
    pub fn pending_for(&self, vehicle: VehicleId) -> usize {
        self.live.keys().filter(|(v, _)| *v == vehicle).count()
    }

    /// Deadline of the earliest live event.
    pub fn peek_time(&mut self) -> Option<u64> {
        self.discard_stale();
        self.heap.peek().map(|Reverse((at_us, ..))| *at_us)
    }

    /// Pop the earliest live event due at or before `until_us`.
    ///
    /// The clock advances to the event's deadline.
    pub fn pop_due(&mut self, until_us: u64) -> Option<ScheduledEvent> {
        self.discard_stale();
        let Reverse((at_us, _, _, _)) = *self.heap.peek()?;
        if at_us > until_us {
            return None;
        }
        let Reverse((at_us, _, vehicle, event)) = self.heap.pop()?;
        self.live.remove(&(vehicle, event));
        self.advance_to(at_us);
        Some(ScheduledEvent {
            at_us,
            vehicle,
            event,
        })
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse((_, seq, vehicle, event))) = self.heap.peek() {
            if self.live.get(&(*vehicle, *event)) == Some(seq) {
                break;
            }
            self.heap.pop();
        }
    }
}

/// [`EventScheduler`] view of the queue for a single vehicle.
pub struct VehicleScheduler<'a> {
    queue: &'a mut EventQueue,
    vehicle: VehicleId,
}

impl<'a> VehicleScheduler<'a> {
    pub fn new(queue: &'a mut EventQueue, vehicle: VehicleId) -> Self {
        Self { queue, vehicle }
    }
}

impl EventScheduler for VehicleScheduler<'_> {
    fn now_us(&self) -> u64 {
        self.queue.now_us()
    }

    fn schedule_at(&mut self, at_us: u64, event: TimedEvent) {
        self.queue.schedule(self.vehicle, at_us, event);
    }

    fn cancel(&mut self, event: TimedEvent) {
        self.queue.cancel(self.vehicle, event);
    }
}
