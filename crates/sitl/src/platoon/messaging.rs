//! Inter-vehicle platooning messages.
//!
//! Messages travel over an unbounded channel: sending never blocks and
//! never waits for an acknowledgement, matching the fire-and-forget
//! contract of [`PeerApplication`].

use std::fmt;

use platoon_core::{PeerApplication, VehicleId};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

/// Message exchanged between platoon members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatoonMessage {
    /// `vehicle` has left the platoon led by `leader`.
    Abandon { vehicle: VehicleId, leader: VehicleId },
}

impl fmt::Display for PlatoonMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatoonMessage::Abandon { vehicle, leader } => {
                write!(f, "ABANDON_PLATOON {vehicle} -> {leader}")
            }
        }
    }
}

/// Create a connected outbox/inbox pair for one platoon.
pub fn channel() -> (UnboundedSender<PlatoonMessage>, LeaderInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, LeaderInbox { rx })
}

/// Platooning application of a single vehicle.
#[derive(Debug, Clone)]
pub struct PlatoonApp {
    vehicle: VehicleId,
    leader: VehicleId,
    outbox: UnboundedSender<PlatoonMessage>,
    sent: u32,
}

impl PlatoonApp {
    pub fn new(vehicle: VehicleId, leader: VehicleId, outbox: UnboundedSender<PlatoonMessage>) -> Self {
        Self {
            vehicle,
            leader,
            outbox,
            sent: 0,
        }
    }

    /// Number of abandonment notifications handed to the channel.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Send the abandon message to the leader.
    pub fn send_abandon_message(&mut self) {
        let message = PlatoonMessage::Abandon {
            vehicle: self.vehicle,
            leader: self.leader,
        };
        match self.outbox.send(message) {
            Ok(()) => {
                self.sent += 1;
                info!(vehicle = %self.vehicle, leader = %self.leader, "abandon message sent");
            }
            Err(_) => warn!(vehicle = %self.vehicle, "leader unreachable, abandon message dropped"),
        }
    }
}

impl PeerApplication for PlatoonApp {
    fn notify_abandonment(&mut self) {
        self.send_abandon_message();
    }
}

/// Receiving end of the platoon channel, drained by the leader.
#[derive(Debug)]
pub struct LeaderInbox {
    rx: UnboundedReceiver<PlatoonMessage>,
}

impl LeaderInbox {
    /// Next queued message, if any.
    pub fn try_next(&mut self) -> Option<PlatoonMessage> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
