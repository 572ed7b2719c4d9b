//! Platoon abandonment maneuver
//!
//! State machine run by the last vehicle of a platoon to leave it:
//! tighten the cooperative spacing, wait for the radar gap to open, then
//! hand longitudinal control over to autonomous headway keeping and tell
//! the leader.
//!
//! ```text
//!  Cruising ──(tail follower configured)──> BrakingArmed
//!  BrakingArmed ──StartBraking──> DistancePolling
//!  DistancePolling ──CheckDistance, gap <= threshold──> DistancePolling
//!  DistancePolling ──CheckDistance, gap > threshold──> Abandoned
//! ```
//!
//! The controller is driven entirely by [`TimedEvent`](crate::scheduler::TimedEvent)
//! deliveries from an [`EventScheduler`](crate::scheduler::EventScheduler).

pub mod controller;
pub mod error;
pub mod params;
pub mod state;

pub use controller::AbandonmentController;
pub use error::ConfigError;
pub use params::AbandonmentParams;
pub use state::ControllerState;
