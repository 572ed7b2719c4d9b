//! platoon_core - Pure no_std logic for the platoon abandonment maneuver
//!
//! This crate contains the tail-vehicle abandonment controller and the
//! narrow traits it uses to reach its collaborators. It can be tested on
//! host without any simulator or runtime.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Actuator, radar, messaging and scheduling are
//!   injected via traits
//! - **Event-driven**: The controller never blocks; it reacts to tagged
//!   timer events delivered by the caller's scheduler
//!
//! # Modules
//!
//! - [`abandonment`]: Abandonment controller, state, parameters and errors
//! - [`control`]: Vehicle actuator trait and control law types
//! - [`platoon`]: Formation, role and peer application types
//! - [`scheduler`]: Timed event tags and the scheduling substrate trait
//! - [`sensing`]: Radar sample type and distance sensor trait

#![no_std]

pub mod abandonment;
pub mod control;
pub mod platoon;
pub mod scheduler;
pub mod sensing;

pub use abandonment::{AbandonmentController, AbandonmentParams, ConfigError, ControllerState};
pub use control::{Color, ControlLaw, VehicleActuator};
pub use platoon::{
    FormationDirectory, PeerApplication, PlatoonFormation, PlatoonTopology, VehicleId,
    VehicleRole,
};
pub use scheduler::{EventScheduler, TimedEvent};
pub use sensing::{DistanceSample, DistanceSensor};
