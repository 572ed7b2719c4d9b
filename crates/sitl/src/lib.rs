//! platoon_sitl - Software-in-the-loop harness for the abandonment controller
//!
//! Runs a single-lane platoon of simulated cars, each driven by its own
//! [`platoon_core::AbandonmentController`], on top of a discrete-event
//! queue. The harness supplies every collaborator the controller needs:
//!
//! - [`simulation::EventQueue`]: scheduling substrate
//! - [`vehicle::SimActuator`] / [`vehicle::SimRadar`]: vehicle control and sensing
//! - [`platoon::PositionHelper`]: formation directory
//! - [`platoon::PlatoonApp`]: messaging towards the platoon leader

pub mod error;
pub mod platoon;
pub mod scenario;
pub mod simulation;
pub mod vehicle;

pub use error::SimulationError;
pub use platoon::{FormationRegistry, PlatoonApp, PlatoonMessage, PositionHelper};
pub use scenario::{ManeuverConfig, ScenarioConfig};
pub use simulation::{EventQueue, Simulation, SimulationReport, TimeMode};
pub use vehicle::{RadarConfig, Road, SimVehicle, VehicleDynamicsConfig};
