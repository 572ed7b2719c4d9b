//! Abandonment Controller
//!
//! Platform-agnostic state machine run by every vehicle of a platoon. Only
//! the last-ranked follower ever leaves [`ControllerState::Cruising`]; for it
//! the controller arms a braking deadline, polls the radar until the gap to
//! the vehicle in front has opened, and then hands control over to the
//! autonomous headway controller.
//!
//! The controller does not know about the simulator, the radar model or
//! the messaging stack. It drives them through [`VehicleActuator`],
//! [`DistanceSensor`] and [`PeerApplication`], and is driven by
//! [`TimedEvent`] deliveries from an [`EventScheduler`] passed to each call.
//!
//! # Lifecycle
//!
//! 1. [`bind()`](AbandonmentController::bind) - attach the peer application
//! 2. [`configure()`](AbandonmentController::configure) - apply role policy
//!    once the platoon topology is known
//! 3. [`handle_event()`](AbandonmentController::handle_event) - one call per
//!    fired event
//! 4. [`teardown()`](AbandonmentController::teardown) - cancel outstanding
//!    events and drop the controller

use log::{debug, info, warn};

use crate::control::{Color, ControlLaw, VehicleActuator};
use crate::platoon::{PeerApplication, PlatoonTopology, VehicleRole};
use crate::scheduler::{us_to_secs, EventScheduler, TimedEvent};
use crate::sensing::DistanceSensor;

use super::error::ConfigError;
use super::params::AbandonmentParams;
use super::state::ControllerState;

/// Tail-vehicle abandonment controller
pub struct AbandonmentController<A, S, P> {
    actuator: A,
    sensor: S,
    peer: Option<P>,
    params: AbandonmentParams,
    /// Set by `configure()`; `None` until then
    role: Option<VehicleRole>,
    state: ControllerState,
    /// Number of distance checks performed
    polls: u32,
}

impl<A, S, P> AbandonmentController<A, S, P>
where
    A: VehicleActuator,
    S: DistanceSensor,
    P: PeerApplication,
{
    /// Create an unbound controller in `Cruising`
    pub fn new(actuator: A, sensor: S, params: AbandonmentParams) -> Self {
        Self {
            actuator,
            sensor,
            peer: None,
            params,
            role: None,
            state: ControllerState::Cruising,
            polls: 0,
        }
    }

    /// Get current controller state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Role applied at configuration (`None` before `configure()`)
    pub fn role(&self) -> Option<VehicleRole> {
        self.role
    }

    pub fn params(&self) -> &AbandonmentParams {
        &self.params
    }

    /// Number of radar polls performed so far
    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn peer(&self) -> Option<&P> {
        self.peer.as_ref()
    }

    /// First startup phase: attach the peer platooning application
    ///
    /// A missing peer is a topology error; it is reported, never retried.
    pub fn bind(&mut self, peer: Option<P>) -> Result<(), ConfigError> {
        let peer = peer.ok_or(ConfigError::PeerApplicationMissing)?;
        self.peer = Some(peer);
        Ok(())
    }

    /// Second startup phase: apply the role policy
    ///
    /// The leader cruises at the configured speed. Followers aim 10 m/s
    /// higher, and the tail follower additionally arms the braking deadline.
    ///
    /// Returns the state after configuration.
    pub fn configure(
        &mut self,
        topology: &PlatoonTopology,
        scheduler: &mut dyn EventScheduler,
    ) -> Result<ControllerState, ConfigError> {
        if self.peer.is_none() {
            return Err(ConfigError::NotBound);
        }
        if self.role.is_some() {
            return Err(ConfigError::AlreadyConfigured);
        }
        if topology.formation.is_empty() {
            return Err(ConfigError::EmptyFormation);
        }
        self.params.validate()?;

        self.role = Some(topology.role);
        match topology.role {
            VehicleRole::Leader => {
                let speed = self.params.cruise_speed_mps();
                self.actuator.set_cooperative_target_speed(speed);
                info!("{} leading at {:.2} m/s", topology.vehicle_id, speed);
            }
            VehicleRole::Follower => {
                let speed = self.params.follower_speed_mps();
                self.actuator.set_cooperative_target_speed(speed);

                if topology.is_tail() {
                    scheduler.schedule_at(self.params.braking_time_us, TimedEvent::StartBraking);
                    self.state = ControllerState::BrakingArmed;
                    info!(
                        "{} is platoon tail, braking at t={:.1}s",
                        topology.vehicle_id,
                        us_to_secs(self.params.braking_time_us)
                    );
                } else {
                    debug!("{} following at {:.2} m/s", topology.vehicle_id, speed);
                }
            }
        }

        Ok(self.state)
    }

    /// Handle a fired event and return the resulting state
    ///
    /// Events that are not valid in the current state are ignored.
    pub fn handle_event(
        &mut self,
        event: TimedEvent,
        scheduler: &mut dyn EventScheduler,
    ) -> ControllerState {
        match (self.state, event) {
            (ControllerState::BrakingArmed, TimedEvent::StartBraking) => {
                self.start_braking(scheduler)
            }
            (ControllerState::DistancePolling, TimedEvent::CheckDistance) => {
                self.check_distance(scheduler)
            }
            (state, event) => {
                warn!("Ignoring {} in state {}", event, state.name());
            }
        }
        self.state
    }

    /// Cancel any outstanding event and drop the controller
    ///
    /// Both tags are cancelled unconditionally, so no handler can be invoked
    /// for this controller afterwards whatever state it was in.
    pub fn teardown(self, scheduler: &mut dyn EventScheduler) {
        scheduler.cancel(TimedEvent::StartBraking);
        scheduler.cancel(TimedEvent::CheckDistance);
        debug!("Abandonment controller torn down in {}", self.state.name());
    }

    fn start_braking(&mut self, scheduler: &mut dyn EventScheduler) {
        self.actuator
            .set_cooperative_constant_spacing(self.params.braking_spacing_m);
        self.actuator.set_color(Color::BRAKING);

        self.state = ControllerState::DistancePolling;
        scheduler.schedule_after(self.params.poll_interval_us, TimedEvent::CheckDistance);
        info!(
            "Braking at t={:.2}s, spacing {:.1} m",
            us_to_secs(scheduler.now_us()),
            self.params.braking_spacing_m
        );
    }

    fn check_distance(&mut self, scheduler: &mut dyn EventScheduler) {
        let sample = self.sensor.sample();
        self.polls = self.polls.saturating_add(1);

        match sample.gap_m {
            Some(gap) => debug!("Leaving vehicle now at {:.3} m", gap),
            None => debug!("Leaving vehicle has no radar lock"),
        }

        if !sample.gap_exceeds(self.params.distance_threshold_m) {
            scheduler.schedule_after(self.params.poll_interval_us, TimedEvent::CheckDistance);
            return;
        }

        self.actuator.set_control_law(ControlLaw::Autonomous {
            headway_s: self.params.acc_headway_s,
        });
        self.actuator.set_color(Color::ABANDONED);
        if let Some(peer) = self.peer.as_mut() {
            peer.notify_abandonment();
        }

        self.state = ControllerState::Abandoned;
        info!(
            "Platoon abandoned at t={:.2}s after {} polls",
            us_to_secs(scheduler.now_us()),
            self.polls
        );
    }
}
