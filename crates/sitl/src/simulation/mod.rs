pub mod queue;
pub mod report;
pub mod time;

use std::collections::BTreeMap;

use platoon_core::{
    AbandonmentController, AbandonmentParams, ControllerState, PlatoonTopology, VehicleId,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

pub use queue::{EventQueue, ScheduledEvent, VehicleScheduler};
pub use report::{SimulationReport, VehicleReport};
pub use time::TimeMode;

use crate::error::SimulationError;
use crate::platoon::{
    messaging, FormationRegistry, LeaderInbox, PlatoonApp, PlatoonMessage, PositionHelper,
    SharedRegistry,
};
use crate::scenario::ScenarioConfig;
use crate::vehicle::{Road, SimActuator, SimRadar, SimVehicle};

/// Controller type driven by the simulation.
pub type SimController = AbandonmentController<SimActuator, SimRadar, PlatoonApp>;

/// Platoon simulation orchestrator.
///
/// Owns the road, the event queue and one abandonment controller per
/// vehicle. Each [`step()`](Simulation::step) fires the events due at the
/// current time, delivers platoon messages to the leader and then advances
/// the vehicle dynamics by one physics step.
pub struct Simulation {
    config: ScenarioConfig,
    params: AbandonmentParams,
    road: Road,
    registry: SharedRegistry,
    queue: EventQueue,
    controllers: BTreeMap<VehicleId, SimController>,
    outbox: UnboundedSender<PlatoonMessage>,
    inbox: LeaderInbox,
    delivered: Vec<PlatoonMessage>,
    abandonments: BTreeMap<VehicleId, u64>,
}

impl Simulation {
    /// Build the platoon described by `config` and start every controller.
    pub fn from_config(config: ScenarioConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let ids: Vec<VehicleId> = (0..config.platoon_size as u32).map(VehicleId).collect();
        let (outbox, inbox) = messaging::channel();
        let mut sim = Self {
            params: config.abandonment_params(),
            road: Road::new(),
            registry: FormationRegistry::shared(ids.clone()),
            queue: EventQueue::new(),
            controllers: BTreeMap::new(),
            outbox,
            inbox,
            delivered: Vec::new(),
            abandonments: BTreeMap::new(),
            config,
        };

        let speed_mps = sim.params.cruise_speed_mps();
        let pitch_m = sim.config.vehicle.length_m + sim.config.initial_gap_m;
        let front_m = pitch_m * (ids.len() - 1) as f64;
        for (rank, id) in ids.iter().enumerate() {
            let position_m = front_m - pitch_m * rank as f64;
            let vehicle = SimVehicle::new(*id, position_m, speed_mps, sim.config.vehicle.clone());
            if !sim.road.insert(vehicle) {
                return Err(SimulationError::VehicleAlreadyExists(*id));
            }
        }

        sim.start_controllers(&ids)?;
        info!(
            vehicles = ids.len(),
            speed_kmh = sim.params.leader_speed_kmh,
            "platoon ready"
        );
        Ok(sim)
    }

    /// Two-phase controller bring-up.
    ///
    /// Every controller is bound to its platooning application before any
    /// of them is configured, so configuration always sees the complete
    /// formation.
    fn start_controllers(&mut self, ids: &[VehicleId]) -> Result<(), SimulationError> {
        let mut bound = Vec::with_capacity(ids.len());
        for &id in ids {
            let helper = PositionHelper::new(id, self.registry.clone());
            let leader = helper.leader().ok_or_else(|| {
                SimulationError::InvalidScenario("platoon has no leader".to_string())
            })?;

            let mut controller = AbandonmentController::new(
                SimActuator::new(id, self.road.clone()),
                SimRadar::new(id, self.road.clone(), self.config.radar.clone()),
                self.params,
            );
            let app = PlatoonApp::new(id, leader, self.outbox.clone());
            controller
                .bind(Some(app))
                .map_err(|source| SimulationError::Config { vehicle: id, source })?;
            bound.push((helper, controller));
        }

        for (helper, mut controller) in bound {
            let topology = PlatoonTopology::from_directory(&helper);
            let id = topology.vehicle_id;
            let mut scheduler = VehicleScheduler::new(&mut self.queue, id);
            let state = controller
                .configure(&topology, &mut scheduler)
                .map_err(|source| SimulationError::Config { vehicle: id, source })?;
            debug!(vehicle = %id, rank = ?topology.rank(), state = state.name(), "controller configured");
            self.controllers.insert(id, controller);
        }
        Ok(())
    }

    /// Remove a vehicle, tearing its controller down first.
    pub fn despawn_vehicle(&mut self, id: VehicleId) -> Result<(), SimulationError> {
        let controller = self
            .controllers
            .remove(&id)
            .ok_or(SimulationError::VehicleNotFound(id))?;
        let state = controller.state();
        if state.is_maneuvering() {
            warn!(vehicle = %id, state = state.name(), "despawning vehicle mid-maneuver");
        }
        controller.teardown(&mut VehicleScheduler::new(&mut self.queue, id));

        let leftover = self.queue.cancel_all(id);
        if leftover > 0 {
            warn!(vehicle = %id, leftover, "purged events left behind by teardown");
        }
        self.road.remove(id);
        self.registry.borrow_mut().remove(id);
        info!(vehicle = %id, state = state.name(), "vehicle despawned");
        Ok(())
    }

    /// Advance the simulation by one physics step.
    pub fn step(&mut self) {
        let now_us = self.queue.now_us();
        while let Some(due) = self.queue.pop_due(now_us) {
            self.dispatch(due);
        }
        self.deliver_messages();

        let step_us = self.config.step_us();
        self.road.step(step_us as f64 / 1e6);
        self.queue.advance_to(now_us + step_us);
    }

    /// Step until the simulation clock reaches `end_us`.
    pub fn run_until(&mut self, end_us: u64) {
        while self.queue.now_us() < end_us {
            self.step();
        }
    }

    /// Run the configured scenario duration.
    pub fn run(&mut self) -> SimulationReport {
        self.run_until(self.config.duration_us());
        self.report()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.now_us() >= self.config.duration_us()
    }

    fn dispatch(&mut self, due: ScheduledEvent) {
        let Some(controller) = self.controllers.get_mut(&due.vehicle) else {
            warn!(vehicle = %due.vehicle, event = %due.event, "event for unknown vehicle dropped");
            return;
        };
        let mut scheduler = VehicleScheduler::new(&mut self.queue, due.vehicle);
        let state = controller.handle_event(due.event, &mut scheduler);
        if state.is_terminal() {
            self.abandonments.entry(due.vehicle).or_insert(due.at_us);
        }
    }

    /// Leader side of the platooning application.
    fn deliver_messages(&mut self) {
        while let Some(message) = self.inbox.try_next() {
            match message {
                PlatoonMessage::Abandon { vehicle, leader } => {
                    if self.registry.borrow_mut().remove(vehicle) {
                        info!(%vehicle, %leader, "leader removed vehicle from formation");
                    } else {
                        warn!(%vehicle, %leader, "abandon message for vehicle not in formation");
                    }
                }
            }
            self.delivered.push(message);
        }
    }

    // -- Inspection --

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Current simulation time in microseconds.
    pub fn now_us(&self) -> u64 {
        self.queue.now_us()
    }

    pub fn step_us(&self) -> u64 {
        self.config.step_us()
    }

    pub fn controller_state(&self, id: VehicleId) -> Option<ControllerState> {
        self.controllers.get(&id).map(|c| c.state())
    }

    pub fn controller(&self, id: VehicleId) -> Option<&SimController> {
        self.controllers.get(&id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<SimVehicle> {
        self.road.snapshot(id)
    }

    /// Ground-truth gap to the vehicle in front.
    pub fn gap_to_front(&self, id: VehicleId) -> Option<f64> {
        self.road.front_of(id).map(|front| front.gap_m)
    }

    /// Current platoon membership as seen by the leader.
    pub fn formation(&self) -> Vec<VehicleId> {
        self.registry.borrow().members().to_vec()
    }

    /// Number of live events addressed to `id`.
    pub fn pending_events(&self, id: VehicleId) -> usize {
        self.queue.pending_for(id)
    }

    /// Messages received by the leader so far.
    pub fn delivered_messages(&self) -> &[PlatoonMessage] {
        &self.delivered
    }

    /// Time at which `id` left the platoon.
    pub fn abandoned_at_us(&self, id: VehicleId) -> Option<u64> {
        self.abandonments.get(&id).copied()
    }

    pub fn report(&self) -> SimulationReport {
        let vehicles = self
            .controllers
            .iter()
            .filter_map(|(id, controller)| {
                let vehicle = self.road.snapshot(*id)?;
                Some(VehicleReport {
                    id: *id,
                    role: controller.role(),
                    state: controller.state(),
                    position_m: vehicle.position_m,
                    speed_mps: vehicle.speed_mps,
                    gap_m: self.gap_to_front(*id),
                    law: vehicle.controls.law,
                    polls: controller.polls(),
                })
            })
            .collect();

        SimulationReport {
            end_time_us: self.now_us(),
            vehicles,
            abandonments: self.abandonments.iter().map(|(id, at)| (*id, *at)).collect(),
            messages: self.delivered.clone(),
            formation: self.formation(),
        }
    }
}
