use platoon_core::{ControlLaw, ControllerState, TimedEvent, VehicleId, VehicleRole};
use platoon_sitl::{
    EventQueue, PlatoonMessage, RadarConfig, ScenarioConfig, Simulation, SimulationError,
};

const LEADER: VehicleId = VehicleId(0);
const TAIL: VehicleId = VehicleId(3);

fn reference() -> Simulation {
    Simulation::from_config(ScenarioConfig::default()).unwrap()
}

#[test]
fn only_tail_arms_braking() {
    let sim = reference();
    assert_eq!(sim.controller_state(LEADER), Some(ControllerState::Cruising));
    assert_eq!(sim.controller_state(VehicleId(1)), Some(ControllerState::Cruising));
    assert_eq!(sim.controller_state(VehicleId(2)), Some(ControllerState::Cruising));
    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::BrakingArmed));

    assert_eq!(sim.pending_events(LEADER), 0);
    assert_eq!(sim.pending_events(VehicleId(1)), 0);
    assert_eq!(sim.pending_events(TAIL), 1);

    assert_eq!(sim.controller(LEADER).unwrap().role(), Some(VehicleRole::Leader));
    assert_eq!(sim.controller(TAIL).unwrap().role(), Some(VehicleRole::Follower));
}

#[test]
fn speeds_follow_role_policy() {
    let sim = reference();
    let cruise = 100.0 / 3.6;
    let leader = sim.vehicle(LEADER).unwrap();
    let follower = sim.vehicle(VehicleId(2)).unwrap();
    assert_eq!(leader.controls.desired_speed_mps, cruise);
    assert_eq!(follower.controls.desired_speed_mps, cruise + 10.0);
}

#[test]
fn platoon_is_steady_before_braking() {
    let mut sim = reference();
    sim.run_until(9_990_000);

    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::BrakingArmed));
    let gap = sim.gap_to_front(TAIL).unwrap();
    assert!((gap - 5.0).abs() < 1e-6, "gap drifted to {gap}");
}

#[test]
fn braking_starts_at_ten_seconds() {
    let mut sim = reference();
    sim.run_until(10_010_000);

    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::DistancePolling));
    assert_eq!(sim.vehicle(TAIL).unwrap().controls.cacc_spacing_m, 15.0);
    assert_eq!(sim.controller(TAIL).unwrap().polls(), 0);
    assert_eq!(sim.pending_events(TAIL), 1);
}

#[test]
fn tail_abandons_once_gap_opens() {
    let mut sim = reference();
    let report = sim.run();

    let at_us = sim.abandoned_at_us(TAIL).expect("tail never abandoned");
    assert!(at_us > 10_100_000 && at_us < 30_000_000, "abandoned at {at_us}");
    assert_eq!((at_us - 10_000_000) % 100_000, 0);

    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::Abandoned));
    let tail = sim.vehicle(TAIL).unwrap();
    assert_eq!(tail.controls.law, ControlLaw::Autonomous { headway_s: 1.2 });
    assert_eq!(sim.pending_events(TAIL), 0);

    assert_eq!(
        sim.delivered_messages(),
        &[PlatoonMessage::Abandon {
            vehicle: TAIL,
            leader: LEADER,
        }]
    );
    assert_eq!(sim.formation(), vec![VehicleId(0), VehicleId(1), VehicleId(2)]);
    assert_eq!(report.abandonments, vec![(TAIL, at_us)]);

    // Headway control keeps opening the gap well past the braking spacing
    assert!(sim.gap_to_front(TAIL).unwrap() > 25.0);
    for id in 0..3 {
        assert_eq!(
            sim.controller_state(VehicleId(id)),
            Some(ControllerState::Cruising)
        );
    }
}

#[test]
fn abandonment_is_terminal() {
    let mut sim = reference();
    sim.run();
    let polls = sim.controller(TAIL).unwrap().polls();

    sim.run_until(60_000_000);

    assert_eq!(sim.controller(TAIL).unwrap().polls(), polls);
    assert_eq!(sim.delivered_messages().len(), 1);
    assert_eq!(sim.pending_events(TAIL), 0);
}

#[test]
fn noisy_radar_still_terminates() {
    let config = ScenarioConfig {
        radar: RadarConfig {
            noise_std_m: 0.2,
            seed: Some(11),
            ..RadarConfig::default()
        },
        ..ScenarioConfig::default()
    };
    let mut sim = Simulation::from_config(config).unwrap();
    sim.run();
    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::Abandoned));
    assert_eq!(sim.delivered_messages().len(), 1);
}

#[test]
fn radar_without_lock_keeps_polling() {
    let config = ScenarioConfig {
        radar: RadarConfig {
            range_m: 1.0,
            ..RadarConfig::default()
        },
        ..ScenarioConfig::default()
    };
    let mut sim = Simulation::from_config(config).unwrap();
    sim.run();

    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::DistancePolling));
    assert!(sim.controller(TAIL).unwrap().polls() > 100);
    assert_eq!(sim.pending_events(TAIL), 1);
    assert!(sim.delivered_messages().is_empty());
    assert_eq!(sim.formation().len(), 4);
}

#[test]
fn despawn_while_polling_cancels_events() {
    let mut sim = reference();
    sim.run_until(12_000_000);
    assert_eq!(sim.controller_state(TAIL), Some(ControllerState::DistancePolling));

    sim.despawn_vehicle(TAIL).unwrap();

    assert_eq!(sim.pending_events(TAIL), 0);
    assert_eq!(sim.controller_state(TAIL), None);
    assert!(sim.vehicle(TAIL).is_none());
    sim.run();
    assert_eq!(sim.abandoned_at_us(TAIL), None);
    assert!(sim.delivered_messages().is_empty());
}

#[test]
fn despawn_while_armed_cancels_braking() {
    let mut sim = reference();
    sim.despawn_vehicle(TAIL).unwrap();
    assert_eq!(sim.pending_events(TAIL), 0);
    assert_eq!(sim.formation().len(), 3);

    sim.run();
    for id in 0..3 {
        assert_eq!(
            sim.controller_state(VehicleId(id)),
            Some(ControllerState::Cruising)
        );
    }
}

#[test]
fn despawn_unknown_vehicle_errors() {
    let mut sim = reference();
    assert!(matches!(
        sim.despawn_vehicle(VehicleId(42)),
        Err(SimulationError::VehicleNotFound(VehicleId(42)))
    ));
}

#[test]
fn lone_leader_never_schedules() {
    let config = ScenarioConfig {
        platoon_size: 1,
        ..ScenarioConfig::default()
    };
    let mut sim = Simulation::from_config(config).unwrap();
    assert_eq!(sim.pending_events(LEADER), 0);
    sim.run();
    assert_eq!(sim.controller_state(LEADER), Some(ControllerState::Cruising));
}

#[test]
fn two_car_platoon_tail_is_first_follower() {
    let config = ScenarioConfig {
        platoon_size: 2,
        ..ScenarioConfig::default()
    };
    let mut sim = Simulation::from_config(config).unwrap();
    assert_eq!(
        sim.controller_state(VehicleId(1)),
        Some(ControllerState::BrakingArmed)
    );
    sim.run();
    assert_eq!(sim.formation(), vec![LEADER]);
}

#[test]
fn invalid_maneuver_aborts_startup() {
    let mut config = ScenarioConfig::default();
    config.maneuver.distance_threshold_m = 20.0;
    let result = Simulation::from_config(config);
    assert!(matches!(
        result,
        Err(SimulationError::Config { vehicle: VehicleId(0), .. })
    ));
}

#[test]
fn inverted_decel_limit_is_rejected_before_stepping() {
    let mut config = ScenarioConfig::default();
    config.vehicle.max_decel_mss = -5.0;
    assert!(matches!(
        Simulation::from_config(config),
        Err(SimulationError::InvalidScenario(_))
    ));

    let mut config = ScenarioConfig::default();
    config.vehicle.max_accel_mss = f64::NAN;
    assert!(matches!(
        Simulation::from_config(config),
        Err(SimulationError::InvalidScenario(_))
    ));
}

#[test]
fn empty_platoon_is_rejected() {
    let config = ScenarioConfig {
        platoon_size: 0,
        ..ScenarioConfig::default()
    };
    assert!(matches!(
        Simulation::from_config(config),
        Err(SimulationError::InvalidScenario(_))
    ));
}

#[test]
fn bundled_scenario_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/simple.toml");
    let config = ScenarioConfig::load(path).unwrap();
    assert_eq!(config.platoon_size, 4);
    assert_eq!(
        config.abandonment_params(),
        platoon_core::AbandonmentParams::default()
    );
}

#[test]
fn event_queue_drops_events_of_removed_vehicles() {
    let mut queue = EventQueue::new();
    queue.schedule(TAIL, 100, TimedEvent::CheckDistance);
    queue.cancel_all(TAIL);
    assert_eq!(queue.pop_due(u64::MAX), None);
}
