//! Property tests for the controller's polling loop, driven by the core
//! mock scheduler and scripted collaborators.

use platoon_core::scheduler::MockScheduler;
use platoon_core::{
    AbandonmentController, AbandonmentParams, ControlLaw, ControllerState, DistanceSample,
    DistanceSensor, EventScheduler, PeerApplication, PlatoonFormation, PlatoonTopology, TimedEvent,
    VehicleActuator, VehicleId, VehicleRole,
};
use proptest::prelude::*;

#[derive(Default)]
struct RecordingActuator {
    laws: Vec<ControlLaw>,
}

impl VehicleActuator for RecordingActuator {
    fn set_cooperative_target_speed(&mut self, _speed_mps: f64) {}

    fn set_cooperative_constant_spacing(&mut self, _spacing_m: f64) {}

    fn set_control_law(&mut self, law: ControlLaw) {
        self.laws.push(law);
    }
}

struct ScriptedRadar {
    gaps: Vec<Option<f64>>,
    next: usize,
}

impl DistanceSensor for ScriptedRadar {
    fn sample(&mut self) -> DistanceSample {
        let gap = self.gaps.get(self.next).copied().flatten();
        self.next += 1;
        DistanceSample {
            gap_m: gap,
            relative_speed_mps: None,
        }
    }
}

#[derive(Default)]
struct CountingPeer {
    notifications: u32,
}

impl PeerApplication for CountingPeer {
    fn notify_abandonment(&mut self) {
        self.notifications += 1;
    }
}

fn tail_topology(size: u32) -> PlatoonTopology {
    let formation: PlatoonFormation = (0..size).map(VehicleId).collect();
    PlatoonTopology::new(VehicleId(size - 1), VehicleRole::Follower, formation)
}

/// Gap readings rising from `start` in `steps`, with some readings missing.
fn rising_gaps() -> impl Strategy<Value = Vec<Option<f64>>> {
    (
        0.0f64..14.0,
        prop::collection::vec((0.01f64..2.0, any::<bool>()), 1..60),
    )
        .prop_map(|(start, steps)| {
            let mut gap = start;
            let mut gaps = Vec::with_capacity(steps.len() + 1);
            for (delta, lost) in steps {
                gaps.push(if lost { None } else { Some(gap) });
                gap += delta;
            }
            // Always end above the threshold
            gaps.push(Some(gap.max(15.0)));
            gaps
        })
}

proptest! {
    #[test]
    fn rising_gap_always_abandons_once(gaps in rising_gaps(), size in 2u32..8) {
        let expected_polls = gaps
            .iter()
            .position(|g| matches!(g, Some(gap) if *gap > 14.9))
            .unwrap() as u32
            + 1;

        let mut scheduler = MockScheduler::new();
        let mut controller = AbandonmentController::new(
            RecordingActuator::default(),
            ScriptedRadar { gaps, next: 0 },
            AbandonmentParams::default(),
        );
        controller.bind(Some(CountingPeer::default())).unwrap();
        controller.configure(&tail_topology(size), &mut scheduler).unwrap();

        while let Some((_, event)) = scheduler.fire_next() {
            controller.handle_event(event, &mut scheduler);
            prop_assert!(scheduler.pending().len() <= 1);
        }

        prop_assert_eq!(controller.state(), ControllerState::Abandoned);
        prop_assert_eq!(controller.polls(), expected_polls);
        prop_assert_eq!(
            scheduler.now_us(),
            10_000_000 + 100_000 * u64::from(expected_polls)
        );
        prop_assert_eq!(controller.peer().unwrap().notifications, 1);
        prop_assert_eq!(
            controller.actuator().laws.as_slice(),
            &[ControlLaw::Autonomous { headway_s: 1.2 }]
        );

        // Terminal: further deliveries change nothing
        controller.handle_event(TimedEvent::CheckDistance, &mut scheduler);
        prop_assert_eq!(controller.state(), ControllerState::Abandoned);
        prop_assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn gaps_at_or_below_threshold_never_abandon(
        gaps in prop::collection::vec(prop::option::of(0.0f64..=14.9), 1..80)
    ) {
        let polls = gaps.len() as u32;
        let mut scheduler = MockScheduler::new();
        let mut controller = AbandonmentController::new(
            RecordingActuator::default(),
            ScriptedRadar { gaps, next: 0 },
            AbandonmentParams::default(),
        );
        controller.bind(Some(CountingPeer::default())).unwrap();
        controller.configure(&tail_topology(3), &mut scheduler).unwrap();

        // StartBraking, then one CheckDistance per scripted reading
        for _ in 0..=polls {
            let (_, event) = scheduler.fire_next().unwrap();
            controller.handle_event(event, &mut scheduler);
        }

        prop_assert_eq!(controller.state(), ControllerState::DistancePolling);
        prop_assert_eq!(controller.polls(), polls);
        prop_assert!(scheduler.is_pending(TimedEvent::CheckDistance));
        prop_assert_eq!(controller.peer().unwrap().notifications, 0);
        prop_assert!(controller.actuator().laws.is_empty());
    }

    #[test]
    fn teardown_leaves_nothing_scheduled(fired in 0usize..20, tail in any::<bool>()) {
        let mut scheduler = MockScheduler::new();
        let mut controller = AbandonmentController::new(
            RecordingActuator::default(),
            ScriptedRadar { gaps: vec![Some(1.0); 32], next: 0 },
            AbandonmentParams::default(),
        );
        controller.bind(Some(CountingPeer::default())).unwrap();
        let topology = if tail {
            tail_topology(4)
        } else {
            PlatoonTopology::new(VehicleId(1), VehicleRole::Follower, tail_topology(4).formation)
        };
        controller.configure(&topology, &mut scheduler).unwrap();

        for _ in 0..fired {
            match scheduler.fire_next() {
                Some((_, event)) => {
                    controller.handle_event(event, &mut scheduler);
                }
                None => break,
            }
        }

        controller.teardown(&mut scheduler);
        prop_assert!(scheduler.pending().is_empty());
        prop_assert_eq!(scheduler.fire_next(), None);
    }
}
