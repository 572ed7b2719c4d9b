use platoon_core::{Color, ControlLaw, VehicleActuator, VehicleId};
use tracing::{debug, warn};

use super::road::Road;

/// Actuator writing controller commands into a vehicle on the road.
#[derive(Debug, Clone)]
pub struct SimActuator {
    id: VehicleId,
    road: Road,
}

impl SimActuator {
    pub fn new(id: VehicleId, road: Road) -> Self {
        Self { id, road }
    }

    fn apply(&mut self, command: &str, f: impl FnOnce(&mut super::VehicleControls)) {
        if self.road.with_vehicle(self.id, |v| f(&mut v.controls)).is_none() {
            warn!(vehicle = %self.id, command, "actuator command for vehicle not on the road");
        }
    }
}

impl VehicleActuator for SimActuator {
    fn set_cooperative_target_speed(&mut self, speed_mps: f64) {
        debug!(vehicle = %self.id, speed_mps, "cruise speed");
        self.apply("target_speed", |c| c.desired_speed_mps = speed_mps);
    }

    fn set_cooperative_constant_spacing(&mut self, spacing_m: f64) {
        debug!(vehicle = %self.id, spacing_m, "CACC spacing");
        self.apply("constant_spacing", |c| c.cacc_spacing_m = spacing_m);
    }

    fn set_control_law(&mut self, law: ControlLaw) {
        debug!(vehicle = %self.id, law = law.name(), "control law");
        self.apply("control_law", |c| c.law = law);
    }

    fn set_color(&mut self, color: Color) {
        self.apply("color", |c| c.color = color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{SimVehicle, VehicleDynamicsConfig};

    #[test]
    fn commands_reach_the_vehicle() {
        let road = Road::new();
        road.insert(SimVehicle::new(
            VehicleId(4),
            0.0,
            20.0,
            VehicleDynamicsConfig::default(),
        ));
        let mut actuator = SimActuator::new(VehicleId(4), road.clone());

        actuator.set_cooperative_target_speed(30.0);
        actuator.set_cooperative_constant_spacing(15.0);
        actuator.set_control_law(ControlLaw::Autonomous { headway_s: 1.2 });
        actuator.set_color(Color::ABANDONED);

        let controls = road.snapshot(VehicleId(4)).unwrap().controls;
        assert_eq!(controls.desired_speed_mps, 30.0);
        assert_eq!(controls.cacc_spacing_m, 15.0);
        assert_eq!(controls.law, ControlLaw::Autonomous { headway_s: 1.2 });
        assert_eq!(controls.color, Color::ABANDONED);
    }

    #[test]
    fn commands_for_missing_vehicle_are_dropped() {
        let mut actuator = SimActuator::new(VehicleId(4), Road::new());
        actuator.set_cooperative_target_speed(30.0);
    }
}
