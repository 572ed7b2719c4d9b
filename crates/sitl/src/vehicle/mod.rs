//! Simulated vehicles.
//!
//! Point-mass longitudinal model with three low-level controllers: cruise
//! control for the leader, constant-spacing CACC for platoon members and
//! headway-time ACC once a vehicle drives on its own.

pub mod actuator;
pub mod config;
pub mod radar;
pub mod road;

pub use actuator::SimActuator;
pub use config::VehicleDynamicsConfig;
pub use radar::{RadarConfig, SimRadar};
pub use road::Road;

use platoon_core::{Color, ControlLaw, VehicleId};

/// Commands currently applied to a vehicle's control stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleControls {
    /// Desired cruising speed in m/s.
    pub desired_speed_mps: f64,
    /// Constant spacing of the cooperative controller in meters.
    pub cacc_spacing_m: f64,
    /// Active control law.
    pub law: ControlLaw,
    /// Visual feedback color.
    pub color: Color,
}

/// What a vehicle knows about the car directly in front of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontInfo {
    /// Bumper-to-bumper gap in meters.
    pub gap_m: f64,
    /// Speed of the front vehicle in m/s.
    pub speed_mps: f64,
    /// Acceleration of the front vehicle in m/s².
    pub accel_mss: f64,
}

/// A simulated car on a single lane.
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    /// Front bumper position along the lane in meters.
    pub position_m: f64,
    /// Forward speed in m/s.
    pub speed_mps: f64,
    /// Last applied acceleration in m/s².
    pub accel_mss: f64,
    pub controls: VehicleControls,
    pub dynamics: VehicleDynamicsConfig,
}

impl SimVehicle {
    /// Place a vehicle on the lane, cruising cooperatively at `speed_mps`.
    pub fn new(
        id: VehicleId,
        position_m: f64,
        speed_mps: f64,
        dynamics: VehicleDynamicsConfig,
    ) -> Self {
        let controls = VehicleControls {
            desired_speed_mps: speed_mps,
            cacc_spacing_m: dynamics.cacc_spacing_m,
            law: ControlLaw::Cooperative,
            color: Color::rgb(255, 255, 255),
        };
        Self {
            id,
            position_m,
            speed_mps,
            accel_mss: 0.0,
            controls,
            dynamics,
        }
    }

    /// Rear bumper position in meters.
    pub fn rear_m(&self) -> f64 {
        self.position_m - self.dynamics.length_m
    }

    /// Acceleration requested by the active control law.
    ///
    /// The gap-keeping term never lets the car exceed its cruise speed: the
    /// smaller of the cruise and following accelerations wins.
    pub fn desired_accel(&self, front: Option<FrontInfo>) -> f64 {
        let d = &self.dynamics;
        let cruise = d.cruise_gain * (self.controls.desired_speed_mps - self.speed_mps);

        let following = front.map(|front| {
            let rel_speed = front.speed_mps - self.speed_mps;
            match self.controls.law {
                ControlLaw::Cooperative => {
                    let spacing_error = front.gap_m - self.controls.cacc_spacing_m;
                    d.cacc_spacing_gain * spacing_error
                        + d.cacc_speed_gain * rel_speed
                        + front.accel_mss
                }
                ControlLaw::Autonomous { headway_s } => {
                    let desired_gap = d.acc_standstill_m + headway_s * self.speed_mps;
                    d.acc_gap_gain * (front.gap_m - desired_gap) + d.acc_speed_gain * rel_speed
                }
            }
        });

        let accel = match following {
            Some(following) => cruise.min(following),
            None => cruise,
        };
        accel.clamp(-d.max_decel_mss, d.max_accel_mss)
    }

    /// Integrate one time step with the given acceleration.
    pub fn integrate(&mut self, accel_mss: f64, dt_s: f64) {
        let speed = (self.speed_mps + accel_mss * dt_s).max(0.0);
        self.accel_mss = (speed - self.speed_mps) / dt_s;
        self.position_m += 0.5 * (self.speed_mps + speed) * dt_s;
        self.speed_mps = speed;
    }
}
