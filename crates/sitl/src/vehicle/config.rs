use serde::Deserialize;

use crate::error::SimulationError;

/// Longitudinal dynamics and low-level controller gains of a simulated car.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VehicleDynamicsConfig {
    /// Vehicle length in meters.
    pub length_m: f64,
    /// Maximum acceleration in m/s².
    pub max_accel_mss: f64,
    /// Maximum deceleration in m/s² (positive number).
    pub max_decel_mss: f64,
    /// Proportional gain of the cruise controller (1/s).
    pub cruise_gain: f64,
    /// Spacing error gain of the cooperative controller (1/s²).
    pub cacc_spacing_gain: f64,
    /// Relative speed gain of the cooperative controller (1/s).
    pub cacc_speed_gain: f64,
    /// Default constant spacing of the cooperative controller in meters.
    pub cacc_spacing_m: f64,
    /// Gap error gain of the autonomous controller (1/s²).
    pub acc_gap_gain: f64,
    /// Relative speed gain of the autonomous controller (1/s).
    pub acc_speed_gain: f64,
    /// Standstill distance kept by the autonomous controller in meters.
    pub acc_standstill_m: f64,
}

impl Default for VehicleDynamicsConfig {
    fn default() -> Self {
        Self {
            length_m: 4.0,
            max_accel_mss: 2.5,
            max_decel_mss: 9.0,
            cruise_gain: 0.5,
            cacc_spacing_gain: 0.5,
            cacc_speed_gain: 1.4,
            cacc_spacing_m: 5.0,
            acc_gap_gain: 0.23,
            acc_speed_gain: 0.7,
            acc_standstill_m: 2.0,
        }
    }
}

impl VehicleDynamicsConfig {
    /// Reject limits and gains the dynamics model cannot run with.
    ///
    /// Acceleration limits must be strictly positive so the clamp range in
    /// [`SimVehicle::desired_accel`](super::SimVehicle::desired_accel) is
    /// never empty.
    pub fn validate(&self) -> Result<(), SimulationError> {
        positive("vehicle.length_m", self.length_m)?;
        positive("vehicle.max_accel_mss", self.max_accel_mss)?;
        positive("vehicle.max_decel_mss", self.max_decel_mss)?;

        let non_negative = [
            ("vehicle.cruise_gain", self.cruise_gain),
            ("vehicle.cacc_spacing_gain", self.cacc_spacing_gain),
            ("vehicle.cacc_speed_gain", self.cacc_speed_gain),
            ("vehicle.cacc_spacing_m", self.cacc_spacing_m),
            ("vehicle.acc_gap_gain", self.acc_gap_gain),
            ("vehicle.acc_speed_gain", self.acc_speed_gain),
            ("vehicle.acc_standstill_m", self.acc_standstill_m),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidScenario(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimulationError::InvalidScenario(format!(
            "{name} must be finite and positive, got {value}"
        )));
    }
    Ok(())
}
