//! Scenario configuration.
//!
//! A scenario is described in TOML. Every field has a default, so an empty
//! file runs the reference scenario: a four-car platoon at 100 km/h whose
//! tail leaves after t = 10 s.
//!
//! ```toml
//! platoon_size = 4
//! leader_speed_kmh = 100.0
//! duration_s = 40.0
//!
//! [radar]
//! noise_std_m = 0.05
//! seed = 7
//!
//! [maneuver]
//! braking_spacing_m = 15.0
//! distance_threshold_m = 14.9
//! ```

use std::path::Path;

use platoon_core::abandonment::params::{
    DEFAULT_ACC_HEADWAY_S, DEFAULT_BRAKING_SPACING_M, DEFAULT_DISTANCE_THRESHOLD_M,
    DEFAULT_FOLLOWER_SPEED_OFFSET_MPS, DEFAULT_LEADER_SPEED_KMH,
};
use platoon_core::platoon::MAX_PLATOON_SIZE;
use platoon_core::scheduler::secs_to_us;
use platoon_core::AbandonmentParams;
use serde::Deserialize;

use crate::error::SimulationError;
use crate::vehicle::{RadarConfig, VehicleDynamicsConfig};

/// Top-level scenario description.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Number of vehicles including the leader.
    pub platoon_size: usize,
    /// Platoon cruising speed in km/h; all vehicles start at this speed.
    pub leader_speed_kmh: f64,
    /// Simulated duration in seconds.
    pub duration_s: f64,
    /// Physics step in milliseconds.
    pub step_ms: u64,
    /// Initial bumper-to-bumper gap between consecutive vehicles in meters.
    pub initial_gap_m: f64,
    pub vehicle: VehicleDynamicsConfig,
    pub radar: RadarConfig,
    pub maneuver: ManeuverConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            platoon_size: 4,
            leader_speed_kmh: DEFAULT_LEADER_SPEED_KMH,
            duration_s: 40.0,
            step_ms: 10,
            initial_gap_m: 5.0,
            vehicle: VehicleDynamicsConfig::default(),
            radar: RadarConfig::default(),
            maneuver: ManeuverConfig::default(),
        }
    }
}

/// Abandonment maneuver overrides, in human-friendly units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManeuverConfig {
    pub follower_speed_offset_mps: f64,
    pub braking_time_s: f64,
    pub braking_spacing_m: f64,
    pub distance_threshold_m: f64,
    pub poll_interval_s: f64,
    pub acc_headway_s: f64,
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            follower_speed_offset_mps: DEFAULT_FOLLOWER_SPEED_OFFSET_MPS,
            braking_time_s: 10.0,
            braking_spacing_m: DEFAULT_BRAKING_SPACING_M,
            distance_threshold_m: DEFAULT_DISTANCE_THRESHOLD_M,
            poll_interval_s: 0.1,
            acc_headway_s: DEFAULT_ACC_HEADWAY_S,
        }
    }
}

impl ScenarioConfig {
    /// Parse a scenario from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SimulationError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a scenario from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Controller parameters derived from this scenario.
    pub fn abandonment_params(&self) -> AbandonmentParams {
        let m = &self.maneuver;
        AbandonmentParams {
            leader_speed_kmh: self.leader_speed_kmh,
            follower_speed_offset_mps: m.follower_speed_offset_mps,
            braking_time_us: secs_to_us(m.braking_time_s),
            braking_spacing_m: m.braking_spacing_m,
            distance_threshold_m: m.distance_threshold_m,
            poll_interval_us: secs_to_us(m.poll_interval_s),
            acc_headway_s: m.acc_headway_s,
        }
    }

    pub fn step_us(&self) -> u64 {
        self.step_ms * 1_000
    }

    pub fn duration_us(&self) -> u64 {
        secs_to_us(self.duration_s)
    }

    /// Check the harness-level settings.
    ///
    /// Controller parameters are validated by the controllers themselves
    /// at startup.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.platoon_size == 0 || self.platoon_size > MAX_PLATOON_SIZE {
            return Err(SimulationError::InvalidScenario(format!(
                "platoon_size must be between 1 and {MAX_PLATOON_SIZE}, got {}",
                self.platoon_size
            )));
        }
        if self.step_ms == 0 {
            return Err(SimulationError::InvalidScenario(
                "step_ms must be non-zero".to_string(),
            ));
        }
        if !self.duration_s.is_finite() || self.duration_s <= 0.0 {
            return Err(SimulationError::InvalidScenario(
                "duration_s must be positive".to_string(),
            ));
        }
        if !self.initial_gap_m.is_finite() || self.initial_gap_m < 0.0 {
            return Err(SimulationError::InvalidScenario(
                "initial_gap_m must not be negative".to_string(),
            ));
        }
        self.vehicle.validate()?;
        self.radar.validate()?;
        self.maneuver.validate()
    }
}

impl ManeuverConfig {
    /// Check the timing fields before they are converted to microseconds,
    /// where negative or NaN values would silently become zero.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.braking_time_s.is_finite() || self.braking_time_s < 0.0 {
            return Err(SimulationError::InvalidScenario(format!(
                "maneuver.braking_time_s must be finite and non-negative, got {}",
                self.braking_time_s
            )));
        }
        if !self.poll_interval_s.is_finite() || self.poll_interval_s <= 0.0 {
            return Err(SimulationError::InvalidScenario(format!(
                "maneuver.poll_interval_s must be finite and positive, got {}",
                self.poll_interval_s
            )));
        }
        Ok(())
    }
}
