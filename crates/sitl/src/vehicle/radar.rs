//! Simulated forward radar.

use platoon_core::{DistanceSample, DistanceSensor, VehicleId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::road::Road;
use crate::error::SimulationError;

/// Radar model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Maximum detection range in meters; beyond it the radar has no lock.
    pub range_m: f64,
    /// Gap noise standard deviation in meters.
    pub noise_std_m: f64,
    /// RNG seed for deterministic noise. None = random.
    pub seed: Option<u64>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            range_m: 250.0,
            noise_std_m: 0.0,
            seed: None,
        }
    }
}

impl RadarConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.range_m.is_nan() || self.range_m < 0.0 {
            return Err(SimulationError::InvalidScenario(format!(
                "radar.range_m must not be negative, got {}",
                self.range_m
            )));
        }
        if !self.noise_std_m.is_finite() || self.noise_std_m < 0.0 {
            return Err(SimulationError::InvalidScenario(format!(
                "radar.noise_std_m must be finite and non-negative, got {}",
                self.noise_std_m
            )));
        }
        Ok(())
    }
}

/// Radar reading the ground truth of the road with optional noise.
#[derive(Debug)]
pub struct SimRadar {
    id: VehicleId,
    road: Road,
    config: RadarConfig,
    rng: StdRng,
}

impl SimRadar {
    pub fn new(id: VehicleId, road: Road, config: RadarConfig) -> Self {
        let rng = match config.seed {
            // Distinct but reproducible stream per vehicle
            Some(seed) => StdRng::seed_from_u64(seed ^ u64::from(id.0)),
            None => StdRng::from_entropy(),
        };
        Self {
            id,
            road,
            config,
            rng,
        }
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f64 = self.rng.gen::<f64>().max(f64::EPSILON);
        let u2: f64 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z * stddev
    }
}

impl DistanceSensor for SimRadar {
    fn sample(&mut self) -> DistanceSample {
        let Some(own_speed) = self.road.snapshot(self.id).map(|v| v.speed_mps) else {
            return DistanceSample::no_lock();
        };
        match self.road.front_of(self.id) {
            Some(front) if front.gap_m <= self.config.range_m => {
                let noise = self.gaussian_noise(self.config.noise_std_m);
                DistanceSample::from_raw(front.gap_m + noise, front.speed_mps - own_speed)
            }
            _ => DistanceSample::no_lock(),
        }
    }
}
