//! Abandonment maneuver parameters
//!
//! Scenario constants for the tail-vehicle abandonment maneuver. The
//! defaults reproduce the reference scenario exactly; owners may override
//! them, but `validate()` must pass before the controller is configured.
//!
//! # Parameters
//!
//! - `leader_speed_kmh` - Platoon cruising speed (km/h)
//! - `follower_speed_offset_mps` - Extra desired speed for followers (m/s)
//! - `braking_time_us` - Absolute simulation time of the braking maneuver
//! - `braking_spacing_m` - Cooperative spacing commanded when braking starts
//! - `distance_threshold_m` - Gap that must be exceeded before leaving
//! - `poll_interval_us` - Radar polling period while the gap opens
//! - `acc_headway_s` - Time headway of the autonomous controller

use crate::scheduler::US_PER_SECOND;

use super::error::ConfigError;

/// Conversion factor between km/h and m/s
pub const KMH_PER_MPS: f64 = 3.6;

/// Default platoon cruising speed (km/h)
pub const DEFAULT_LEADER_SPEED_KMH: f64 = 100.0;

/// Followers aim higher so they can stay attached to an accelerating leader
pub const DEFAULT_FOLLOWER_SPEED_OFFSET_MPS: f64 = 10.0;

/// Braking starts at t = 10 s
pub const DEFAULT_BRAKING_TIME_US: u64 = 10 * US_PER_SECOND;

/// Constant cooperative spacing while opening the gap (m)
pub const DEFAULT_BRAKING_SPACING_M: f64 = 15.0;

/// Gap that triggers the handoff (m), kept below the spacing target
pub const DEFAULT_DISTANCE_THRESHOLD_M: f64 = 14.9;

/// Radar polling period (100 ms)
pub const DEFAULT_POLL_INTERVAL_US: u64 = 100_000;

/// Autonomous controller time headway (s)
pub const DEFAULT_ACC_HEADWAY_S: f64 = 1.2;

/// Abandonment maneuver parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbandonmentParams {
    /// Platoon cruising speed in km/h
    pub leader_speed_kmh: f64,
    /// Speed added to the follower's desired speed in m/s
    pub follower_speed_offset_mps: f64,
    /// Absolute simulation time at which the tail starts braking
    pub braking_time_us: u64,
    /// Cooperative constant spacing commanded at braking start
    pub braking_spacing_m: f64,
    /// Gap the radar must report (strictly) above before leaving
    pub distance_threshold_m: f64,
    /// Period between radar polls
    pub poll_interval_us: u64,
    /// Autonomous controller headway time in seconds
    pub acc_headway_s: f64,
}

impl Default for AbandonmentParams {
    fn default() -> Self {
        Self {
            leader_speed_kmh: DEFAULT_LEADER_SPEED_KMH,
            follower_speed_offset_mps: DEFAULT_FOLLOWER_SPEED_OFFSET_MPS,
            braking_time_us: DEFAULT_BRAKING_TIME_US,
            braking_spacing_m: DEFAULT_BRAKING_SPACING_M,
            distance_threshold_m: DEFAULT_DISTANCE_THRESHOLD_M,
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
            acc_headway_s: DEFAULT_ACC_HEADWAY_S,
        }
    }
}

impl AbandonmentParams {
    /// Default parameters with a different cruising speed
    pub fn with_leader_speed_kmh(leader_speed_kmh: f64) -> Self {
        Self {
            leader_speed_kmh,
            ..Self::default()
        }
    }

    /// Leader's desired speed in m/s
    pub fn cruise_speed_mps(&self) -> f64 {
        self.leader_speed_kmh / KMH_PER_MPS
    }

    /// Follower's desired speed in m/s
    pub fn follower_speed_mps(&self) -> f64 {
        self.cruise_speed_mps() + self.follower_speed_offset_mps
    }

    /// Validate parameter ranges
    ///
    /// The threshold is allowed to equal the spacing target but not to
    /// exceed it, otherwise the maneuver could poll forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.leader_speed_kmh.is_finite() || self.leader_speed_kmh <= 0.0 {
            return Err(invalid("leader_speed_kmh", "must be positive"));
        }
        if !self.follower_speed_offset_mps.is_finite() || self.follower_speed_offset_mps < 0.0 {
            return Err(invalid("follower_speed_offset_mps", "must not be negative"));
        }
        if !self.braking_spacing_m.is_finite() || self.braking_spacing_m <= 0.0 {
            return Err(invalid("braking_spacing_m", "must be positive"));
        }
        if !self.distance_threshold_m.is_finite() || self.distance_threshold_m <= 0.0 {
            return Err(invalid("distance_threshold_m", "must be positive"));
        }
        if self.distance_threshold_m > self.braking_spacing_m {
            return Err(invalid(
                "distance_threshold_m",
                "must not exceed braking_spacing_m",
            ));
        }
        if self.poll_interval_us == 0 {
            return Err(invalid("poll_interval_us", "must be non-zero"));
        }
        if !self.acc_headway_s.is_finite() || self.acc_headway_s <= 0.0 {
            return Err(invalid("acc_headway_s", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scenario() {
        let params = AbandonmentParams::default();
        assert_eq!(params.braking_time_us, 10_000_000);
        assert_eq!(params.poll_interval_us, 100_000);
        assert_eq!(params.braking_spacing_m, 15.0);
        assert_eq!(params.distance_threshold_m, 14.9);
        assert_eq!(params.acc_headway_s, 1.2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn speeds_are_converted_from_kmh() {
        let params = AbandonmentParams::with_leader_speed_kmh(90.0);
        assert_eq!(params.cruise_speed_mps(), 25.0);
        assert_eq!(params.follower_speed_mps(), 35.0);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let params = AbandonmentParams::with_leader_speed_kmh(0.0);
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidParameter {
                name: "leader_speed_kmh",
                reason: "must be positive",
            })
        );

        let params = AbandonmentParams::with_leader_speed_kmh(f64::NAN);
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_threshold_above_spacing() {
        let params = AbandonmentParams {
            distance_threshold_m: 20.0,
            ..AbandonmentParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidParameter {
                name: "distance_threshold_m",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let params = AbandonmentParams {
            poll_interval_us: 0,
            ..AbandonmentParams::default()
        };
        assert!(params.validate().is_err());
    }
}
