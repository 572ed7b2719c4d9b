//! Radar sensing abstraction
//!
//! A [`DistanceSample`] is produced fresh on every poll and never stored.
//! A radar without a lock reports no gap; callers treat that the same as a
//! gap that has not yet opened far enough.

/// One radar reading towards the vehicle in front
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceSample {
    /// Bumper-to-bumper gap in meters (`None` = no valid reading)
    pub gap_m: Option<f64>,
    /// Speed of the front vehicle relative to ours in m/s
    pub relative_speed_mps: Option<f64>,
}

impl DistanceSample {
    /// Reading from a radar without a target
    pub const fn no_lock() -> Self {
        Self {
            gap_m: None,
            relative_speed_mps: None,
        }
    }

    /// Build a sample from raw radar values where NaN means "no reading"
    pub fn from_raw(gap_m: f64, relative_speed_mps: f64) -> Self {
        Self {
            gap_m: (!gap_m.is_nan()).then_some(gap_m),
            relative_speed_mps: (!relative_speed_mps.is_nan()).then_some(relative_speed_mps),
        }
    }

    /// Check whether the gap is known and strictly greater than `threshold_m`
    pub fn gap_exceeds(&self, threshold_m: f64) -> bool {
        matches!(self.gap_m, Some(gap) if gap > threshold_m)
    }
}

/// Distance sensor facing forward
pub trait DistanceSensor {
    /// Take a fresh reading
    fn sample(&mut self) -> DistanceSample;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_maps_to_missing_values() {
        let sample = DistanceSample::from_raw(f64::NAN, f64::NAN);
        assert_eq!(sample, DistanceSample::no_lock());

        let sample = DistanceSample::from_raw(12.5, f64::NAN);
        assert_eq!(sample.gap_m, Some(12.5));
        assert_eq!(sample.relative_speed_mps, None);
    }

    #[test]
    fn gap_threshold_is_strict() {
        assert!(!DistanceSample::from_raw(14.9, 0.0).gap_exceeds(14.9));
        assert!(DistanceSample::from_raw(14.95, 0.0).gap_exceeds(14.9));
        assert!(DistanceSample::from_raw(15.0, 0.0).gap_exceeds(14.9));
    }

    #[test]
    fn missing_gap_never_exceeds() {
        assert!(!DistanceSample::no_lock().gap_exceeds(0.0));
        assert!(!DistanceSample::from_raw(f64::NAN, 0.0).gap_exceeds(-1.0));
    }
}
