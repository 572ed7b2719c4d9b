/// Pacing of the simulation relative to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeMode {
    /// Simulation runs as fast as possible, no synchronization.
    #[default]
    FreeRunning,
    /// Simulation runs at a scaled rate relative to wall-clock time.
    Scaled { factor: f32 },
}

impl TimeMode {
    /// Wall-clock duration of one simulation step, `None` when free-running.
    pub fn step_period(&self, step_us: u64) -> Option<std::time::Duration> {
        match *self {
            TimeMode::FreeRunning => None,
            TimeMode::Scaled { factor } if factor > 0.0 => {
                let us = (step_us as f64 / factor as f64).max(1.0);
                Some(std::time::Duration::from_micros(us as u64))
            }
            TimeMode::Scaled { .. } => None,
        }
    }
}
