use std::fmt;

use platoon_core::scheduler::us_to_secs;
use platoon_core::{ControlLaw, ControllerState, VehicleId, VehicleRole};

use crate::platoon::PlatoonMessage;

/// Final state of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleReport {
    pub id: VehicleId,
    pub role: Option<VehicleRole>,
    pub state: ControllerState,
    pub position_m: f64,
    pub speed_mps: f64,
    /// Gap to the vehicle in front, if any.
    pub gap_m: Option<f64>,
    pub law: ControlLaw,
    pub polls: u32,
}

/// Summary of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub end_time_us: u64,
    pub vehicles: Vec<VehicleReport>,
    /// `(vehicle, time_us)` of every completed abandonment.
    pub abandonments: Vec<(VehicleId, u64)>,
    /// Messages received by the leader.
    pub messages: Vec<PlatoonMessage>,
    /// Platoon membership at the end of the run.
    pub formation: Vec<VehicleId>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation ended at t={:.2}s ===", us_to_secs(self.end_time_us))?;
        for v in &self.vehicles {
            let role = v.role.map(|r| r.name()).unwrap_or("-");
            let gap = match v.gap_m {
                Some(gap) => format!("{gap:7.2} m"),
                None => "      - ".to_string(),
            };
            writeln!(
                f,
                "{:<12} {:<9} {:<17} {:<5} pos={:9.2} m  speed={:6.2} m/s  gap={}  polls={}",
                v.id.to_string(),
                role,
                v.state.name(),
                v.law.name(),
                v.position_m,
                v.speed_mps,
                gap,
                v.polls
            )?;
        }
        for (id, at_us) in &self.abandonments {
            writeln!(f, "{id} abandoned the platoon at t={:.2}s", us_to_secs(*at_us))?;
        }
        for message in &self.messages {
            writeln!(f, "leader received {message}")?;
        }
        let members: Vec<String> = self.formation.iter().map(|id| id.0.to_string()).collect();
        write!(f, "formation: [{}]", members.join(", "))
    }
}
