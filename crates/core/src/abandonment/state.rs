//! Controller state types

/// Lifecycle state of the abandonment controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Driving in the platoon; no maneuver pending
    #[default]
    Cruising,
    /// Tail vehicle waiting for the braking deadline
    BrakingArmed,
    /// Spacing tightened, radar polled until the gap opens
    DistancePolling,
    /// Autonomous control engaged and leader notified (terminal)
    Abandoned,
}

impl ControllerState {
    pub const fn name(&self) -> &'static str {
        match self {
            ControllerState::Cruising => "cruising",
            ControllerState::BrakingArmed => "braking_armed",
            ControllerState::DistancePolling => "distance_polling",
            ControllerState::Abandoned => "abandoned",
        }
    }

    /// Check whether the abandonment maneuver is under way
    pub const fn is_maneuvering(&self) -> bool {
        matches!(
            self,
            ControllerState::BrakingArmed | ControllerState::DistancePolling
        )
    }

    /// Check whether no further transition can happen
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Abandoned)
    }
}
