//! Formation and role types

use core::fmt;

use heapless::Vec;

/// Maximum number of vehicles in one platoon
pub const MAX_PLATOON_SIZE: usize = 16;

/// Vehicle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vehicle({})", self.0)
    }
}

/// Role of a vehicle within its platoon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleRole {
    Leader,
    Follower,
}

impl VehicleRole {
    pub const fn name(&self) -> &'static str {
        match self {
            VehicleRole::Leader => "leader",
            VehicleRole::Follower => "follower",
        }
    }
}

/// Ordered vehicle identifiers, leader first and tail last
pub type PlatoonFormation = Vec<VehicleId, MAX_PLATOON_SIZE>;

/// Source of topology information for one vehicle
///
/// Answers are only meaningful once positioning has been resolved, which is
/// why the controller reads them in its second configuration phase.
pub trait FormationDirectory {
    /// Identifier of the local vehicle
    fn vehicle_id(&self) -> VehicleId;

    /// Role of the local vehicle
    fn role(&self) -> VehicleRole;

    /// Snapshot of the formation the local vehicle belongs to
    fn formation(&self) -> PlatoonFormation;
}

/// Snapshot of the local vehicle's place in the platoon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatoonTopology {
    pub vehicle_id: VehicleId,
    pub role: VehicleRole,
    pub formation: PlatoonFormation,
}

impl PlatoonTopology {
    pub fn new(vehicle_id: VehicleId, role: VehicleRole, formation: PlatoonFormation) -> Self {
        Self {
            vehicle_id,
            role,
            formation,
        }
    }

    /// Take a snapshot from a formation directory
    pub fn from_directory(directory: &dyn FormationDirectory) -> Self {
        Self::new(
            directory.vehicle_id(),
            directory.role(),
            directory.formation(),
        )
    }

    /// Position of the local vehicle in the formation (leader = 0)
    pub fn rank(&self) -> Option<usize> {
        self.formation.iter().position(|id| *id == self.vehicle_id)
    }

    /// Last vehicle of the formation
    pub fn tail(&self) -> Option<VehicleId> {
        self.formation.last().copied()
    }

    /// Check whether the local vehicle is the last one in the formation
    pub fn is_tail(&self) -> bool {
        self.tail() == Some(self.vehicle_id)
    }
}
