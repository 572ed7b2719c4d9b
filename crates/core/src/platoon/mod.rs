//! Platoon topology types
//!
//! Read-only view of the platoon as seen by a single vehicle: who it is,
//! which role it plays and the ordered formation it belongs to. The
//! formation directory itself lives outside this crate.

pub mod formation;
pub mod peer;

pub use formation::{
    FormationDirectory, PlatoonFormation, PlatoonTopology, VehicleId, VehicleRole,
    MAX_PLATOON_SIZE,
};
pub use peer::PeerApplication;
