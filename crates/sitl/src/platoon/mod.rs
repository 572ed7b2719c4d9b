//! Platoon formation bookkeeping and messaging.
//!
//! [`FormationRegistry`] is the shared source of truth for who belongs to
//! the platoon and in which order. Each vehicle sees it through a
//! [`PositionHelper`], which is what the controller reads at configuration.

pub mod messaging;

pub use messaging::{LeaderInbox, PlatoonApp, PlatoonMessage};

use std::cell::RefCell;
use std::rc::Rc;

use platoon_core::platoon::MAX_PLATOON_SIZE;
use platoon_core::{FormationDirectory, PlatoonFormation, VehicleId, VehicleRole};

/// Ordered platoon membership, leader first.
#[derive(Debug, Clone, Default)]
pub struct FormationRegistry {
    members: Vec<VehicleId>,
}

/// Shared handle to a registry.
pub type SharedRegistry = Rc<RefCell<FormationRegistry>>;

impl FormationRegistry {
    pub fn new(members: Vec<VehicleId>) -> Self {
        Self { members }
    }

    pub fn shared(members: Vec<VehicleId>) -> SharedRegistry {
        Rc::new(RefCell::new(Self::new(members)))
    }

    pub fn leader(&self) -> Option<VehicleId> {
        self.members.first().copied()
    }

    pub fn members(&self) -> &[VehicleId] {
        &self.members
    }

    /// Leader of the platoon is the first member; anyone else follows.
    pub fn role_of(&self, id: VehicleId) -> VehicleRole {
        if self.leader() == Some(id) {
            VehicleRole::Leader
        } else {
            VehicleRole::Follower
        }
    }

    /// Remove a member. Returns `false` if it was not in the platoon.
    pub fn remove(&mut self, id: VehicleId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        self.members.len() != before
    }

    /// Bounded snapshot handed to controllers.
    pub fn snapshot(&self) -> PlatoonFormation {
        self.members.iter().copied().take(MAX_PLATOON_SIZE).collect()
    }
}

/// One vehicle's view of the shared registry.
#[derive(Debug, Clone)]
pub struct PositionHelper {
    id: VehicleId,
    registry: SharedRegistry,
}

impl PositionHelper {
    pub fn new(id: VehicleId, registry: SharedRegistry) -> Self {
        Self { id, registry }
    }

    pub fn leader(&self) -> Option<VehicleId> {
        self.registry.borrow().leader()
    }
}

impl FormationDirectory for PositionHelper {
    fn vehicle_id(&self) -> VehicleId {
        self.id
    }

    fn role(&self) -> VehicleRole {
        self.registry.borrow().role_of(self.id)
    }

    fn formation(&self) -> PlatoonFormation {
        self.registry.borrow().snapshot()
    }
}
