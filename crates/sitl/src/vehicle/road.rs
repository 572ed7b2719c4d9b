//! Single-lane road shared by all simulated vehicles.
//!
//! The road is the ground truth for positions and speeds. Actuators write
//! into it, radars read from it, and the simulation integrates it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use platoon_core::VehicleId;

use super::{FrontInfo, SimVehicle};

/// Shared handle to the lane. Clones refer to the same vehicles.
#[derive(Debug, Clone, Default)]
pub struct Road {
    vehicles: Rc<RefCell<BTreeMap<VehicleId, SimVehicle>>>,
}

impl Road {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a vehicle on the road. Returns `false` if the id is taken.
    pub fn insert(&self, vehicle: SimVehicle) -> bool {
        let mut vehicles = self.vehicles.borrow_mut();
        if vehicles.contains_key(&vehicle.id) {
            return false;
        }
        vehicles.insert(vehicle.id, vehicle);
        true
    }

    pub fn remove(&self, id: VehicleId) -> Option<SimVehicle> {
        self.vehicles.borrow_mut().remove(&id)
    }

    /// Copy of a vehicle's current state.
    pub fn snapshot(&self, id: VehicleId) -> Option<SimVehicle> {
        self.vehicles.borrow().get(&id).cloned()
    }

    /// Run `f` on a vehicle, if present.
    pub fn with_vehicle<R>(&self, id: VehicleId, f: impl FnOnce(&mut SimVehicle) -> R) -> Option<R> {
        self.vehicles.borrow_mut().get_mut(&id).map(f)
    }

    /// Closest vehicle ahead of `id`.
    pub fn front_of(&self, id: VehicleId) -> Option<FrontInfo> {
        let vehicles = self.vehicles.borrow();
        let own = vehicles.get(&id)?;
        front_info(&vehicles, own)
    }

    /// Advance every vehicle by `dt_s` seconds.
    ///
    /// Accelerations are computed from a consistent snapshot before any
    /// vehicle moves.
    pub fn step(&self, dt_s: f64) {
        let mut vehicles = self.vehicles.borrow_mut();
        let commands: Vec<(VehicleId, f64)> = vehicles
            .values()
            .map(|v| (v.id, v.desired_accel(front_info(&vehicles, v))))
            .collect();
        for (id, accel) in commands {
            if let Some(vehicle) = vehicles.get_mut(&id) {
                vehicle.integrate(accel, dt_s);
            }
        }
    }
}

fn front_info(vehicles: &BTreeMap<VehicleId, SimVehicle>, own: &SimVehicle) -> Option<FrontInfo> {
    vehicles
        .values()
        .filter(|v| v.id != own.id && v.position_m > own.position_m)
        .min_by(|a, b| a.position_m.total_cmp(&b.position_m))
        .map(|front| FrontInfo {
            gap_m: front.rear_m() - own.position_m,
            speed_mps: front.speed_mps,
            accel_mss: front.accel_mss,
        })
}
