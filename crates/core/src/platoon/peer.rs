//! Peer application contract
//!
//! The platooning application sitting next to the controller on the same
//! vehicle. It owns inter-vehicle messaging; the controller only asks it to
//! tell the leader that this vehicle has left.

/// Platooning application on the local vehicle
pub trait PeerApplication {
    /// Forward an "abandon platoon" notification to the platoon leader
    ///
    /// Best-effort and fire-and-forget: delivery is not observed by the
    /// caller.
    fn notify_abandonment(&mut self);
}
