//! Vehicle control actuator abstraction
//!
//! The controller commands the longitudinal control stack of its vehicle
//! through [`VehicleActuator`]. Every command is fire-and-forget: the
//! actuator has no failure mode visible to the caller.

/// Longitudinal control law active on a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlLaw {
    /// Cooperative adaptive cruise control with a constant target spacing
    Cooperative,
    /// Autonomous cruise control keeping a time headway to the vehicle ahead
    Autonomous {
        /// Time gap to the vehicle in front, in seconds
        headway_s: f64,
    },
}

impl ControlLaw {
    pub const fn name(&self) -> &'static str {
        match self {
            ControlLaw::Cooperative => "CACC",
            ControlLaw::Autonomous { .. } => "ACC",
        }
    }
}

/// RGBA color used for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Shown while the tail vehicle opens the gap
    pub const BRAKING: Color = Color::rgb(100, 100, 100);
    /// Shown once the vehicle has left the platoon
    pub const ABANDONED: Color = Color::rgb(200, 200, 200);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Control interface of the local vehicle
pub trait VehicleActuator {
    /// Desired cruising speed used by the cooperative controller (m/s)
    fn set_cooperative_target_speed(&mut self, speed_mps: f64);

    /// Replace the cooperative spacing policy with a constant gap (m)
    fn set_cooperative_constant_spacing(&mut self, spacing_m: f64);

    /// Switch the active control law
    fn set_control_law(&mut self, law: ControlLaw);

    /// Visual feedback only; ignored by default
    fn set_color(&mut self, _color: Color) {}
}
