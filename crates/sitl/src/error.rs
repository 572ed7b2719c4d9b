use platoon_core::{ConfigError, VehicleId};

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Controller startup failed for {vehicle}: {source}")]
    Config {
        vehicle: VehicleId,
        source: ConfigError,
    },

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    #[error("Vehicle already exists: {0}")]
    VehicleAlreadyExists(VehicleId),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Failed to parse scenario: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
