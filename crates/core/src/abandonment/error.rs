//! Abandonment controller error types

use core::fmt;

/// Errors raised while bringing the controller up
///
/// None of these are recoverable by the controller itself; the owner of the
/// vehicle is expected to abort its startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No peer platooning application was provided at bind time
    PeerApplicationMissing,
    /// `configure` called before a successful `bind`
    NotBound,
    /// `configure` called a second time
    AlreadyConfigured,
    /// Formation snapshot contains no vehicles
    EmptyFormation,
    /// A parameter is outside its valid range
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Human-readable reason for rejection
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PeerApplicationMissing => {
                write!(f, "Peer platooning application not found")
            }
            ConfigError::NotBound => write!(f, "Controller configured before bind"),
            ConfigError::AlreadyConfigured => write!(f, "Controller already configured"),
            ConfigError::EmptyFormation => write!(f, "Platoon formation is empty"),
            ConfigError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter {}: {}", name, reason)
            }
        }
    }
}

impl core::error::Error for ConfigError {}
