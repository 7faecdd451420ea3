//! Error types for the presence system

use crate::zone::ZoneId;
use thiserror::Error;

/// Presence system errors
///
/// The runtime itself never fails; degenerate configuration is clamped.
/// Errors only come from loading configuration and addressing zones.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// Configuration document could not be parsed
    #[error("Invalid presence configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// No zone registered under this id
    #[error("Presence zone not found: {0:?}")]
    UnknownZone(ZoneId),
}

/// Result type for presence operations
pub type Result<T> = std::result::Result<T, PresenceError>;
