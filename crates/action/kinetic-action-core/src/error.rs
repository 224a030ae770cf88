//! Error types for the action controller

use serde::{Deserialize, Serialize};

/// Errors surfaced by preset resolution and the operations that depend on it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionError {
    /// Preset name not present in the library
    #[error("Preset not found: {name}")]
    PresetNotFound { name: String },

    /// Playlist definition without any entries
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Preset exists but could not be used as a property object
    #[error("Invalid preset {name}: {reason}")]
    InvalidPreset { name: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Generic action error
    #[error("Action error: {message}")]
    Generic { message: String },
}

impl ActionError {
    /// Create a new generic error
    pub fn new(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::PresetNotFound { .. } | Self::EmptyPlaylist | Self::InvalidPreset { .. } => {
                "preset"
            }
            Self::Serialization { .. } => "serialization",
            Self::Generic { .. } => "generic",
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
