//! Error types for the royale decision engine.
//!
//! The daily decision pass itself is infallible; errors only arise at the
//! boundary (configuration, snapshots, intent construction).

use thiserror::Error;

use crate::types::{ActorId, AreaId};

/// Top-level error type for all royale operations.
#[derive(Error, Debug)]
pub enum RoyaleError {
    /// Configuration could not be parsed or holds an unusable value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An area id that is not part of the map.
    #[error("Area not found: {0}")]
    UnknownArea(AreaId),

    /// An actor id that is not part of the registry.
    #[error("Actor not found: {0}")]
    UnknownActor(ActorId),

    /// An intent was built with a payload that violates its shape.
    #[error("Invalid intent: {reason}")]
    InvalidIntent {
        /// What was wrong with the payload.
        reason: String,
    },

    /// A world snapshot breaks the structural contract.
    #[error("Snapshot validation failed: {reason}")]
    Validation {
        /// Which rule was broken.
        reason: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RoyaleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, RoyaleError>;
