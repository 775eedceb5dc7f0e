//! Error types for the Deferred3D engine
//!
//! This module defines the error types used throughout the protocol layer:
//! shader call-order violations, scope exclusivity violations, texture unit
//! exhaustion and render target budget exhaustion.

use std::fmt;
use crate::matrices::Scope;

/// Result type for Deferred3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Deferred3D engine errors
///
/// Every variant except [`Error::PoolHardLimitExceeded`] signals a programmer
/// error and should abort the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A state machine was asked to take an edge it does not have
    ProtocolViolation {
        /// Name of the state space (e.g. "FilterShader")
        machine: &'static str,
        /// State the machine was in
        from: String,
        /// State that was requested
        to: String,
    },

    /// An observer scope was opened while another one was open
    ObserverAlreadyActive,

    /// An instance scope was opened while one was already open
    InstanceAlreadyActive,

    /// A projective light scope was opened while one was already open
    ProjectiveAlreadyActive,

    /// A volume light scope was opened while one was already open
    VolumeLightAlreadyActive,

    /// A scoped value was read outside of its owning scope
    ScopeNotActive(Scope),

    /// A render target pool cannot satisfy a request within its hard limit
    PoolHardLimitExceeded {
        /// Bytes needed by the request
        requested: u64,
        /// Bytes currently checked out
        used: u64,
        /// Configured hard limit
        hard_limit: u64,
    },

    /// A render target pool was used after `delete`
    PoolDeleted,

    /// More texture units were requested than the context provides
    TextureUnitExhausted {
        /// Units that would be needed
        required: u32,
        /// Units available in total
        available: u32,
    },

    /// A texture unit context was used while it was not the current one
    TextureUnitContextNotActive,

    /// The texture unit context stack is full
    TextureUnitContextLimitReached(u32),

    /// Invalid resource (unknown handle, double return, deleted object, etc.)
    InvalidResource(String),

    /// Configuration values are inconsistent
    InvalidConfiguration(String),

    /// Graphics backend error
    BackendError(String),
}

impl Error {
    /// Whether the caller may reasonably recover from this error.
    ///
    /// Only budget exhaustion is recoverable (e.g. by lowering quality
    /// settings); everything else is a misuse of the API.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::PoolHardLimitExceeded { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ProtocolViolation { machine, from, to } => write!(
                f,
                "Protocol violation: {}: no transition from {} to {}",
                machine, from, to
            ),
            Error::ObserverAlreadyActive => write!(f, "Observer already active"),
            Error::InstanceAlreadyActive => write!(f, "Instance already active"),
            Error::ProjectiveAlreadyActive => write!(f, "Projective already active"),
            Error::VolumeLightAlreadyActive => write!(f, "Volume light already active"),
            Error::ScopeNotActive(scope) => write!(f, "{} must be active", scope),
            Error::PoolHardLimitExceeded { requested, used, hard_limit } => write!(
                f,
                "Pool hard limit exceeded: requested {} bytes with {} bytes in use (hard limit {})",
                requested, used, hard_limit
            ),
            Error::PoolDeleted => write!(f, "Pool has been deleted"),
            Error::TextureUnitExhausted { required, available } => write!(
                f,
                "Out of texture units: required {}, available {}",
                required, available
            ),
            Error::TextureUnitContextNotActive => write!(f, "Texture unit context not current"),
            Error::TextureUnitContextLimitReached(depth) => {
                write!(f, "Texture unit context stack limit reached: {}", depth)
            }
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
