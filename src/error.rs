//! Engine error types with stable numeric codes.
//!
//! [`ParkingError`] is the central error type for the crate. Every engine
//! operation returns it as a value; none of the variants are process-fatal,
//! and a failed operation leaves all collections unchanged.

use chrono::{DateTime, Utc};

use crate::domain::SessionId;

/// Convenience alias used throughout the crate.
pub type ParkingResult<T> = Result<T, ParkingError>;

/// Error enum shared by the engine, persistence adapter and views.
///
/// # Error Code Ranges
///
/// | Range     | Category         |
/// |-----------|------------------|
/// | 1000–1999 | Validation       |
/// | 2000–2999 | Not Found        |
/// | 3000–3999 | Storage          |
/// | 4000–4999 | State Conflict   |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParkingError {
    /// A required field was empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A vehicle with this plate number is already registered.
    #[error("vehicle {0} is already registered")]
    DuplicateVehicle(String),

    /// A slot with this slot number already exists.
    #[error("slot {0} already exists")]
    DuplicateSlot(String),

    /// No vehicle is registered under this plate number.
    #[error("vehicle not registered: {0}")]
    UnknownVehicle(String),

    /// No slot exists with this identifier or slot number.
    #[error("slot not found: {0}")]
    UnknownSlot(String),

    /// No session exists with this identifier.
    #[error("session not found: {0}")]
    UnknownSession(SessionId),

    /// The slot is not available.
    #[error("slot {0} is occupied")]
    SlotOccupied(String),

    /// The vehicle already has an active session.
    #[error("vehicle {0} is already parked")]
    VehicleAlreadyParked(String),

    /// The session has already been completed.
    #[error("session {0} is not active")]
    SessionNotActive(SessionId),

    /// Exit time precedes entry time.
    #[error("exit time {exit} precedes entry time {entry}")]
    InvalidInterval {
        /// Session entry timestamp.
        entry: DateTime<Utc>,
        /// Requested exit timestamp.
        exit: DateTime<Utc>,
    },

    /// Operator username or password did not match.
    #[error("invalid operator credentials")]
    InvalidCredentials,

    /// Key-value store or serialization failure.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ParkingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::InvalidInterval { .. } => 1002,
            Self::InvalidCredentials => 1003,
            Self::UnknownVehicle(_) => 2001,
            Self::UnknownSlot(_) => 2002,
            Self::UnknownSession(_) => 2003,
            Self::Persistence(_) => 3001,
            Self::DuplicateVehicle(_) => 4001,
            Self::DuplicateSlot(_) => 4002,
            Self::SlotOccupied(_) => 4003,
            Self::VehicleAlreadyParked(_) => 4004,
            Self::SessionNotActive(_) => 4005,
        }
    }

    /// Returns `true` for errors caused by a missing record.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownVehicle(_) | Self::UnknownSlot(_) | Self::UnknownSession(_)
        )
    }
}

impl From<serde_json::Error> for ParkingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for ParkingError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
