//! Domain events reflecting accepted mutations.
//!
//! Every accepted engine mutation emits a [`ParkingEvent`] through the
//! [`super::EventBus`]. Presentation observers subscribe to refresh their
//! views; the events carry enough context to render a notice without
//! re-reading the engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PaymentId, PlateNumber, SessionId, SlotId, SlotNumber};

/// Domain event emitted after every accepted mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ParkingEvent {
    /// A vehicle was registered.
    VehicleRegistered {
        /// Normalized plate number.
        plate_number: PlateNumber,
        /// Driver name.
        driver_name: String,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A slot was added.
    SlotAdded {
        /// New slot identifier.
        slot_id: SlotId,
        /// Slot number.
        slot_number: SlotNumber,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A slot was given a new slot number.
    SlotRenamed {
        /// Slot identifier.
        slot_id: SlotId,
        /// Previous slot number.
        old_number: SlotNumber,
        /// New slot number.
        new_number: SlotNumber,
        /// Rename timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A vehicle was parked.
    SessionStarted {
        /// New session identifier.
        session_id: SessionId,
        /// Parked vehicle.
        plate_number: PlateNumber,
        /// Occupied slot.
        slot_number: SlotNumber,
        /// Entry time.
        timestamp: DateTime<Utc>,
    },

    /// A vehicle checked out and paid.
    SessionEnded {
        /// Completed session.
        session_id: SessionId,
        /// Payment created at checkout.
        payment_id: PaymentId,
        /// Vehicle that left.
        plate_number: PlateNumber,
        /// Released slot.
        slot_number: SlotNumber,
        /// Billable hours.
        duration_hours: u64,
        /// Amount charged.
        amount: u64,
        /// Exit time.
        timestamp: DateTime<Utc>,
    },

    /// Plate or slot number of a session was corrected.
    SessionAmended {
        /// Amended session.
        session_id: SessionId,
        /// Plate number after the amendment.
        plate_number: PlateNumber,
        /// Slot number after the amendment.
        slot_number: SlotNumber,
        /// Amendment timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A session was deleted.
    SessionDeleted {
        /// Deleted session.
        session_id: SessionId,
        /// Slot released by the deletion, if the session was active.
        released_slot: Option<SlotNumber>,
        /// Payment removed alongside the session, if any.
        removed_payment: Option<PaymentId>,
        /// Deletion timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ParkingEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::VehicleRegistered { .. } => "vehicle_registered",
            Self::SlotAdded { .. } => "slot_added",
            Self::SlotRenamed { .. } => "slot_renamed",
            Self::SessionStarted { .. } => "session_started",
            Self::SessionEnded { .. } => "session_ended",
            Self::SessionAmended { .. } => "session_amended",
            Self::SessionDeleted { .. } => "session_deleted",
        }
    }

    /// Returns the session this event concerns, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::SessionStarted { session_id, .. }
            | Self::SessionEnded { session_id, .. }
            | Self::SessionAmended { session_id, .. }
            | Self::SessionDeleted { session_id, .. } => Some(session_id),
            Self::VehicleRegistered { .. } | Self::SlotAdded { .. } | Self::SlotRenamed { .. } => {
                None
            }
        }
    }

    /// Returns the event timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::VehicleRegistered { timestamp, .. }
            | Self::SlotAdded { timestamp, .. }
            | Self::SlotRenamed { timestamp, .. }
            | Self::SessionStarted { timestamp, .. }
            | Self::SessionEnded { timestamp, .. }
            | Self::SessionAmended { timestamp, .. }
            | Self::SessionDeleted { timestamp, .. } => *timestamp,
        }
    }
}
