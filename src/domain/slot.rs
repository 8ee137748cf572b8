//! Parking slots and their occupancy status.

use serde::{Deserialize, Serialize};

use super::{SlotId, SlotNumber};

/// Occupancy status of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotStatus {
    /// Free for a new session.
    Available,
    /// Referenced by exactly one active session.
    Occupied,
}

/// A physical parking space.
///
/// Status is only changed by the session engine as a side effect of
/// starting, ending or deleting a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Generated identifier.
    pub id: SlotId,
    /// Human-readable slot number (unique within the slot collection).
    pub slot_number: SlotNumber,
    /// Current occupancy.
    pub status: SlotStatus,
}

impl Slot {
    /// Creates a new available slot with a fresh identifier.
    #[must_use]
    pub fn available(slot_number: SlotNumber) -> Self {
        Self {
            id: SlotId::new(),
            slot_number,
            status: SlotStatus::Available,
        }
    }

    /// Returns `true` if the slot can take a new session.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}
