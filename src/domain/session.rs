//! Parking sessions (parking records).
//!
//! A session is one occupancy episode of a slot by a vehicle:
//!
//! ```text
//! Active --[end]--> Completed
//! Active --[delete]--> (removed, slot released)
//! Completed --[delete]--> (removed)
//! ```
//!
//! Sessions reference their slot by slot number rather than slot id, so a
//! completed session keeps the number the slot had while it was parked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fee::FeeQuote;
use super::{PlateNumber, SessionId, SlotNumber};

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Vehicle is currently parked.
    Active,
    /// Vehicle has left and the session was billed.
    Completed,
}

/// One occupancy episode of a slot by a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Generated identifier.
    pub id: SessionId,
    /// Plate number of the parked vehicle.
    pub plate_number: PlateNumber,
    /// Slot number occupied by this session.
    pub slot_number: SlotNumber,
    /// Driver name captured when the session started.
    #[serde(default)]
    pub driver_name: String,
    /// Time the vehicle entered.
    pub entry_time: DateTime<Utc>,
    /// Time the vehicle left. Set once at checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    /// Billable hours (at least 1). Set once at checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Amount charged. Set once at checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<u64>,
    /// Lifecycle status.
    pub status: SessionStatus,
}

impl Session {
    /// Creates a new active session.
    #[must_use]
    pub fn start(
        plate_number: PlateNumber,
        slot_number: SlotNumber,
        driver_name: String,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            plate_number,
            slot_number,
            driver_name,
            entry_time,
            exit_time: None,
            duration: None,
            amount_paid: None,
            status: SessionStatus::Active,
        }
    }

    /// Returns `true` while the vehicle is parked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Fills in exit time and billing and marks the session completed.
    ///
    /// Only the engine calls this, after checking the session is active.
    pub(crate) fn complete(&mut self, exit_time: DateTime<Utc>, quote: FeeQuote) {
        self.exit_time = Some(exit_time);
        self.duration = Some(quote.billable_hours);
        self.amount_paid = Some(quote.amount);
        self.status = SessionStatus::Completed;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_session() -> Session {
        let Ok(plate) = PlateNumber::parse("RAC123A") else {
            panic!("valid plate");
        };
        let entry = Utc
            .with_ymd_and_hms(2026, 3, 1, 10, 0, 0)
            .single()
            .unwrap_or_default();
        Session::start(plate, SlotNumber::seeded(1), "Jane".to_string(), entry)
    }

    #[test]
    fn starts_active_without_billing() {
        let session = make_session();
        assert!(session.is_active());
        assert!(session.exit_time.is_none());
        assert!(session.amount_paid.is_none());
    }

    #[test]
    fn complete_sets_billing_fields() {
        let mut session = make_session();
        let exit = session.entry_time + chrono::Duration::minutes(90);
        session.complete(
            exit,
            FeeQuote {
                billable_hours: 2,
                amount: 1000,
            },
        );
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.duration, Some(2));
        assert_eq!(session.amount_paid, Some(1000));
        assert_eq!(session.exit_time, Some(exit));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let session = make_session();
        let json = serde_json::to_string(&session).unwrap_or_default();
        assert!(json.contains("\"plateNumber\":\"RAC123A\""));
        assert!(json.contains("\"slotNumber\":\"P-01\""));
        assert!(json.contains("\"status\":\"Active\""));
        assert!(!json.contains("exitTime"));
    }

    #[test]
    fn legacy_record_without_driver_name_loads() {
        let raw = r#"{"id":"1718000000000","plateNumber":"rac123a","slotNumber":"P-01",
            "entryTime":"2026-03-01T10:00:00.000Z","status":"Active"}"#;
        let Ok(session) = serde_json::from_str::<Session>(raw) else {
            panic!("legacy record should load");
        };
        assert_eq!(session.plate_number.as_str(), "RAC123A");
        assert!(session.driver_name.is_empty());
    }
}
