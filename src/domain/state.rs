//! The four front-desk collections and lookups over them.
//!
//! [`ParkingState`] is plain data: ordered vectors of slots, vehicles,
//! sessions and payments, in insertion order. It is what the persistence
//! adapter loads and stores. All mutation goes through
//! [`crate::service::SessionEngine`], which keeps the cross-collection
//! invariants; the helpers here only look things up.

use serde::{Deserialize, Serialize};

use super::{
    Payment, PlateNumber, Session, SessionId, Slot, SlotId, SlotNumber, SlotStatus, Vehicle,
};

/// Snapshot of every front-desk collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingState {
    /// Parking slots.
    pub slots: Vec<Slot>,
    /// Registered vehicles.
    pub vehicles: Vec<Vehicle>,
    /// Active and completed sessions.
    pub sessions: Vec<Session>,
    /// Payments, one per checkout.
    pub payments: Vec<Payment>,
}

impl ParkingState {
    /// Creates a state holding `count` available slots `P-01`, `P-02`, ...
    #[must_use]
    pub fn seeded(count: usize) -> Self {
        Self {
            slots: (1..=count)
                .map(|i| Slot::available(SlotNumber::seeded(i)))
                .collect(),
            ..Self::default()
        }
    }

    /// Looks up a vehicle by plate number.
    #[must_use]
    pub fn vehicle(&self, plate: &PlateNumber) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.plate_number == plate)
    }

    /// Looks up a slot by identifier.
    #[must_use]
    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.id == id)
    }

    /// Looks up a slot by slot number.
    #[must_use]
    pub fn slot_by_number(&self, number: &SlotNumber) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.slot_number == number)
    }

    /// Looks up a session by identifier.
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Returns the active session of a vehicle, if it is parked.
    #[must_use]
    pub fn active_session_for_plate(&self, plate: &PlateNumber) -> Option<&Session> {
        self.sessions
            .iter()
            .find(|s| s.is_active() && &s.plate_number == plate)
    }

    /// Returns the payment settling a session, if one exists.
    #[must_use]
    pub fn payment_for_session(&self, id: &SessionId) -> Option<&Payment> {
        self.payments.iter().find(|p| &p.record_id == id)
    }

    /// Returns the first available slot in insertion order.
    #[must_use]
    pub fn first_available_slot(&self) -> Option<&Slot> {
        self.slots.iter().find(|s| s.is_available())
    }

    /// Returns all active sessions in insertion order.
    pub fn active_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| s.is_active())
    }

    /// Number of active sessions referencing `number`.
    #[must_use]
    pub fn active_sessions_on(&self, number: &SlotNumber) -> usize {
        self.active_sessions()
            .filter(|s| &s.slot_number == number)
            .count()
    }

    pub(crate) fn set_slot_status(&mut self, number: &SlotNumber, status: SlotStatus) {
        if let Some(slot) = self.slots.iter_mut().find(|s| &s.slot_number == number) {
            slot.status = status;
        }
    }

    /// Sets every slot's status from the active sessions that reference it.
    ///
    /// Collections are stored one at a time, so a restart can observe slots
    /// and sessions from different moments. Returns the slot numbers whose
    /// status changed.
    pub fn reconcile_slots(&mut self) -> Vec<SlotNumber> {
        let expected: Vec<SlotStatus> = self
            .slots
            .iter()
            .map(|slot| {
                if self.active_sessions_on(&slot.slot_number) > 0 {
                    SlotStatus::Occupied
                } else {
                    SlotStatus::Available
                }
            })
            .collect();

        let mut repaired = Vec::new();
        for (slot, status) in self.slots.iter_mut().zip(expected) {
            if slot.status != status {
                slot.status = status;
                repaired.push(slot.slot_number.clone());
            }
        }
        repaired
    }

    /// Checks the slot-occupancy and one-active-session-per-vehicle rules,
    /// and that every active session points at an existing slot.
    ///
    /// Returns a human-readable description of every violation found.
    #[must_use]
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for slot in &self.slots {
            let active = self.active_sessions_on(&slot.slot_number);
            let occupied = slot.status == SlotStatus::Occupied;
            if occupied != (active == 1) {
                violations.push(format!(
                    "slot {} is {:?} with {active} active session(s)",
                    slot.slot_number, slot.status
                ));
            }
        }

        for session in self.active_sessions() {
            if self.slot_by_number(&session.slot_number).is_none() {
                violations.push(format!(
                    "active session {} is parked in missing slot {}",
                    session.id, session.slot_number
                ));
            }
        }

        for vehicle in &self.vehicles {
            let active = self
                .active_sessions()
                .filter(|s| s.plate_number == vehicle.plate_number)
                .count();
            if active > 1 {
                violations.push(format!(
                    "vehicle {} has {active} active sessions",
                    vehicle.plate_number
                ));
            }
        }

        violations
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parked(state: &mut ParkingState, slot: &str) {
        let number = SlotNumber::from(slot.to_string());
        state.sessions.push(Session::start(
            PlateNumber::from("RAC123A".to_string()),
            number,
            "Jane".to_string(),
            Utc::now(),
        ));
    }

    #[test]
    fn seeded_state_has_available_slots() {
        let state = ParkingState::seeded(4);
        assert_eq!(state.slots.len(), 4);
        assert!(state.slots.iter().all(Slot::is_available));
        assert_eq!(
            state.first_available_slot().map(|s| s.slot_number.as_str()),
            Some("P-01")
        );
    }

    #[test]
    fn reconcile_marks_referenced_slot_occupied() {
        let mut state = ParkingState::seeded(2);
        parked(&mut state, "P-02");

        let repaired = state.reconcile_slots();
        assert_eq!(repaired, vec![SlotNumber::seeded(2)]);
        assert!(state.invariant_violations().is_empty());
    }

    #[test]
    fn reconcile_releases_orphaned_occupied_slot() {
        let mut state = ParkingState::seeded(1);
        state.set_slot_status(&SlotNumber::seeded(1), SlotStatus::Occupied);
        assert_eq!(state.invariant_violations().len(), 1);

        let repaired = state.reconcile_slots();
        assert_eq!(repaired.len(), 1);
        assert!(state.slots.iter().all(Slot::is_available));
    }

    #[test]
    fn active_session_on_missing_slot_is_reported() {
        let mut state = ParkingState::seeded(1);
        parked(&mut state, "B-07");
        let violations = state.invariant_violations();
        assert_eq!(violations.len(), 1);
        assert!(violations.iter().any(|v| v.contains("missing slot B-07")));
    }

    #[test]
    fn two_active_sessions_on_one_slot_are_reported() {
        let mut state = ParkingState::seeded(1);
        parked(&mut state, "P-01");
        parked(&mut state, "P-01");
        state.reconcile_slots();
        assert!(
            state
                .invariant_violations()
                .iter()
                .any(|v| v.contains("2 active session(s)"))
        );
    }

    #[test]
    fn consistent_state_needs_no_repair() {
        let mut state = ParkingState::seeded(3);
        assert!(state.reconcile_slots().is_empty());
    }
}
