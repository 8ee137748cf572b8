//! Loads and stores the four collections as JSON documents.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{KeyValueStore, SnapshotSink, StorageKey};
use crate::domain::ParkingState;
use crate::error::ParkingResult;

/// Bridges a [`KeyValueStore`] and the engine's [`ParkingState`].
///
/// Each collection is one JSON array under its [`StorageKey`]. Saving
/// writes the four keys one after the other; there is no cross-key
/// transaction, which is why the engine reconciles slot statuses on
/// restore.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads all four collections.
    ///
    /// When no slots were ever stored, `seed_slots` available slots are
    /// created. A malformed or unreadable collection is logged and treated
    /// as empty; malformed slots are not re-seeded.
    #[must_use]
    pub fn load(&self, seed_slots: usize) -> ParkingState {
        let slots = match self.read(StorageKey::Slots) {
            Loaded::Absent => {
                tracing::info!(count = seed_slots, "no stored slots, seeding defaults");
                ParkingState::seeded(seed_slots).slots
            }
            Loaded::Malformed => Vec::new(),
            Loaded::Records(slots) => slots,
        };

        let state = ParkingState {
            slots,
            vehicles: self.read(StorageKey::Vehicles).into_vec(),
            sessions: self.read(StorageKey::Sessions).into_vec(),
            payments: self.read(StorageKey::Payments).into_vec(),
        };
        tracing::info!(
            slots = state.slots.len(),
            vehicles = state.vehicles.len(),
            sessions = state.sessions.len(),
            payments = state.payments.len(),
            "front-desk state loaded"
        );
        state
    }

    /// Writes all four collections.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ParkingError::Persistence`] on the first
    /// serialization or store failure; keys written before it keep their
    /// new value.
    pub fn save(&mut self, state: &ParkingState) -> ParkingResult<()> {
        self.write(StorageKey::Slots, &state.slots)?;
        self.write(StorageKey::Vehicles, &state.vehicles)?;
        self.write(StorageKey::Sessions, &state.sessions)?;
        self.write(StorageKey::Payments, &state.payments)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, key: StorageKey) -> Loaded<T> {
        let raw = match self.store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Absent,
            Err(e) => {
                tracing::warn!(%key, error = %e, "cannot read stored collection, using empty");
                return Loaded::Malformed;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Loaded::Records(records),
            Err(e) => {
                tracing::warn!(%key, error = %e, "malformed stored collection, using empty");
                Loaded::Malformed
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: StorageKey, records: &[T]) -> ParkingResult<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(key.as_str(), &json)
    }
}

impl<S: KeyValueStore + std::fmt::Debug> SnapshotSink for PersistenceAdapter<S> {
    fn offer(&mut self, state: &ParkingState) -> ParkingResult<()> {
        self.save(state)
    }
}

enum Loaded<T> {
    Absent,
    Malformed,
    Records(Vec<T>),
}

impl<T> Loaded<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Records(records) => records,
            Self::Absent | Self::Malformed => Vec::new(),
        }
    }
}
