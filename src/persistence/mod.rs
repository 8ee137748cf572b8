//! Persistence layer: key-value stores and the snapshot adapter.
//!
//! The engine never touches storage directly. After every accepted
//! mutation it offers its full [`ParkingState`] to a [`SnapshotSink`];
//! [`PersistenceAdapter`] is the sink that serializes each collection to
//! JSON and writes it to a [`KeyValueStore`]. Durability is best-effort:
//! a failed write is logged and the in-memory mutation stands.

pub mod adapter;
pub mod file;
pub mod memory;
pub mod models;

pub use adapter::PersistenceAdapter;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::StorageKey;

use std::fmt::Debug;

use crate::domain::ParkingState;
use crate::error::ParkingResult;

/// String-keyed, string-valued store (the role browser local storage plays
/// for the web front desk).
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ParkingError::Persistence`] if the backing
    /// medium cannot be read.
    fn get(&self, key: &str) -> ParkingResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value atomically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ParkingError::Persistence`] if the value
    /// cannot be written.
    fn set(&mut self, key: &str, value: &str) -> ParkingResult<()>;
}

/// Observer that receives the engine's full state after each mutation.
pub trait SnapshotSink: Debug {
    /// Stores or otherwise consumes a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ParkingError::Persistence`] if the snapshot
    /// could not be stored. The engine logs the failure and carries on.
    fn offer(&mut self, state: &ParkingState) -> ParkingResult<()>;
}
