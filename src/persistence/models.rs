//! Storage keys for the four persisted collections.

use std::fmt;

/// Fixed keys under which the four collections are stored.
///
/// The key names match the ones the browser front desk writes to local
/// storage, so an exported store can be loaded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Parking slots.
    Slots,
    /// Registered vehicles.
    Vehicles,
    /// Parking sessions.
    Sessions,
    /// Payments.
    Payments,
}

impl StorageKey {
    /// Every key, in load order.
    pub const ALL: [Self; 4] = [Self::Slots, Self::Vehicles, Self::Sessions, Self::Payments];

    /// Returns the key string used in the store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slots => "smartpark_slots",
            Self::Vehicles => "smartpark_cars",
            Self::Sessions => "smartpark_records",
            Self::Payments => "smartpark_payments",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
