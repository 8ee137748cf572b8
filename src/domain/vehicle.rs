//! Registered vehicles.

use serde::{Deserialize, Serialize};

use super::PlateNumber;

/// A vehicle known to the front desk, keyed by its plate number.
///
/// Created by registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Normalized plate number (unique within the vehicle collection).
    pub plate_number: PlateNumber,
    /// Name of the driver at registration time.
    pub driver_name: String,
    /// Optional contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl Vehicle {
    /// Returns `true` if the plate or driver name contains `needle`
    /// (case-insensitive). An empty needle matches every vehicle.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        self.plate_number.as_str().to_lowercase().contains(&needle)
            || self.driver_name.to_lowercase().contains(&needle)
    }
}
