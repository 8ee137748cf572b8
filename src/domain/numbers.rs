//! Case-normalized natural keys: plate numbers and slot numbers.
//!
//! Both are compared and stored in uppercase with surrounding whitespace
//! removed. [`PlateNumber::parse`] and [`SlotNumber::parse`] reject empty
//! input; deserialization only normalizes, so previously stored data is
//! never refused on load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParkingError, ParkingResult};

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Vehicle registration plate, the natural key of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlateNumber(String);

impl PlateNumber {
    /// Normalizes and validates a plate number.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidInput`] if the plate is blank.
    pub fn parse(raw: &str) -> ParkingResult<Self> {
        let plate = normalize(raw);
        if plate.is_empty() {
            return Err(ParkingError::InvalidInput(
                "plate number must not be empty".to_string(),
            ));
        }
        Ok(Self(plate))
    }

    /// Returns the normalized plate as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlateNumber {
    fn from(raw: String) -> Self {
        Self(normalize(&raw))
    }
}

impl From<PlateNumber> for String {
    fn from(plate: PlateNumber) -> Self {
        plate.0
    }
}

impl fmt::Display for PlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable slot number such as `P-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SlotNumber(String);

impl SlotNumber {
    /// Normalizes and validates a slot number.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidInput`] if the slot number is blank.
    pub fn parse(raw: &str) -> ParkingResult<Self> {
        let number = normalize(raw);
        if number.is_empty() {
            return Err(ParkingError::InvalidInput(
                "slot number must not be empty".to_string(),
            ));
        }
        Ok(Self(number))
    }

    /// Slot number used for the `index`-th seeded slot (1-based): `P-01`, `P-02`, ...
    #[must_use]
    pub fn seeded(index: usize) -> Self {
        Self(format!("P-{index:02}"))
    }

    /// Returns the normalized slot number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SlotNumber {
    fn from(raw: String) -> Self {
        Self(normalize(&raw))
    }
}

impl From<SlotNumber> for String {
    fn from(number: SlotNumber) -> Self {
        number.0
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn plate_is_uppercased_and_trimmed() {
        let Ok(plate) = PlateNumber::parse("  rac123a ") else {
            panic!("valid plate");
        };
        assert_eq!(plate.as_str(), "RAC123A");
    }

    #[test]
    fn blank_plate_is_rejected() {
        assert!(matches!(
            PlateNumber::parse("   "),
            Err(ParkingError::InvalidInput(_))
        ));
    }

    #[test]
    fn blank_slot_is_rejected() {
        assert!(SlotNumber::parse("").is_err());
    }

    #[test]
    fn seeded_numbers_are_zero_padded() {
        assert_eq!(SlotNumber::seeded(1).as_str(), "P-01");
        assert_eq!(SlotNumber::seeded(12).as_str(), "P-12");
    }

    #[test]
    fn deserialization_normalizes_case() {
        let Ok(number) = serde_json::from_str::<SlotNumber>("\"p-07\"") else {
            panic!("slot number should deserialize");
        };
        assert_eq!(number.as_str(), "P-07");
    }
}
