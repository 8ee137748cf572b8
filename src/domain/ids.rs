//! Type-safe record identifiers.
//!
//! Slots, sessions and payments are keyed by generated identifiers. Each
//! kind gets its own newtype so a [`SessionId`] can never be passed where a
//! [`SlotId`] is expected. New identifiers are UUID v4 strings; stored data
//! may carry older identifiers (e.g. millisecond timestamps), so the inner
//! value is an opaque string rather than a parsed [`uuid::Uuid`].

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid.to_string())
            }
        }
    };
}

record_id! {
    /// Unique identifier for a parking slot.
    SlotId
}

record_id! {
    /// Unique identifier for a parking session (parking record).
    SessionId
}

record_id! {
    /// Unique identifier for a payment.
    PaymentId
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn display_is_uuid_format() {
        let s = SlotId::new().to_string();
        assert_eq!(s.len(), 36);
        assert!(uuid::Uuid::parse_str(&s).is_ok());
    }

    #[test]
    fn legacy_identifiers_deserialize() {
        let Ok(id) = serde_json::from_str::<SessionId>("\"1718000000000\"") else {
            panic!("legacy id should deserialize");
        };
        assert_eq!(id.as_str(), "1718000000000");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = PaymentId::from("42");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"42\"");
    }
}
