//! Immutable payment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PaymentId, PlateNumber, SessionId};

/// Billing record created exactly once when a session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Generated identifier.
    pub id: PaymentId,
    /// Session this payment settles.
    pub record_id: SessionId,
    /// Plate number of the parked vehicle.
    pub plate_number: PlateNumber,
    /// Amount charged, in whole currency units.
    pub amount_paid: u64,
    /// Payment timestamp (equal to the session exit time).
    pub payment_date: DateTime<Utc>,
}
