//! Hourly fee calculation and elapsed-time formatting.
//!
//! The fee rule is a pure function of two timestamps and an hourly rate:
//! elapsed time is rounded up to whole hours with a minimum of one hour,
//! so any stay, however short, bills a full hour. The same function drives
//! checkout billing and the live fee shown while a session is active.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParkingError, ParkingResult};

const MS_PER_HOUR: u64 = 3_600_000;

/// Rate card applied to every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPolicy {
    /// Price of one billable hour, in whole currency units.
    pub hourly_rate: u64,
    /// Currency label printed on receipts and reports (e.g. `RWF`).
    pub currency: String,
}

impl BillingPolicy {
    /// Creates a policy with the given rate and currency label.
    #[must_use]
    pub fn new(hourly_rate: u64, currency: impl Into<String>) -> Self {
        Self {
            hourly_rate,
            currency: currency.into(),
        }
    }

    /// Quotes the fee for a stay between `entry` and `exit`.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidInterval`] if `exit` precedes `entry`.
    pub fn quote(&self, entry: DateTime<Utc>, exit: DateTime<Utc>) -> ParkingResult<FeeQuote> {
        compute_fee(entry, exit, self.hourly_rate)
    }
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self::new(500, "RWF")
    }
}

/// Result of a fee computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Whole hours billed (never less than 1).
    pub billable_hours: u64,
    /// `billable_hours * hourly_rate`.
    pub amount: u64,
}

/// Computes billable hours and amount for a stay.
///
/// `billable_hours = max(1, ceil(elapsed_ms / 3_600_000))` and
/// `amount = billable_hours * hourly_rate` (saturating).
///
/// # Errors
///
/// Returns [`ParkingError::InvalidInterval`] if `exit` precedes `entry`.
pub fn compute_fee(
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
    hourly_rate: u64,
) -> ParkingResult<FeeQuote> {
    let elapsed_ms = u64::try_from((exit - entry).num_milliseconds())
        .map_err(|_| ParkingError::InvalidInterval { entry, exit })?;
    let billable_hours = elapsed_ms.div_ceil(MS_PER_HOUR).max(1);
    Ok(FeeQuote {
        billable_hours,
        amount: billable_hours.saturating_mul(hourly_rate),
    })
}

/// Formats an elapsed duration as `HH:MM:SS`.
///
/// Hours are not wrapped at 24 and grow past two digits when needed.
/// Negative durations render as `00:00:00`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
