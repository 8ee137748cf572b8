//! Read-only views derived from the engine's collections.
//!
//! Nothing here mutates state. Filters back the list screens, analytics
//! back the payments dashboard, and reports produce printable text.

pub mod analytics;
pub mod filter;
pub mod report;

pub use analytics::{DailyRevenue, RevenueSummary, SlotUsage, revenue_by_day, top_slots};
pub use filter::{SessionFilter, StatusFilter, search_vehicles};
pub use report::{DailyReport, Receipt, ReportRow};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Calendar day of `ts` at the given offset.
#[must_use]
pub fn local_day(ts: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    ts.with_timezone(offset).date_naive()
}
