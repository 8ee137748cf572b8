//! Printable checkout receipts and the daily report.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use super::local_day;
use crate::domain::{Payment, PaymentId, PlateNumber, Session, SlotNumber};

const TIME_FORMAT: &str = "%H:%M:%S";

/// Receipt handed to the driver at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// Payment the receipt documents.
    pub payment_id: PaymentId,
    /// Vehicle that left.
    pub plate_number: PlateNumber,
    /// Driver name captured at entry.
    pub driver_name: String,
    /// Slot that was used.
    pub slot_number: SlotNumber,
    /// Entry time.
    pub entry_time: DateTime<Utc>,
    /// Exit time.
    pub exit_time: DateTime<Utc>,
    /// Billable hours.
    pub hours: u64,
    /// Amount paid.
    pub amount: u64,
    /// Currency label.
    pub currency: String,
}

impl Receipt {
    /// Builds a receipt from a completed session and its payment.
    ///
    /// Returns `None` if the session has not been checked out.
    #[must_use]
    pub fn new(session: &Session, payment: &Payment, currency: &str) -> Option<Self> {
        Some(Self {
            payment_id: payment.id.clone(),
            plate_number: session.plate_number.clone(),
            driver_name: session.driver_name.clone(),
            slot_number: session.slot_number.clone(),
            entry_time: session.entry_time,
            exit_time: session.exit_time?,
            hours: session.duration?,
            amount: payment.amount_paid,
            currency: currency.to_string(),
        })
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Receipt: {} | Slot {} | {} h | {} {}",
            self.plate_number, self.slot_number, self.hours, self.amount, self.currency
        )
    }
}

/// One completed session on the daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Vehicle plate.
    pub plate_number: PlateNumber,
    /// Slot used.
    pub slot_number: SlotNumber,
    /// Entry time.
    pub entry_time: DateTime<Utc>,
    /// Exit time.
    pub exit_time: DateTime<Utc>,
    /// Billable hours.
    pub hours: u64,
    /// Amount paid.
    pub amount: u64,
}

/// Completed sessions that checked out on one day, with their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    /// Local day the report covers.
    pub day: NaiveDate,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Currency label.
    pub currency: String,
    /// Offset used to cut days and print times.
    #[serde(skip)]
    pub offset: FixedOffset,
    /// Completed sessions in checkout order.
    pub rows: Vec<ReportRow>,
    /// Sum of the row amounts.
    pub total_amount: u64,
}

impl DailyReport {
    /// Collects completed sessions whose exit falls on `day` (local time).
    #[must_use]
    pub fn build(
        sessions: &[Session],
        day: NaiveDate,
        offset: FixedOffset,
        currency: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut rows: Vec<ReportRow> = sessions
            .iter()
            .filter_map(|s| {
                let exit_time = s.exit_time?;
                if s.is_active() || local_day(exit_time, &offset) != day {
                    return None;
                }
                Some(ReportRow {
                    plate_number: s.plate_number.clone(),
                    slot_number: s.slot_number.clone(),
                    entry_time: s.entry_time,
                    exit_time,
                    hours: s.duration.unwrap_or(0),
                    amount: s.amount_paid.unwrap_or(0),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.exit_time);

        let total_amount = rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.amount));

        Self {
            day,
            generated_at,
            currency: currency.to_string(),
            offset,
            rows,
            total_amount,
        }
    }
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SMARTPARK DAILY REPORT {}", self.day)?;
        writeln!(
            f,
            "Generated: {}",
            self.generated_at
                .with_timezone(&self.offset)
                .format("%Y-%m-%d %H:%M:%S %:z")
        )?;
        writeln!(
            f,
            "{:<12} {:<8} {:<9} {:<9} {:>5} {:>12}",
            "Plate",
            "Slot",
            "Entry",
            "Exit",
            "Hours",
            format!("Amount ({})", self.currency)
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:<8} {:<9} {:<9} {:>5} {:>12}",
                row.plate_number.as_str(),
                row.slot_number.as_str(),
                row.entry_time.with_timezone(&self.offset).format(TIME_FORMAT),
                row.exit_time.with_timezone(&self.offset).format(TIME_FORMAT),
                row.hours,
                row.amount
            )?;
        }
        if self.rows.is_empty() {
            writeln!(f, "No completed sessions.")?;
        }
        writeln!(f, "{}", "-".repeat(60))?;
        write!(
            f,
            "Total: {} {} ({} sessions)",
            self.total_amount,
            self.currency,
            self.rows.len()
        )
    }
}
