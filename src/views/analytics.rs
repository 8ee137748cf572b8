//! Revenue and slot-usage aggregation for the payments dashboard.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use super::local_day;
use crate::domain::{Payment, Session, SlotNumber};

/// Revenue collected on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRevenue {
    /// Local calendar day.
    pub day: NaiveDate,
    /// Sum of payments made that day.
    pub amount: u64,
    /// Number of payments made that day.
    pub payments: usize,
}

/// How many sessions a slot has hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotUsage {
    /// Slot number as recorded on the sessions.
    pub slot_number: SlotNumber,
    /// Number of sessions (active and completed) on that slot.
    pub sessions: usize,
}

/// Dashboard figures derived from payments and sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    /// Sum of every payment.
    pub total_amount: u64,
    /// Number of payments.
    pub payment_count: usize,
    /// Number of payments made on the reference day.
    pub payments_today: usize,
    /// Mean payment amount; `0.0` when there are no payments.
    pub mean_amount: f64,
    /// Revenue per day, oldest first.
    pub revenue_by_day: Vec<DailyRevenue>,
    /// Most used slots, busiest first.
    pub top_slots: Vec<SlotUsage>,
}

impl RevenueSummary {
    /// Aggregates payments and sessions.
    ///
    /// `today` is the reference day for `payments_today`; days are cut at
    /// `offset`. `top_n` bounds the slot ranking.
    #[must_use]
    pub fn compute(
        payments: &[Payment],
        sessions: &[Session],
        today: NaiveDate,
        offset: &FixedOffset,
        top_n: usize,
    ) -> Self {
        let total_amount = payments
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.amount_paid));
        let payment_count = payments.len();
        let payments_today = payments
            .iter()
            .filter(|p| local_day(p.payment_date, offset) == today)
            .count();

        #[allow(clippy::cast_precision_loss)]
        let mean_amount = if payment_count == 0 {
            0.0
        } else {
            total_amount as f64 / payment_count as f64
        };

        Self {
            total_amount,
            payment_count,
            payments_today,
            mean_amount,
            revenue_by_day: revenue_by_day(payments, offset),
            top_slots: top_slots(sessions, top_n),
        }
    }
}

/// Groups payments by local calendar day, oldest day first.
#[must_use]
pub fn revenue_by_day(payments: &[Payment], offset: &FixedOffset) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, (u64, usize)> = BTreeMap::new();
    for payment in payments {
        let entry = days
            .entry(local_day(payment.payment_date, offset))
            .or_insert((0, 0));
        entry.0 = entry.0.saturating_add(payment.amount_paid);
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(day, (amount, payments))| DailyRevenue {
            day,
            amount,
            payments,
        })
        .collect()
}

/// Ranks slot numbers by how many sessions used them.
///
/// Ties keep the order in which each slot number first appears in
/// `sessions`.
#[must_use]
pub fn top_slots(sessions: &[Session], n: usize) -> Vec<SlotUsage> {
    let mut usage: Vec<SlotUsage> = Vec::new();
    for session in sessions {
        match usage
            .iter_mut()
            .find(|u| u.slot_number == session.slot_number)
        {
            Some(found) => found.sessions += 1,
            None => usage.push(SlotUsage {
                slot_number: session.slot_number.clone(),
                sessions: 1,
            }),
        }
    }
    // Stable sort keeps first-occurrence order among equal counts.
    usage.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    usage.truncate(n);
    usage
}
