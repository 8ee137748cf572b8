//! Session and vehicle filters for list screens.

use chrono::{FixedOffset, NaiveDate};

use super::local_day;
use crate::domain::{Session, SessionStatus, Vehicle};

/// Status selector of the session list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every session.
    #[default]
    All,
    /// Only sessions still in progress.
    Active,
    /// Only checked-out sessions.
    Completed,
}

impl StatusFilter {
    /// Returns `true` if `status` passes this selector.
    #[must_use]
    pub fn matches(self, status: SessionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == SessionStatus::Active,
            Self::Completed => status == SessionStatus::Completed,
        }
    }
}

/// Criteria for the session list.
///
/// A session passes when its plate contains the query (case-insensitive),
/// its status matches, and its entry day lies within `[from, to]`. Days are
/// computed in the filter's local offset, so time of day never matters.
#[derive(Debug, Clone)]
pub struct SessionFilter {
    plate_query: String,
    status: StatusFilter,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    offset: FixedOffset,
}

impl SessionFilter {
    /// A filter that matches every session, cutting days at `offset`.
    #[must_use]
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            plate_query: String::new(),
            status: StatusFilter::All,
            from: None,
            to: None,
            offset,
        }
    }

    /// Restricts to plates containing `query`.
    #[must_use]
    pub fn plate(mut self, query: &str) -> Self {
        self.plate_query = query.trim().to_lowercase();
        self
    }

    /// Restricts to a status.
    #[must_use]
    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Restricts to sessions that entered on or after `day`.
    #[must_use]
    pub fn since(mut self, day: NaiveDate) -> Self {
        self.from = Some(day);
        self
    }

    /// Restricts to sessions that entered on or before `day`.
    #[must_use]
    pub fn until(mut self, day: NaiveDate) -> Self {
        self.to = Some(day);
        self
    }

    /// Returns `true` if `session` passes every criterion.
    #[must_use]
    pub fn matches(&self, session: &Session) -> bool {
        if !self.status.matches(session.status) {
            return false;
        }
        if !session
            .plate_number
            .as_str()
            .to_lowercase()
            .contains(&self.plate_query)
        {
            return false;
        }
        let day = local_day(session.entry_time, &self.offset);
        if let Some(from) = self.from
            && day < from
        {
            return false;
        }
        if let Some(to) = self.to
            && day > to
        {
            return false;
        }
        true
    }

    /// Returns the matching sessions in their original order.
    #[must_use]
    pub fn apply<'a>(&self, sessions: &'a [Session]) -> Vec<&'a Session> {
        sessions.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Returns vehicles whose plate or driver name contains `query`
/// (case-insensitive), in registration order.
#[must_use]
pub fn search_vehicles<'a>(vehicles: &'a [Vehicle], query: &str) -> Vec<&'a Vehicle> {
    vehicles.iter().filter(|v| v.matches(query)).collect()
}
