//! Front-desk configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Numeric settings fall back to their defaults when missing or
//! unparseable; a setting that has no sensible fallback (an unknown payment
//! retention policy, an impossible UTC offset) is rejected.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::FixedOffset;

use crate::domain::BillingPolicy;
use crate::service::{EngineSettings, OperatorAuth, PaymentRetention};

/// Top-level front-desk configuration.
///
/// Loaded once at startup via [`DeskConfig::from_env`].
#[derive(Clone)]
pub struct DeskConfig {
    /// Directory holding the file-backed store.
    pub data_dir: PathBuf,

    /// Price of one billable hour.
    pub hourly_rate: u64,

    /// Currency label for receipts and reports.
    pub currency: String,

    /// Number of slots seeded on first run.
    pub seed_slots: usize,

    /// What happens to a payment when its completed session is deleted.
    pub payment_retention: PaymentRetention,

    /// Local offset used to cut timestamps into calendar days.
    pub utc_offset: FixedOffset,

    /// How many slots the usage ranking shows.
    pub top_slots: usize,

    /// Live fee monitor period in seconds; `0` disables the monitor.
    pub live_refresh_secs: u64,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Capacity of the event bus broadcast channel.
    pub event_bus_capacity: usize,

    /// Operator login name.
    pub operator_username: String,

    /// Operator password.
    pub operator_password: String,
}

impl std::fmt::Debug for DeskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskConfig")
            .field("data_dir", &self.data_dir)
            .field("hourly_rate", &self.hourly_rate)
            .field("currency", &self.currency)
            .field("seed_slots", &self.seed_slots)
            .field("payment_retention", &self.payment_retention)
            .field("utc_offset", &self.utc_offset)
            .field("top_slots", &self.top_slots)
            .field("live_refresh_secs", &self.live_refresh_secs)
            .field("log_json", &self.log_json)
            .field("event_bus_capacity", &self.event_bus_capacity)
            .field("operator_username", &self.operator_username)
            .field("operator_password", &"<redacted>")
            .finish()
    }
}

impl DeskConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `PARKING_PAYMENT_RETENTION` names an unknown
    /// policy or `PARKING_UTC_OFFSET_MINUTES` is out of range.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DeskConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("PARKING_DATA_DIR")
            .map_or_else(|| PathBuf::from("./smartpark-data"), PathBuf::from);

        let hourly_rate = parse_var(&lookup, "PARKING_HOURLY_RATE", 500);
        let currency = lookup("PARKING_CURRENCY")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "RWF".to_string());
        let seed_slots = parse_var(&lookup, "PARKING_SEED_SLOTS", 4);

        let payment_retention = match lookup("PARKING_PAYMENT_RETENTION") {
            Some(raw) => raw
                .parse::<PaymentRetention>()
                .with_context(|| format!("PARKING_PAYMENT_RETENTION={raw}"))?,
            None => PaymentRetention::default(),
        };

        let offset_minutes: i32 = parse_var(&lookup, "PARKING_UTC_OFFSET_MINUTES", 0);
        let Some(utc_offset) = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
        else {
            bail!("PARKING_UTC_OFFSET_MINUTES={offset_minutes} is out of range");
        };

        let top_slots = parse_var(&lookup, "PARKING_TOP_SLOTS", 5);
        let live_refresh_secs = parse_var(&lookup, "PARKING_LIVE_REFRESH_SECS", 0);
        let log_json = parse_bool(&lookup, "PARKING_LOG_JSON", false);
        let event_bus_capacity = parse_var(&lookup, "EVENT_BUS_CAPACITY", 1024);

        let operator_username = lookup("OPERATOR_USERNAME").unwrap_or_else(|| "admin".to_string());
        let operator_password = lookup("OPERATOR_PASSWORD").unwrap_or_else(|| "admin".to_string());

        Ok(Self {
            data_dir,
            hourly_rate,
            currency,
            seed_slots,
            payment_retention,
            utc_offset,
            top_slots,
            live_refresh_secs,
            log_json,
            event_bus_capacity,
            operator_username,
            operator_password,
        })
    }

    /// Rate card derived from the configured rate and currency.
    #[must_use]
    pub fn billing(&self) -> BillingPolicy {
        BillingPolicy::new(self.hourly_rate, self.currency.clone())
    }

    /// Engine settings derived from this configuration.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            billing: self.billing(),
            payment_retention: self.payment_retention,
        }
    }

    /// Credential checker for the configured operator.
    #[must_use]
    pub fn operator_auth(&self) -> OperatorAuth {
        OperatorAuth::new(&self.operator_username, &self.operator_password)
    }
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
