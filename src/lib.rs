//! # smartpark
//!
//! Front-desk session engine for a small parking lot.
//!
//! Operators register vehicles, manage slots, park vehicles in free slots,
//! and check them out. Checkout bills every started hour at a flat rate,
//! records a payment, and frees the slot in one step. The four collections
//! (slots, vehicles, sessions, payments) are persisted as JSON documents in
//! a key-value store after every accepted change and restored at startup.
//!
//! ## Architecture
//!
//! ```text
//! Operator (CLI, live monitor)
//!     │
//!     ├── OperatorAuth (service/)
//!     ├── SessionEngine (service/)
//!     │       ├── EventBus (domain/)
//!     │       └── SnapshotSink
//!     │
//!     ├── ParkingState, BillingPolicy (domain/)
//!     ├── Filters, analytics, reports (views/)
//!     │
//!     └── PersistenceAdapter over FileStore / MemoryStore (persistence/)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod monitor;
pub mod persistence;
pub mod service;
pub mod views;
