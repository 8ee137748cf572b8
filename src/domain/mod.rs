//! Domain layer: records, identifiers, billing rule, and event system.
//!
//! This module contains the front-desk data model (vehicles, slots,
//! sessions, payments), the fee rule shared by checkout and the live
//! display, the clock abstraction, and the event bus used to notify
//! presentation observers of accepted mutations.

pub mod clock;
pub mod event_bus;
pub mod fee;
pub mod ids;
pub mod numbers;
pub mod parking_event;
pub mod payment;
pub mod session;
pub mod slot;
pub mod state;
pub mod vehicle;

pub use clock::{Clock, FixedClock, SystemClock};
pub use event_bus::EventBus;
pub use fee::{BillingPolicy, FeeQuote, compute_fee, format_elapsed};
pub use ids::{PaymentId, SessionId, SlotId};
pub use numbers::{PlateNumber, SlotNumber};
pub use parking_event::ParkingEvent;
pub use payment::Payment;
pub use session::{Session, SessionStatus};
pub use slot::{Slot, SlotStatus};
pub use state::ParkingState;
pub use vehicle::Vehicle;
