//! Service layer: the session engine and operator login.
//!
//! [`SessionEngine`] owns the front-desk collections, applies every
//! mutation in one step, and announces accepted mutations on the
//! [`super::domain::EventBus`].

pub mod auth;
pub mod session_engine;

pub use auth::{Operator, OperatorAuth};
pub use session_engine::{
    EngineSettings, LiveFee, PaymentRetention, SessionAmendment, SessionEngine,
};
