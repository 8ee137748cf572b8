//! Session engine: owns the front-desk collections and applies mutations.

use std::fmt::Debug;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{
    BillingPolicy, Clock, EventBus, FeeQuote, ParkingEvent, ParkingState, Payment, PaymentId,
    PlateNumber, Session, SessionId, Slot, SlotId, SlotNumber, SlotStatus, SystemClock,
    Vehicle, format_elapsed,
};
use crate::error::{ParkingError, ParkingResult};
use crate::persistence::{KeyValueStore, PersistenceAdapter, SnapshotSink};
use crate::views::{DailyReport, Receipt, RevenueSummary, SessionFilter, search_vehicles};

/// What deleting a completed session does to its payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentRetention {
    /// Keep the payment; it no longer has a session to point to.
    #[default]
    Retain,
    /// Delete the payment together with its session.
    Cascade,
}

impl FromStr for PaymentRetention {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" | "keep" => Ok(Self::Retain),
            "cascade" => Ok(Self::Cascade),
            other => Err(ParkingError::InvalidInput(format!(
                "unknown payment retention policy: {other}"
            ))),
        }
    }
}

/// Tunable engine behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    /// Rate card used for checkout and live quotes.
    pub billing: BillingPolicy,
    /// Payment handling when a completed session is deleted.
    pub payment_retention: PaymentRetention,
}

/// Correction to a session's plate and/or slot number.
///
/// `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAmendment {
    /// New plate number.
    pub plate_number: Option<String>,
    /// New slot number (completed sessions only).
    pub slot_number: Option<String>,
}

/// Running fee of an active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveFee {
    /// Active session.
    pub session_id: SessionId,
    /// Parked vehicle.
    pub plate_number: PlateNumber,
    /// Occupied slot.
    pub slot_number: SlotNumber,
    /// Entry time.
    pub entry_time: DateTime<Utc>,
    /// Time parked so far.
    #[serde(skip)]
    pub elapsed: Duration,
    /// `elapsed` as `HH:MM:SS`.
    pub elapsed_label: String,
    /// Fee if the vehicle left now.
    pub quote: FeeQuote,
}

/// Owner of the slot, vehicle, session and payment collections.
///
/// Every mutation validates first and then applies all of its changes
/// before returning, so callers never observe a session without its slot
/// flip, or a completed session without its payment. A rejected operation
/// leaves every collection untouched. After each accepted mutation the
/// engine publishes a [`ParkingEvent`] and offers the full state to its
/// [`SnapshotSink`], if one is attached.
///
/// Check-in and checkout take the caller's timestamp. Mutations without
/// one stamp their events from the engine's [`Clock`].
#[derive(Debug)]
pub struct SessionEngine {
    state: ParkingState,
    settings: EngineSettings,
    event_bus: EventBus,
    clock: Box<dyn Clock>,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl SessionEngine {
    /// Creates an engine with empty collections and no snapshot sink.
    #[must_use]
    pub fn new(settings: EngineSettings, event_bus: EventBus) -> Self {
        Self::with_state(ParkingState::default(), settings, event_bus)
    }

    /// Creates an engine over existing collections.
    ///
    /// Slot statuses are reconciled with the active sessions first; every
    /// repaired slot is logged. Inconsistencies a status flip cannot
    /// repair (two active sessions on one slot, a session parked in a
    /// missing slot, a vehicle parked twice) are logged as well.
    #[must_use]
    pub fn with_state(mut state: ParkingState, settings: EngineSettings, event_bus: EventBus) -> Self {
        for slot in state.reconcile_slots() {
            tracing::warn!(%slot, "slot status repaired from active sessions");
        }
        for violation in state.invariant_violations() {
            tracing::warn!(%violation, "inconsistent parking state");
        }
        Self {
            state,
            settings,
            event_bus,
            clock: Box::new(SystemClock),
            sink: None,
        }
    }

    /// Replaces the clock used to stamp events.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attaches a sink that receives the state after every mutation.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn SnapshotSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Loads the collections through `adapter` and keeps it as the sink.
    ///
    /// The loaded (possibly seeded or repaired) state is written back
    /// immediately.
    #[must_use]
    pub fn restore<S>(
        adapter: PersistenceAdapter<S>,
        seed_slots: usize,
        settings: EngineSettings,
        event_bus: EventBus,
    ) -> Self
    where
        S: KeyValueStore + Debug + 'static,
    {
        let state = adapter.load(seed_slots);
        let mut engine = Self::with_state(state, settings, event_bus).with_sink(Box::new(adapter));
        engine.persist();
        engine
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Full current state.
    #[must_use]
    pub fn state(&self) -> &ParkingState {
        &self.state
    }

    /// Slots in insertion order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.state.slots
    }

    /// Vehicles in registration order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.state.vehicles
    }

    /// Sessions in start order.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.state.sessions
    }

    /// Payments in checkout order.
    #[must_use]
    pub fn payments(&self) -> &[Payment] {
        &self.state.payments
    }

    /// Looks up a session.
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.state.session(id)
    }

    /// First available slot, used by the quick-park action.
    #[must_use]
    pub fn first_available_slot(&self) -> Option<&Slot> {
        self.state.first_available_slot()
    }

    /// Engine settings.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Event bus on which mutations are announced.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Registers a vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidInput`] if the plate or driver name is
    /// blank, or [`ParkingError::DuplicateVehicle`] if the plate is taken.
    pub fn register_vehicle(
        &mut self,
        plate: &str,
        driver_name: &str,
        phone_number: Option<&str>,
    ) -> ParkingResult<Vehicle> {
        let plate_number = PlateNumber::parse(plate)?;
        let driver_name = driver_name.trim();
        if driver_name.is_empty() {
            return Err(ParkingError::InvalidInput(
                "driver name must not be empty".to_string(),
            ));
        }
        if self.state.vehicle(&plate_number).is_some() {
            return Err(ParkingError::DuplicateVehicle(plate_number.to_string()));
        }

        let vehicle = Vehicle {
            plate_number,
            driver_name: driver_name.to_string(),
            phone_number: phone_number
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        };
        self.state.vehicles.push(vehicle.clone());

        tracing::info!(plate = %vehicle.plate_number, "vehicle registered");
        self.publish(ParkingEvent::VehicleRegistered {
            plate_number: vehicle.plate_number.clone(),
            driver_name: vehicle.driver_name.clone(),
            timestamp: self.clock.now(),
        });
        self.persist();
        Ok(vehicle)
    }

    /// Adds a slot.
    ///
    /// The slot starts available unless an active session is already
    /// parked under its number (a session restored without its slot), in
    /// which case it starts occupied.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidInput`] if the slot number is blank,
    /// or [`ParkingError::DuplicateSlot`] if it already exists.
    pub fn add_slot(&mut self, slot_number: &str) -> ParkingResult<Slot> {
        let slot_number = SlotNumber::parse(slot_number)?;
        if self.state.slot_by_number(&slot_number).is_some() {
            return Err(ParkingError::DuplicateSlot(slot_number.to_string()));
        }

        let mut slot = Slot::available(slot_number);
        let parked = self.state.active_sessions_on(&slot.slot_number);
        if parked > 0 {
            tracing::warn!(slot = %slot.slot_number, parked, "new slot already has active sessions");
            slot.status = SlotStatus::Occupied;
        }
        self.state.slots.push(slot.clone());

        tracing::info!(slot = %slot.slot_number, slot_id = %slot.id, "slot added");
        self.publish(ParkingEvent::SlotAdded {
            slot_id: slot.id.clone(),
            slot_number: slot.slot_number.clone(),
            timestamp: self.clock.now(),
        });
        self.persist();
        Ok(slot)
    }

    /// Gives an available slot a new slot number.
    ///
    /// Completed sessions keep the number the slot had when they ran.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidInput`] for a blank number,
    /// [`ParkingError::UnknownSlot`], [`ParkingError::SlotOccupied`] if a
    /// vehicle is parked there or an active session is parked under the
    /// new number, or [`ParkingError::DuplicateSlot`] if another slot
    /// already uses the number.
    pub fn rename_slot(&mut self, slot_id: &SlotId, new_number: &str) -> ParkingResult<Slot> {
        let new_number = SlotNumber::parse(new_number)?;
        let slot = self
            .state
            .slot(slot_id)
            .ok_or_else(|| ParkingError::UnknownSlot(slot_id.to_string()))?;
        if slot.slot_number == new_number {
            return Ok(slot.clone());
        }
        if !slot.is_available() {
            return Err(ParkingError::SlotOccupied(slot.slot_number.to_string()));
        }
        if self.state.slot_by_number(&new_number).is_some() {
            return Err(ParkingError::DuplicateSlot(new_number.to_string()));
        }
        if self.state.active_sessions_on(&new_number) > 0 {
            return Err(ParkingError::SlotOccupied(new_number.to_string()));
        }

        let Some(slot) = self.state.slots.iter_mut().find(|s| &s.id == slot_id) else {
            return Err(ParkingError::UnknownSlot(slot_id.to_string()));
        };
        let old_number = std::mem::replace(&mut slot.slot_number, new_number);
        let renamed = slot.clone();

        tracing::info!(%old_number, new_number = %renamed.slot_number, "slot renamed");
        self.publish(ParkingEvent::SlotRenamed {
            slot_id: renamed.id.clone(),
            old_number,
            new_number: renamed.slot_number.clone(),
            timestamp: self.clock.now(),
        });
        self.persist();
        Ok(renamed)
    }

    /// Parks a registered vehicle in an available slot.
    ///
    /// Creates an active session and marks the slot occupied in one step.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking, [`ParkingError::UnknownVehicle`],
    /// [`ParkingError::UnknownSlot`], [`ParkingError::SlotOccupied`], or
    /// [`ParkingError::VehicleAlreadyParked`].
    pub fn start_session(
        &mut self,
        plate: &str,
        slot_id: &SlotId,
        now: DateTime<Utc>,
    ) -> ParkingResult<Session> {
        let plate_number = PlateNumber::parse(plate)?;
        let vehicle = self
            .state
            .vehicle(&plate_number)
            .ok_or_else(|| ParkingError::UnknownVehicle(plate_number.to_string()))?;
        let driver_name = vehicle.driver_name.clone();

        let slot = self
            .state
            .slot(slot_id)
            .ok_or_else(|| ParkingError::UnknownSlot(slot_id.to_string()))?;
        if !slot.is_available() {
            return Err(ParkingError::SlotOccupied(slot.slot_number.to_string()));
        }
        let slot_number = slot.slot_number.clone();

        if self.state.active_session_for_plate(&plate_number).is_some() {
            return Err(ParkingError::VehicleAlreadyParked(plate_number.to_string()));
        }

        let session = Session::start(plate_number, slot_number, driver_name, now);
        self.state.sessions.push(session.clone());
        self.state
            .set_slot_status(&session.slot_number, SlotStatus::Occupied);

        tracing::info!(
            session_id = %session.id,
            plate = %session.plate_number,
            slot = %session.slot_number,
            "session started"
        );
        self.publish(ParkingEvent::SessionStarted {
            session_id: session.id.clone(),
            plate_number: session.plate_number.clone(),
            slot_number: session.slot_number.clone(),
            timestamp: now,
        });
        self.persist();
        Ok(session)
    }

    /// Checks a vehicle out.
    ///
    /// Completes the session with its billed duration and amount, records
    /// the payment, and frees the slot, all in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::UnknownSession`],
    /// [`ParkingError::SessionNotActive`] if it was already checked out, or
    /// [`ParkingError::InvalidInterval`] if `now` precedes the entry time.
    pub fn end_session(
        &mut self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> ParkingResult<(Session, Payment)> {
        let session = self
            .state
            .session(session_id)
            .ok_or_else(|| ParkingError::UnknownSession(session_id.clone()))?;
        if !session.is_active() {
            return Err(ParkingError::SessionNotActive(session_id.clone()));
        }
        let quote = self.settings.billing.quote(session.entry_time, now)?;

        let Some(session) = self.state.sessions.iter_mut().find(|s| &s.id == session_id) else {
            return Err(ParkingError::UnknownSession(session_id.clone()));
        };
        session.complete(now, quote);
        let completed = session.clone();

        let payment = Payment {
            id: PaymentId::new(),
            record_id: completed.id.clone(),
            plate_number: completed.plate_number.clone(),
            amount_paid: quote.amount,
            payment_date: now,
        };
        self.state.payments.push(payment.clone());
        if self.state.active_sessions_on(&completed.slot_number) == 0 {
            self.state
                .set_slot_status(&completed.slot_number, SlotStatus::Available);
        } else {
            tracing::warn!(
                slot = %completed.slot_number,
                "slot stays occupied; another active session is parked there"
            );
        }

        tracing::info!(
            session_id = %completed.id,
            plate = %completed.plate_number,
            slot = %completed.slot_number,
            hours = quote.billable_hours,
            amount = quote.amount,
            currency = %self.settings.billing.currency,
            "session ended"
        );
        self.publish(ParkingEvent::SessionEnded {
            session_id: completed.id.clone(),
            payment_id: payment.id.clone(),
            plate_number: completed.plate_number.clone(),
            slot_number: completed.slot_number.clone(),
            duration_hours: quote.billable_hours,
            amount: quote.amount,
            timestamp: now,
        });
        self.persist();
        Ok((completed, payment))
    }

    /// Deletes a session.
    ///
    /// An active session frees its slot. A completed session leaves slots
    /// alone; its payment is kept or removed according to
    /// [`EngineSettings::payment_retention`].
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::UnknownSession`].
    pub fn delete_session(&mut self, session_id: &SessionId) -> ParkingResult<()> {
        let Some(index) = self
            .state
            .sessions
            .iter()
            .position(|s| &s.id == session_id)
        else {
            return Err(ParkingError::UnknownSession(session_id.clone()));
        };
        let session = self.state.sessions.remove(index);

        let mut released_slot = None;
        let mut removed_payment = None;
        if session.is_active() {
            if self.state.active_sessions_on(&session.slot_number) == 0 {
                self.state
                    .set_slot_status(&session.slot_number, SlotStatus::Available);
                released_slot = Some(session.slot_number.clone());
            }
        } else {
            match self.settings.payment_retention {
                PaymentRetention::Cascade => {
                    if let Some(pos) = self
                        .state
                        .payments
                        .iter()
                        .position(|p| &p.record_id == session_id)
                    {
                        removed_payment = Some(self.state.payments.remove(pos).id);
                    }
                }
                PaymentRetention::Retain => {
                    if let Some(payment) = self.state.payment_for_session(session_id) {
                        tracing::warn!(
                            %session_id,
                            payment_id = %payment.id,
                            "completed session deleted; payment kept without its session"
                        );
                    }
                }
            }
        }

        tracing::info!(
            %session_id,
            plate = %session.plate_number,
            released = released_slot.is_some(),
            "session deleted"
        );
        self.publish(ParkingEvent::SessionDeleted {
            session_id: session_id.clone(),
            released_slot,
            removed_payment,
            timestamp: self.clock.now(),
        });
        self.persist();
        Ok(())
    }

    /// Corrects the plate and/or slot number of a session.
    ///
    /// Billing fields and timestamps are never touched. Changing the plate
    /// also refreshes the driver-name snapshot. An active session cannot
    /// change slot because its slot is occupied on its behalf.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::UnknownSession`],
    /// [`ParkingError::InvalidInput`] for blank values or a slot change on
    /// an active session, [`ParkingError::UnknownVehicle`],
    /// [`ParkingError::UnknownSlot`], or
    /// [`ParkingError::VehicleAlreadyParked`] if an active session would
    /// give a vehicle a second active session.
    pub fn amend_session(
        &mut self,
        session_id: &SessionId,
        amendment: &SessionAmendment,
    ) -> ParkingResult<Session> {
        let current = self
            .state
            .session(session_id)
            .ok_or_else(|| ParkingError::UnknownSession(session_id.clone()))?;

        let plate_number = match amendment.plate_number.as_deref() {
            Some(raw) => PlateNumber::parse(raw)?,
            None => current.plate_number.clone(),
        };
        let slot_number = match amendment.slot_number.as_deref() {
            Some(raw) => SlotNumber::parse(raw)?,
            None => current.slot_number.clone(),
        };
        let plate_changed = plate_number != current.plate_number;
        let slot_changed = slot_number != current.slot_number;
        if !plate_changed && !slot_changed {
            return Ok(current.clone());
        }
        let active = current.is_active();
        let mut driver_name = current.driver_name.clone();

        if plate_changed {
            let vehicle = self
                .state
                .vehicle(&plate_number)
                .ok_or_else(|| ParkingError::UnknownVehicle(plate_number.to_string()))?;
            driver_name = vehicle.driver_name.clone();
            if active && self.state.active_session_for_plate(&plate_number).is_some() {
                return Err(ParkingError::VehicleAlreadyParked(plate_number.to_string()));
            }
        }
        if slot_changed {
            if active {
                return Err(ParkingError::InvalidInput(format!(
                    "session {session_id} is active; check it out before changing its slot"
                )));
            }
            if self.state.slot_by_number(&slot_number).is_none() {
                return Err(ParkingError::UnknownSlot(slot_number.to_string()));
            }
        }

        let Some(session) = self.state.sessions.iter_mut().find(|s| &s.id == session_id) else {
            return Err(ParkingError::UnknownSession(session_id.clone()));
        };
        session.plate_number = plate_number;
        session.slot_number = slot_number;
        session.driver_name = driver_name;
        let amended = session.clone();

        tracing::info!(
            %session_id,
            plate = %amended.plate_number,
            slot = %amended.slot_number,
            "session amended"
        );
        self.publish(ParkingEvent::SessionAmended {
            session_id: session_id.clone(),
            plate_number: amended.plate_number.clone(),
            slot_number: amended.slot_number.clone(),
            timestamp: self.clock.now(),
        });
        self.persist();
        Ok(amended)
    }

    // ── Billing views ───────────────────────────────────────────────────

    /// Fee an active session would pay if it checked out at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::UnknownSession`],
    /// [`ParkingError::SessionNotActive`], or
    /// [`ParkingError::InvalidInterval`] if `now` precedes the entry time.
    pub fn quote_session(&self, session_id: &SessionId, now: DateTime<Utc>) -> ParkingResult<FeeQuote> {
        let session = self
            .state
            .session(session_id)
            .ok_or_else(|| ParkingError::UnknownSession(session_id.clone()))?;
        if !session.is_active() {
            return Err(ParkingError::SessionNotActive(session_id.clone()));
        }
        self.settings.billing.quote(session.entry_time, now)
    }

    /// Running fee of every active session at `now`.
    ///
    /// A `now` earlier than an entry time (clock skew) counts as zero
    /// elapsed time for that session.
    #[must_use]
    pub fn live_fees(&self, now: DateTime<Utc>) -> Vec<LiveFee> {
        self.state
            .active_sessions()
            .filter_map(|s| {
                let until = now.max(s.entry_time);
                let quote = self.settings.billing.quote(s.entry_time, until).ok()?;
                let elapsed = until - s.entry_time;
                Some(LiveFee {
                    session_id: s.id.clone(),
                    plate_number: s.plate_number.clone(),
                    slot_number: s.slot_number.clone(),
                    entry_time: s.entry_time,
                    elapsed,
                    elapsed_label: format_elapsed(elapsed),
                    quote,
                })
            })
            .collect()
    }

    /// Receipt for a checked-out session.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::UnknownSession`], or
    /// [`ParkingError::InvalidInput`] if the session is still active or its
    /// payment is missing.
    pub fn receipt(&self, session_id: &SessionId) -> ParkingResult<Receipt> {
        let session = self
            .state
            .session(session_id)
            .ok_or_else(|| ParkingError::UnknownSession(session_id.clone()))?;
        let payment = self.state.payment_for_session(session_id).ok_or_else(|| {
            ParkingError::InvalidInput(format!("no payment recorded for session {session_id}"))
        })?;
        Receipt::new(session, payment, &self.settings.billing.currency).ok_or_else(|| {
            ParkingError::InvalidInput(format!("session {session_id} has not been checked out"))
        })
    }

    // ── Derived views ───────────────────────────────────────────────────

    /// Sessions passing `filter`, in start order.
    #[must_use]
    pub fn filter_sessions(&self, filter: &SessionFilter) -> Vec<&Session> {
        filter.apply(&self.state.sessions)
    }

    /// Vehicles whose plate or driver name contains `query`.
    #[must_use]
    pub fn search_vehicles(&self, query: &str) -> Vec<&Vehicle> {
        search_vehicles(&self.state.vehicles, query)
    }

    /// Dashboard aggregation over payments and sessions.
    #[must_use]
    pub fn revenue_summary(
        &self,
        today: NaiveDate,
        offset: &FixedOffset,
        top_n: usize,
    ) -> RevenueSummary {
        RevenueSummary::compute(
            &self.state.payments,
            &self.state.sessions,
            today,
            offset,
            top_n,
        )
    }

    /// Printable report of sessions that checked out on `day`.
    #[must_use]
    pub fn daily_report(
        &self,
        day: NaiveDate,
        offset: FixedOffset,
        generated_at: DateTime<Utc>,
    ) -> DailyReport {
        DailyReport::build(
            &self.state.sessions,
            day,
            offset,
            &self.settings.billing.currency,
            generated_at,
        )
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn publish(&self, event: ParkingEvent) {
        let receivers = self.event_bus.publish(event);
        tracing::debug!(receivers, "event published");
    }

    fn persist(&mut self) {
        if let Some(sink) = self.sink.as_mut()
            && let Err(e) = sink.offer(&self.state)
        {
            tracing::warn!(error = %e, "snapshot not stored; in-memory state kept");
        }
    }
}
