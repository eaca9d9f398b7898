//! Shared front desk around the engine
//!
//! `Desk` is what callers hold (usually as `Arc<Desk>`). A single mutex
//! serializes every operation on the engine; metrics and the receipt log
//! are updated outside the lock.

use crate::domain::error::EngineError;
use crate::domain::session::Session;
use crate::domain::types::{LockerId, Plan, RoomId, SessionId};
use crate::infra::config::Config;
use crate::infra::metrics::{Metrics, MetricsSummary};
use crate::io::receipts::ReceiptLog;
use crate::services::engine::Engine;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Desk {
    engine: Mutex<Engine>,
    metrics: Arc<Metrics>,
    receipts: Option<ReceiptLog>,
    /// Pool sizes used by `reset`
    room_count: usize,
    locker_count: usize,
}

impl Desk {
    pub fn new(config: &Config, metrics: Arc<Metrics>) -> Self {
        let engine =
            Engine::new(config.room_count(), config.locker_count(), config.prices().clone());
        let receipts = config.receipts_enabled().then(|| ReceiptLog::new(config.receipts_file()));

        info!(
            venue = %config.venue_name(),
            rooms = config.room_count(),
            lockers = config.locker_count(),
            receipts = config.receipts_enabled(),
            "desk_ready"
        );

        Self {
            engine: Mutex::new(engine),
            metrics,
            receipts,
            room_count: config.room_count(),
            locker_count: config.locker_count(),
        }
    }

    pub fn open_session(
        &self,
        customer_name: &str,
        room_id: RoomId,
        locker_id: LockerId,
        plan: Plan,
    ) -> Result<Session, EngineError> {
        let result = self.engine.lock().open_session(customer_name, room_id, locker_id, plan);

        match &result {
            Ok(_) => self.metrics.record_session_opened(),
            Err(e) => {
                self.metrics.record_open_rejected();
                warn!(
                    room = %room_id,
                    locker = %locker_id,
                    plan = %plan,
                    reason = e.kind(),
                    error = %e,
                    "session_open_rejected"
                );
            }
        }
        result
    }

    /// Take payment for a session and write its receipt
    ///
    /// A receipt write failure is logged and counted; the session stays paid.
    pub fn close_session(&self, session_id: SessionId) -> Result<Session, EngineError> {
        let result = self.engine.lock().close_session(session_id);

        match &result {
            Ok(session) => {
                self.metrics.record_session_closed(session.fee);
                if let Some(receipts) = &self.receipts {
                    if !receipts.write_receipt(session) {
                        self.metrics.record_receipt_failure();
                    }
                }
            }
            Err(e) => {
                self.metrics.record_close_rejected();
                warn!(session = %session_id, reason = e.kind(), error = %e, "session_close_rejected");
            }
        }
        result
    }

    /// Re-initialize both pools with the configured sizes
    pub fn reset(&self) {
        self.engine.lock().reset(self.room_count, self.locker_count);
    }

    pub fn set_price(&self, plan: Plan, fee: u64) {
        self.engine.lock().set_price(plan, fee);
    }

    /// Run a read-only projection under the lock
    ///
    /// Keep `f` short; it blocks every other caller while it runs.
    pub fn read<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&self.engine.lock())
    }

    /// Metrics summary with current occupancy
    pub fn report(&self) -> MetricsSummary {
        let occupancy = self.read(Engine::occupancy_counts);
        self.metrics.report(occupancy)
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}
