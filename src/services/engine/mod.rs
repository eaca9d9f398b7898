//! Allocation and billing engine
//!
//! The Engine owns the room pool, the locker pool and the session history,
//! and is the only place any of them change:
//! - `open_session` claims one room and one locker for a new UNPAID session
//! - `close_session` marks the session PAID and returns both resources
//!
//! Every mutating call validates first and mutates second, so a failed call
//! leaves the engine exactly as it was. Exclusive access comes from `&mut self`;
//! see `services::desk` for the shared, lock-guarded front.

mod projections;
#[cfg(test)]
mod tests;

pub use projections::{DashboardSummary, EngineSnapshot, OccupancyCounts};

use crate::domain::error::EngineError;
use crate::domain::pricing::PriceTable;
use crate::domain::session::Session;
use crate::domain::types::{LockerId, Plan, RoomId, SessionId};
use crate::services::pool::ResourcePool;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub struct Engine {
    pub(crate) rooms: ResourcePool<RoomId>,
    pub(crate) lockers: ResourcePool<LockerId>,
    /// Session history in id order; `sessions[i].id == SessionId(i + 1)`
    pub(crate) sessions: Vec<Session>,
    pub(crate) prices: PriceTable,
    next_session_id: SessionId,
}

impl Engine {
    /// Create an engine with `room_count` rooms and `locker_count` lockers, all available
    pub fn new(room_count: usize, locker_count: usize, prices: PriceTable) -> Self {
        info!(rooms = room_count, lockers = locker_count, "engine_initialized");
        Self {
            rooms: ResourcePool::new(room_count),
            lockers: ResourcePool::new(locker_count),
            sessions: Vec::new(),
            prices,
            next_session_id: SessionId::FIRST,
        }
    }

    /// Discard all sessions and rebuild both pools
    ///
    /// Session numbering restarts at 1. The price table is kept.
    pub fn reset(&mut self, room_count: usize, locker_count: usize) {
        info!(
            rooms = room_count,
            lockers = locker_count,
            discarded_sessions = self.sessions.len(),
            "engine_reset"
        );
        self.rooms = ResourcePool::new(room_count);
        self.lockers = ResourcePool::new(locker_count);
        self.sessions.clear();
        self.next_session_id = SessionId::FIRST;
    }

    pub fn open_session(
        &mut self,
        customer_name: &str,
        room_id: RoomId,
        locker_id: LockerId,
        plan: Plan,
    ) -> Result<Session, EngineError> {
        self.open_session_at(customer_name, room_id, locker_id, plan, Utc::now())
    }

    /// Open a session with an explicit start time
    pub fn open_session_at(
        &mut self,
        customer_name: &str,
        room_id: RoomId,
        locker_id: LockerId,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<Session, EngineError> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(EngineError::Validation("customer name is required".to_string()));
        }

        // Checked against live state; callers may hold a stale availability list
        self.rooms.ensure_available(room_id)?;
        self.lockers.ensure_available(locker_id)?;

        let id = self.next_session_id;
        let fee = self.prices.price_for(plan);

        self.rooms.claim(room_id, id)?;
        self.lockers.claim(locker_id, id)?;

        let session =
            Session::open(id, customer_name.to_string(), room_id, locker_id, plan, fee, now);
        self.sessions.push(session.clone());
        self.next_session_id = id.next();

        info!(
            session = %id,
            room = %room_id,
            locker = %locker_id,
            plan = %plan,
            fee = fee,
            "session_opened"
        );
        Ok(session)
    }

    pub fn close_session(&mut self, session_id: SessionId) -> Result<Session, EngineError> {
        self.close_session_at(session_id, Utc::now())
    }

    /// Settle a session with an explicit end time
    pub fn close_session_at(
        &mut self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> Result<Session, EngineError> {
        let index = self.session_index(session_id).ok_or(EngineError::NotFound(session_id))?;
        if self.sessions[index].is_paid() {
            return Err(EngineError::AlreadyPaid(session_id));
        }

        let session = &mut self.sessions[index];
        session.mark_paid(now);
        let room_released = self.rooms.release(session.room_id, session_id);
        let locker_released = self.lockers.release(session.locker_id, session_id);
        debug_assert!(room_released && locker_released, "unpaid session must hold its resources");

        info!(
            session = %session_id,
            room = %session.room_id,
            locker = %session.locker_id,
            fee = session.fee,
            "session_closed"
        );
        Ok(session.clone())
    }

    /// Change the fee for `plan`; open and closed sessions keep theirs
    pub fn set_price(&mut self, plan: Plan, fee: u64) {
        let previous = self.prices.set(plan, fee);
        info!(plan = %plan, previous, fee, "price_changed");
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Id the next opened session will receive
    pub fn next_session_id(&self) -> SessionId {
        self.next_session_id
    }

    fn session_index(&self, session_id: SessionId) -> Option<usize> {
        let index = (session_id.0 as usize).checked_sub(1)?;
        let found = self.sessions.get(index).filter(|s| s.id == session_id).map(|_| index);
        if found.is_none() {
            debug!(session = %session_id, "session_lookup_miss");
        }
        found
    }
}
