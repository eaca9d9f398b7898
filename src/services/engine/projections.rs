//! Read-only views over engine state
//!
//! None of these mutate; they back the dashboard, the occupancy grids and
//! the session lists.

use super::Engine;
use crate::domain::pricing::PriceTable;
use crate::domain::session::{Locker, Room, Session};
use crate::domain::types::{Plan, SessionId};
use crate::services::pool::PoolCounts;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OccupancyCounts {
    pub rooms: PoolCounts,
    pub lockers: PoolCounts,
}

/// Headline figures for the front desk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub active_sessions: usize,
    pub paid_sessions: usize,
    pub occupancy: OccupancyCounts,
    pub revenue: u64,
}

/// Verbatim copy of engine state for an external persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    pub rooms: Vec<Room>,
    pub lockers: Vec<Locker>,
    pub sessions: Vec<Session>,
    pub prices: PriceTable,
    pub next_session_id: SessionId,
}

impl Engine {
    pub fn session(&self, session_id: SessionId) -> Option<&Session> {
        self.session_index(session_id).map(|index| &self.sessions[index])
    }

    /// Full history in id order
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn unpaid_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| !s.is_paid())
    }

    pub fn paid_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| s.is_paid())
    }

    pub fn rooms(&self) -> &[Room] {
        self.rooms.resources()
    }

    pub fn lockers(&self) -> &[Locker] {
        self.lockers.resources()
    }

    pub fn available_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.available()
    }

    pub fn available_lockers(&self) -> impl Iterator<Item = &Locker> {
        self.lockers.available()
    }

    pub fn occupancy_counts(&self) -> OccupancyCounts {
        OccupancyCounts { rooms: self.rooms.counts(), lockers: self.lockers.counts() }
    }

    /// Sum of fees over paid sessions, saturating at `u64::MAX`
    pub fn total_revenue(&self) -> u64 {
        self.paid_sessions().fold(0, |total, s| total.saturating_add(s.fee))
    }

    #[inline]
    pub fn price_for(&self, plan: Plan) -> u64 {
        self.prices.price_for(plan)
    }

    /// Price lookup by plan name; unknown names price at zero
    #[inline]
    pub fn price_for_name(&self, name: &str) -> u64 {
        self.prices.price_for_name(name)
    }

    pub fn dashboard(&self) -> DashboardSummary {
        let active_sessions = self.unpaid_sessions().count();
        DashboardSummary {
            active_sessions,
            paid_sessions: self.sessions.len() - active_sessions,
            occupancy: self.occupancy_counts(),
            revenue: self.total_revenue(),
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            rooms: self.rooms().to_vec(),
            lockers: self.lockers().to_vec(),
            sessions: self.sessions.clone(),
            prices: self.prices.clone(),
            next_session_id: self.next_session_id(),
        }
    }
}
