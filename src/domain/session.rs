//! Resource and session records

use crate::domain::types::{
    LockerId, PaymentStatus, Plan, PoolId, ResourceStatus, RoomId, SessionId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single room or locker
///
/// `occupant` is Some exactly when `status` is Occupied; only the owning
/// pool changes either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource<I> {
    id: I,
    status: ResourceStatus,
    occupant: Option<SessionId>,
}

impl<I: PoolId> Resource<I> {
    pub(crate) fn new(id: I) -> Self {
        Self { id, status: ResourceStatus::Available, occupant: None }
    }

    #[inline]
    pub fn id(&self) -> I {
        self.id
    }

    #[inline]
    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    #[inline]
    pub fn occupant(&self) -> Option<SessionId> {
        self.occupant
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == ResourceStatus::Available
    }

    pub(crate) fn occupy(&mut self, session: SessionId) {
        self.status = ResourceStatus::Occupied;
        self.occupant = Some(session);
    }

    pub(crate) fn vacate(&mut self) {
        self.status = ResourceStatus::Available;
        self.occupant = None;
    }
}

pub type Room = Resource<RoomId>;
pub type Locker = Resource<LockerId>;

/// One customer's stay, from check-in to payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub customer_name: String,
    pub room_id: RoomId,
    pub locker_id: LockerId,
    pub plan: Plan,
    /// Fee fixed from the price table when the session opened
    pub fee: u64,
    pub payment_status: PaymentStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    pub(crate) fn open(
        id: SessionId,
        customer_name: String,
        room_id: RoomId,
        locker_id: LockerId,
        plan: Plan,
        fee: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_name,
            room_id,
            locker_id,
            plan,
            fee,
            payment_status: PaymentStatus::Unpaid,
            start_time: now,
            end_time: None,
        }
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub(crate) fn mark_paid(&mut self, now: DateTime<Utc>) {
        self.payment_status = PaymentStatus::Paid;
        self.end_time = Some(now);
    }
}
