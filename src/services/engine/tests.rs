//! Tests for the Engine module

use super::*;
use crate::domain::types::{PaymentStatus, ResourceKind, ResourceStatus};
use crate::services::pool::PoolCounts;
use chrono::TimeZone;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_engine(rooms: usize, lockers: usize) -> Engine {
    Engine::new(rooms, lockers, PriceTable::default())
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap()
}

fn minutes(m: i64) -> chrono::Duration {
    chrono::Duration::minutes(m)
}

/// Every resource is occupied iff exactly one unpaid session references it
fn assert_consistent(engine: &Engine) {
    for room in engine.rooms() {
        let holders: Vec<&Session> =
            engine.unpaid_sessions().filter(|s| s.room_id == room.id()).collect();
        match room.status() {
            ResourceStatus::Occupied => {
                assert_eq!(holders.len(), 1, "room {} holders", room.id());
                assert_eq!(room.occupant(), Some(holders[0].id));
            }
            ResourceStatus::Available => {
                assert!(holders.is_empty(), "room {} orphaned", room.id());
                assert_eq!(room.occupant(), None);
            }
        }
    }
    for locker in engine.lockers() {
        let holders: Vec<&Session> =
            engine.unpaid_sessions().filter(|s| s.locker_id == locker.id()).collect();
        match locker.status() {
            ResourceStatus::Occupied => {
                assert_eq!(holders.len(), 1, "locker {} holders", locker.id());
                assert_eq!(locker.occupant(), Some(holders[0].id));
            }
            ResourceStatus::Available => {
                assert!(holders.is_empty(), "locker {} orphaned", locker.id());
                assert_eq!(locker.occupant(), None);
            }
        }
    }
    for session in engine.sessions() {
        assert!(engine.rooms.get(session.room_id).is_some());
        assert!(engine.lockers.get(session.locker_id).is_some());
        assert_eq!(session.is_paid(), session.end_time.is_some());
    }
}

#[test]
fn test_new_engine_pools_available() {
    let engine = create_engine(25, 30);
    let counts = engine.occupancy_counts();
    assert_eq!(counts.rooms, PoolCounts { total: 25, occupied: 0, available: 25 });
    assert_eq!(counts.lockers, PoolCounts { total: 30, occupied: 0, available: 30 });
    assert_eq!(engine.rooms()[0].id(), RoomId(1));
    assert_eq!(engine.lockers()[29].id(), LockerId(30));
    assert!(engine.sessions().is_empty());
}

#[test]
fn test_open_then_close_round_trip() {
    let mut engine = create_engine(3, 3);

    let opened = engine.open_session_at("Kim", RoomId(1), LockerId(1), Plan::Vip, t0()).unwrap();
    assert_eq!(opened.id, SessionId(1));
    assert_eq!(opened.payment_status, PaymentStatus::Unpaid);
    assert_eq!(opened.start_time, t0());
    assert!(opened.end_time.is_none());
    assert_eq!(engine.rooms.get(RoomId(1)).unwrap().occupant(), Some(SessionId(1)));
    assert_eq!(engine.lockers.get(LockerId(1)).unwrap().occupant(), Some(SessionId(1)));

    let closed = engine.close_session_at(opened.id, t0() + minutes(120)).unwrap();
    assert_eq!(closed.payment_status, PaymentStatus::Paid);
    assert_eq!(closed.end_time, Some(t0() + minutes(120)));
    assert_eq!(closed.fee, engine.price_for(Plan::Vip));
    assert!(engine.rooms.get(RoomId(1)).unwrap().is_available());
    assert!(engine.lockers.get(LockerId(1)).unwrap().is_available());
    assert_eq!(engine.session(opened.id), Some(&closed));
    assert_consistent(&engine);
}

#[test]
fn test_open_trims_customer_name() {
    let mut engine = create_engine(1, 1);
    let session = engine.open_session("  Lee  ", RoomId(1), LockerId(1), Plan::Standard).unwrap();
    assert_eq!(session.customer_name, "Lee");
}

#[test]
fn test_open_empty_name_is_validation_error() {
    let mut engine = create_engine(1, 1);
    let before = engine.snapshot();

    for name in ["", "   ", "\t"] {
        let err = engine.open_session(name, RoomId(1), LockerId(1), Plan::Vip).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_open_occupied_room_fails_state_unchanged() {
    let mut engine = create_engine(2, 2);
    engine.open_session_at("Kim", RoomId(1), LockerId(1), Plan::Vip, t0()).unwrap();
    let before = engine.snapshot();

    // Free locker, taken room
    let err = engine.open_session("Park", RoomId(1), LockerId(2), Plan::Standard).unwrap_err();
    assert_eq!(err, EngineError::ResourceUnavailable { kind: ResourceKind::Room, id: "R001".into() });
    assert_eq!(engine.snapshot(), before);

    // Free room, taken locker: the room must not be claimed
    let err = engine.open_session("Park", RoomId(2), LockerId(1), Plan::Standard).unwrap_err();
    assert_eq!(
        err,
        EngineError::ResourceUnavailable { kind: ResourceKind::Locker, id: "L001".into() }
    );
    assert_eq!(engine.snapshot(), before);
    assert!(engine.rooms.get(RoomId(2)).unwrap().is_available());
}

#[test]
fn test_open_nonexistent_resource_unavailable() {
    let mut engine = create_engine(2, 2);

    let err = engine.open_session("Kim", RoomId(99), LockerId(1), Plan::Vip).unwrap_err();
    assert!(matches!(err, EngineError::ResourceUnavailable { kind: ResourceKind::Room, .. }));

    let err = engine.open_session("Kim", RoomId(1), LockerId(0), Plan::Vip).unwrap_err();
    assert!(matches!(err, EngineError::ResourceUnavailable { kind: ResourceKind::Locker, .. }));

    assert!(engine.sessions().is_empty());
    assert_eq!(engine.next_session_id(), SessionId(1));
}

#[test]
fn test_pool_exhausted_rejects_every_plan() {
    let mut engine = create_engine(2, 2);
    engine.open_session("A", RoomId(1), LockerId(1), Plan::Standard).unwrap();
    engine.open_session("B", RoomId(2), LockerId(2), Plan::Vvip).unwrap();

    assert_eq!(engine.available_rooms().count(), 0);
    assert_eq!(engine.available_lockers().count(), 0);

    for plan in Plan::ALL {
        for room in [RoomId(1), RoomId(2)] {
            let err = engine.open_session("C", room, LockerId(1), plan).unwrap_err();
            assert!(matches!(err, EngineError::ResourceUnavailable { .. }));
        }
    }
    assert_eq!(engine.sessions().len(), 2);
    assert_consistent(&engine);
}

#[test]
fn test_close_twice_already_paid_state_unchanged() {
    let mut engine = create_engine(2, 2);
    let session = engine.open_session_at("Kim", RoomId(1), LockerId(1), Plan::Vip, t0()).unwrap();
    engine.close_session_at(session.id, t0() + minutes(60)).unwrap();

    // Another customer takes the released room before the duplicate checkout
    engine.open_session_at("Choi", RoomId(1), LockerId(1), Plan::Standard, t0() + minutes(61)).unwrap();
    let before = engine.snapshot();

    let err = engine.close_session_at(session.id, t0() + minutes(90)).unwrap_err();
    assert_eq!(err, EngineError::AlreadyPaid(session.id));
    assert_eq!(engine.snapshot(), before);

    // The second customer still holds the room
    assert_eq!(engine.rooms.get(RoomId(1)).unwrap().occupant(), Some(SessionId(2)));
    assert_eq!(engine.session(session.id).unwrap().end_time, Some(t0() + minutes(60)));
}

#[test]
fn test_close_unknown_session_not_found() {
    let mut engine = create_engine(1, 1);
    assert_eq!(engine.close_session(SessionId(1)), Err(EngineError::NotFound(SessionId(1))));
    assert_eq!(engine.close_session(SessionId(0)), Err(EngineError::NotFound(SessionId(0))));

    engine.open_session("Kim", RoomId(1), LockerId(1), Plan::Vip).unwrap();
    assert_eq!(engine.close_session(SessionId(2)), Err(EngineError::NotFound(SessionId(2))));
}

#[test]
fn test_close_only_touches_own_resources() {
    let mut engine = create_engine(3, 3);
    let a = engine.open_session("A", RoomId(1), LockerId(3), Plan::Standard).unwrap();
    let b = engine.open_session("B", RoomId(2), LockerId(2), Plan::Vip).unwrap();

    engine.close_session(a.id).unwrap();

    let b_now = engine.session(b.id).unwrap();
    assert_eq!(b_now, &b);
    assert_eq!(engine.rooms.get(RoomId(2)).unwrap().occupant(), Some(b.id));
    assert_eq!(engine.lockers.get(LockerId(2)).unwrap().occupant(), Some(b.id));
    assert_eq!(engine.occupancy_counts().rooms.occupied, 1);
    assert_eq!(engine.occupancy_counts().lockers.occupied, 1);
}

#[test]
fn test_fee_fixed_at_open() {
    let mut engine = create_engine(2, 2);
    let open = engine.open_session("Kim", RoomId(1), LockerId(1), Plan::Vip).unwrap();
    let paid = engine.open_session("Lee", RoomId(2), LockerId(2), Plan::Vip).unwrap();
    engine.close_session(paid.id).unwrap();

    engine.set_price(Plan::Vip, 99_000);
    assert_eq!(engine.price_for(Plan::Vip), 99_000);

    assert_eq!(engine.session(open.id).unwrap().fee, 10_000);
    assert_eq!(engine.session(paid.id).unwrap().fee, 10_000);
    let closed = engine.close_session(open.id).unwrap();
    assert_eq!(closed.fee, 10_000);
    assert_eq!(engine.total_revenue(), 20_000);

    // New sessions pick up the new price
    let later = engine.open_session("Park", RoomId(1), LockerId(1), Plan::Vip).unwrap();
    assert_eq!(later.fee, 99_000);
}

#[test]
fn test_missing_price_entry_opens_at_zero() {
    let mut engine = Engine::new(1, 1, PriceTable::from_fees([(Plan::Vip, 10_000)]));
    let session = engine.open_session("Kim", RoomId(1), LockerId(1), Plan::Vvvip).unwrap();
    assert_eq!(session.fee, 0);
}

#[test]
fn test_price_for_unknown_name_is_zero() {
    let engine = create_engine(1, 1);
    assert_eq!(engine.price_for(Plan::Standard), 5000);
    assert_eq!(engine.price_for(Plan::Vip), 10000);
    assert_eq!(engine.price_for(Plan::Vvip), 15000);
    assert_eq!(engine.price_for(Plan::Vvvip), 20000);
    assert_eq!(engine.price_for_name("UNKNOWN"), 0);
    assert_eq!(engine.price_for_name("vvip"), 15000);
}

#[test]
fn test_total_revenue_counts_paid_only() {
    let mut engine = create_engine(4, 4);
    let a = engine.open_session("A", RoomId(1), LockerId(1), Plan::Standard).unwrap();
    engine.open_session("B", RoomId(2), LockerId(2), Plan::Vvvip).unwrap();
    let c = engine.open_session("C", RoomId(3), LockerId(3), Plan::Vvip).unwrap();
    assert_eq!(engine.total_revenue(), 0);

    engine.close_session(a.id).unwrap();
    engine.close_session(c.id).unwrap();
    assert_eq!(engine.total_revenue(), 5000 + 15000);

    let expected: u64 = engine.paid_sessions().map(|s| s.fee).sum();
    assert_eq!(engine.total_revenue(), expected);
}

#[test]
fn test_total_revenue_saturates_at_max_fee() {
    let mut engine = create_engine(2, 2);
    engine.set_price(Plan::Vvvip, u64::MAX);
    let a = engine.open_session("A", RoomId(1), LockerId(1), Plan::Vvvip).unwrap();
    let b = engine.open_session("B", RoomId(2), LockerId(2), Plan::Vvvip).unwrap();
    engine.close_session(a.id).unwrap();
    engine.close_session(b.id).unwrap();

    assert_eq!(engine.total_revenue(), u64::MAX);
    assert_eq!(engine.dashboard().revenue, u64::MAX);
}

#[test]
fn test_session_lists_partition_history() {
    let mut engine = create_engine(3, 3);
    let a = engine.open_session("A", RoomId(1), LockerId(1), Plan::Standard).unwrap();
    let b = engine.open_session("B", RoomId(2), LockerId(2), Plan::Vip).unwrap();
    engine.close_session(a.id).unwrap();

    let unpaid: Vec<SessionId> = engine.unpaid_sessions().map(|s| s.id).collect();
    let paid: Vec<SessionId> = engine.paid_sessions().map(|s| s.id).collect();
    assert_eq!(unpaid, vec![b.id]);
    assert_eq!(paid, vec![a.id]);

    let summary = engine.dashboard();
    assert_eq!(summary.active_sessions, 1);
    assert_eq!(summary.paid_sessions, 1);
    assert_eq!(summary.occupancy.rooms.occupied, 1);
    assert_eq!(summary.occupancy.rooms.available, 2);
    assert_eq!(summary.revenue, 5000);
}

#[test]
fn test_session_ids_never_reused() {
    let mut engine = create_engine(1, 1);
    let mut seen = Vec::new();
    for _ in 0..5 {
        let session = engine.open_session("Kim", RoomId(1), LockerId(1), Plan::Standard).unwrap();
        engine.close_session(session.id).unwrap();
        seen.push(session.id);
    }
    assert_eq!(seen, (1..=5).map(SessionId).collect::<Vec<_>>());
}

#[test]
fn test_failed_open_does_not_consume_id() {
    let mut engine = create_engine(1, 1);
    engine.open_session("", RoomId(1), LockerId(1), Plan::Vip).unwrap_err();
    engine.open_session("Kim", RoomId(2), LockerId(1), Plan::Vip).unwrap_err();
    let session = engine.open_session("Kim", RoomId(1), LockerId(1), Plan::Vip).unwrap();
    assert_eq!(session.id, SessionId(1));
}

#[test]
fn test_reset_discards_state() {
    let mut engine = create_engine(2, 2);
    engine.open_session("Kim", RoomId(1), LockerId(1), Plan::Vip).unwrap();
    engine.set_price(Plan::Standard, 6000);

    engine.reset(4, 1);

    assert!(engine.sessions().is_empty());
    assert_eq!(engine.rooms().len(), 4);
    assert_eq!(engine.lockers().len(), 1);
    assert_eq!(engine.available_rooms().count(), 4);
    assert_eq!(engine.next_session_id(), SessionId(1));
    // Prices survive a reset
    assert_eq!(engine.price_for(Plan::Standard), 6000);
}

#[test]
fn test_snapshot_serializes_collections() {
    let mut engine = create_engine(1, 2);
    engine.open_session_at("Kim", RoomId(1), LockerId(2), Plan::Vvip, t0()).unwrap();

    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(json["rooms"][0]["status"], "OCCUPIED");
    assert_eq!(json["rooms"][0]["occupant"], 1);
    assert_eq!(json["lockers"][0]["status"], "AVAILABLE");
    assert_eq!(json["sessions"][0]["plan"], "VVIP");
    assert_eq!(json["sessions"][0]["fee"], 15000);
    assert_eq!(json["sessions"][0]["payment_status"], "UNPAID");
    assert_eq!(json["next_session_id"], 2);
}

#[test]
fn test_random_sequences_keep_occupancy_consistent() {
    let mut rng = StdRng::seed_from_u64(0x2545_F491_4F6C_DD1D);
    let mut engine = create_engine(4, 5);
    let mut now = t0();

    for step in 0..500 {
        now += minutes(1);
        if rng.gen_range(0..3) == 0 {
            let id = SessionId(rng.gen_range(0..engine.sessions().len() as u32 + 2));
            let before = engine.snapshot();
            match engine.close_session_at(id, now) {
                Ok(closed) => assert!(closed.is_paid()),
                Err(EngineError::NotFound(_)) | Err(EngineError::AlreadyPaid(_)) => {
                    assert_eq!(engine.snapshot(), before, "step {step}");
                }
                Err(other) => panic!("unexpected error at step {step}: {other}"),
            }
        } else {
            let room = RoomId(rng.gen_range(0..6));
            let locker = LockerId(rng.gen_range(0..7));
            let plan = Plan::ALL[rng.gen_range(0..Plan::ALL.len())];
            let before = engine.snapshot();
            match engine.open_session_at("guest", room, locker, plan, now) {
                Ok(opened) => assert_eq!(opened.fee, engine.price_for(plan)),
                Err(EngineError::ResourceUnavailable { .. }) => {
                    assert_eq!(engine.snapshot(), before, "step {step}");
                }
                Err(other) => panic!("unexpected error at step {step}: {other}"),
            }
        }
        assert_consistent(&engine);
    }
}
