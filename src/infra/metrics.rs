//! Lock-free desk metrics and periodic reporting
//!
//! Uses atomics so recording never contends with the engine lock.
//! Reporting swaps the per-interval counters to zero; the totals are monotonic.
//!
//! NOTE: All atomics use Relaxed ordering intentionally. These are statistical
//! counters only and must not drive engine decisions.

use crate::services::engine::OccupancyCounts;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Fees are operator-set, so revenue counters clamp instead of wrapping
fn saturating_add(counter: &AtomicU64, value: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_add(value))
    });
}

pub struct Metrics {
    /// Sessions opened (monotonic)
    sessions_opened_total: AtomicU64,
    /// Sessions paid (monotonic)
    sessions_closed_total: AtomicU64,
    /// Open requests rejected by validation or availability (monotonic)
    open_rejected_total: AtomicU64,
    /// Close requests rejected (monotonic)
    close_rejected_total: AtomicU64,
    /// Fees collected on checkout (monotonic)
    revenue_total: AtomicU64,
    /// Receipt lines that failed to write (monotonic)
    receipt_failures_total: AtomicU64,
    /// Opens since last report (reset on report)
    opened_since_report: AtomicU64,
    /// Closes since last report (reset on report)
    closed_since_report: AtomicU64,
    /// Revenue since last report (reset on report)
    revenue_since_report: AtomicU64,
    /// Last report time (only accessed from reporter)
    last_report_time: parking_lot::Mutex<Instant>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            sessions_opened_total: AtomicU64::new(0),
            sessions_closed_total: AtomicU64::new(0),
            open_rejected_total: AtomicU64::new(0),
            close_rejected_total: AtomicU64::new(0),
            revenue_total: AtomicU64::new(0),
            receipt_failures_total: AtomicU64::new(0),
            opened_since_report: AtomicU64::new(0),
            closed_since_report: AtomicU64::new(0),
            revenue_since_report: AtomicU64::new(0),
            last_report_time: parking_lot::Mutex::new(Instant::now()),
        }
    }

    #[inline]
    pub fn record_session_opened(&self) {
        self.sessions_opened_total.fetch_add(1, Ordering::Relaxed);
        self.opened_since_report.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_session_closed(&self, fee: u64) {
        self.sessions_closed_total.fetch_add(1, Ordering::Relaxed);
        self.closed_since_report.fetch_add(1, Ordering::Relaxed);
        saturating_add(&self.revenue_total, fee);
        saturating_add(&self.revenue_since_report, fee);
    }

    #[inline]
    pub fn record_open_rejected(&self) {
        self.open_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_close_rejected(&self) {
        self.close_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_receipt_failure(&self) {
        self.receipt_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn sessions_opened_total(&self) -> u64 {
        self.sessions_opened_total.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sessions_closed_total(&self) -> u64 {
        self.sessions_closed_total.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn revenue_total(&self) -> u64 {
        self.revenue_total.load(Ordering::Relaxed)
    }

    /// Build a summary and reset the per-interval counters
    ///
    /// `occupancy` is sampled by the caller from the engine.
    pub fn report(&self, occupancy: OccupancyCounts) -> MetricsSummary {
        let opened = self.opened_since_report.swap(0, Ordering::Relaxed);
        let closed = self.closed_since_report.swap(0, Ordering::Relaxed);
        let revenue = self.revenue_since_report.swap(0, Ordering::Relaxed);

        let elapsed = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };

        MetricsSummary {
            interval_secs: elapsed.as_secs(),
            sessions_opened: opened,
            sessions_closed: closed,
            revenue,
            sessions_opened_total: self.sessions_opened_total.load(Ordering::Relaxed),
            sessions_closed_total: self.sessions_closed_total.load(Ordering::Relaxed),
            open_rejected_total: self.open_rejected_total.load(Ordering::Relaxed),
            close_rejected_total: self.close_rejected_total.load(Ordering::Relaxed),
            revenue_total: self.revenue_total.load(Ordering::Relaxed),
            receipt_failures_total: self.receipt_failures_total.load(Ordering::Relaxed),
            occupancy,
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub interval_secs: u64,
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub revenue: u64,
    pub sessions_opened_total: u64,
    pub sessions_closed_total: u64,
    pub open_rejected_total: u64,
    pub close_rejected_total: u64,
    pub revenue_total: u64,
    pub receipt_failures_total: u64,
    pub occupancy: OccupancyCounts,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            interval_secs = %self.interval_secs,
            opened = %self.sessions_opened,
            closed = %self.sessions_closed,
            revenue = %self.revenue,
            opened_total = %self.sessions_opened_total,
            closed_total = %self.sessions_closed_total,
            open_rejected = %self.open_rejected_total,
            close_rejected = %self.close_rejected_total,
            revenue_total = %self.revenue_total,
            rooms_occupied = %self.occupancy.rooms.occupied,
            rooms_available = %self.occupancy.rooms.available,
            lockers_occupied = %self.occupancy.lockers.occupied,
            lockers_available = %self.occupancy.lockers.available,
            "metrics"
        );
    }
}
