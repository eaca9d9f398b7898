//! Services - business logic and state management
//!
//! This module contains the core business logic services:
//! - `pool` - Fixed-size room/locker pool state machine
//! - `engine` - Session allocation, billing and read-only projections
//! - `desk` - Lock-guarded shared front with metrics and receipts

pub mod desk;
pub mod engine;
pub mod pool;

// Re-export commonly used types
pub use desk::Desk;
pub use engine::{DashboardSummary, Engine, EngineSnapshot, OccupancyCounts};
pub use pool::{PoolCounts, ResourcePool};
