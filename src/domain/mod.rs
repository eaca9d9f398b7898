//! Domain models - core business types
//!
//! This module contains the canonical data types used throughout the system:
//! - `Session` - one customer's stay, holding a room and a locker until paid
//! - `Resource` - a room or locker in a fixed-size pool
//! - `PriceTable` - plan to flat fee lookup
//! - `EngineError` - failures of engine operations

pub mod error;
pub mod pricing;
pub mod session;
pub mod types;

// Re-export commonly used types at module level
pub use error::EngineError;
pub use pricing::PriceTable;
pub use session::{Locker, Resource, Room, Session};
pub use types::{LockerId, PaymentStatus, Plan, PoolId, ResourceKind, ResourceStatus, RoomId, SessionId};
