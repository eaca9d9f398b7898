//! Shared types for the venue desk

use crate::domain::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which pool a resource belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Room,
    Locker,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Room => "room",
            ResourceKind::Locker => "locker",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a pooled resource
///
/// Ids are 1-based and dense: the resource at pool index `i` has id `i + 1`.
pub trait PoolId: Copy + Eq + fmt::Display + fmt::Debug {
    const KIND: ResourceKind;

    fn from_index(index: usize) -> Self;

    /// Pool index for this id, None for the reserved id 0
    fn index(self) -> Option<usize>;
}

/// Parse "R001", "r1" or "1" style identifiers
fn parse_prefixed(s: &str, prefix: char, what: &str) -> Result<u32, EngineError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix(prefix)
        .or_else(|| trimmed.strip_prefix(prefix.to_ascii_lowercase()))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::Validation(format!("invalid {what} id: {s:?}")));
    }
    digits
        .parse::<u32>()
        .map_err(|_| EngineError::Validation(format!("invalid {what} id: {s:?}")))
}

macro_rules! pool_id {
    ($name:ident, $kind:expr, $prefix:literal, $what:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl PoolId for $name {
            const KIND: ResourceKind = $kind;

            fn from_index(index: usize) -> Self {
                Self(index as u32 + 1)
            }

            fn index(self) -> Option<usize> {
                (self.0 as usize).checked_sub(1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{:03}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_prefixed(s, $prefix, $what).map(Self)
            }
        }
    };
}

pool_id!(RoomId, ResourceKind::Room, 'R', "room");
pool_id!(LockerId, ResourceKind::Locker, 'L', "locker");

/// Newtype wrapper for session ids; assigned sequentially from 1, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SessionId(pub u32);

impl SessionId {
    pub const FIRST: SessionId = SessionId(1);

    #[inline]
    pub fn next(self) -> SessionId {
        SessionId(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{:03}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, 'U', "session").map(SessionId)
    }
}

/// Flat-rate pricing tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    #[default]
    Standard,
    Vip,
    Vvip,
    Vvvip,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Standard, Plan::Vip, Plan::Vvip, Plan::Vvvip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Standard => "STANDARD",
            Plan::Vip => "VIP",
            Plan::Vvip => "VVIP",
            Plan::Vvvip => "VVVIP",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Plan::ALL
            .into_iter()
            .find(|plan| plan.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::Validation(format!("unknown plan: {s:?}")))
    }
}

/// Resource occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Available,
    Occupied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}
