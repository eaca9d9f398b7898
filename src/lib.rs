//! Venue desk library
//!
//! Room and locker allocation with flat-rate billing for a single venue.
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
