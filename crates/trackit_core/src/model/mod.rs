//! Domain model for scheduled classes and their notices.
//!
//! # Responsibility
//! - Define the records owned by the schedule store.
//! - Keep the JSON shape compatible with existing storage slots.
//!
//! # Invariants
//! - Every record is identified by a generated UUID v4.
//! - Records are only created or mutated through the schedule store.

pub mod notice;
pub mod schedule;
