//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory state and orchestrate repository persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod schedule_store;
