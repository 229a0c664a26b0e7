//! Repository layer over durable slot storage.
//!
//! # Responsibility
//! - Translate typed collections to and from slot text.
//! - Keep serialization details out of the store service.
//!
//! # Invariants
//! - Repository functions never surface storage failures as errors; the
//!   in-memory collection stays authoritative for the session.

pub mod collection_repo;
