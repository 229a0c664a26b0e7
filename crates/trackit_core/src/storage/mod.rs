//! Durable key-value slot storage.
//!
//! # Responsibility
//! - Define the synchronous slot contract the schedule store persists into.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - A slot holds one UTF-8 text value; writes replace the whole value.
//! - Implementations never interpret slot contents.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteSlotStorage;

/// Slot holding the serialized schedules collection.
pub const SCHEDULES_KEY: &str = "trackit.schedules";
/// Slot holding the serialized notices collection.
pub const NOTICES_KEY: &str = "trackit.notices";

pub type StorageResult<T> = Result<T, StorageError>;

/// Slot storage failure.
#[derive(Debug)]
pub enum StorageError {
    /// Backing database failed.
    Db(DbError),
    /// Storage cannot be reached at all (quota, permissions, detached backend).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous key-value slot storage.
pub trait KeyValueStorage {
    /// Returns the slot value, or `None` when the slot was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the slot value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes the slot. Removing a missing slot is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
