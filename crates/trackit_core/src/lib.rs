//! Core domain logic for TrackIt class scheduling.
//! This crate is the single source of truth for schedule/notice invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;
pub mod service;
pub mod storage;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::notice::{Notice, NoticeId, NoticeKind};
pub use model::schedule::{
    FieldError, NewSchedule, Schedule, ScheduleForm, ScheduleFormError, ScheduleId,
};
pub use provider::{HandleError, StoreHandle};
pub use repo::collection_repo::PersistOutcome;
pub use service::schedule_store::{ScheduleStore, StoreChange, StoreSnapshot, SubscriptionId};
pub use storage::{
    KeyValueStorage, MemoryStorage, SqliteSlotStorage, StorageError, StorageResult, NOTICES_KEY,
    SCHEDULES_KEY,
};

/// Environment variable naming the slot database file.
pub const DB_PATH_ENV: &str = "TRACKIT_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "trackit_store.sqlite3";

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Resolves the slot database path from `TRACKIT_DB_PATH`.
///
/// Falls back to `<temp_dir>/trackit_store.sqlite3` when the variable is
/// unset or blank.
pub fn resolve_db_path() -> std::path::PathBuf {
    db_path_from(std::env::var(DB_PATH_ENV).ok().as_deref())
}

fn db_path_from(raw: Option<&str>) -> std::path::PathBuf {
    match raw.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => std::path::PathBuf::from(trimmed),
        _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
    }
}
