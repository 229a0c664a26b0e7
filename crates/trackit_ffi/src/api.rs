//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the schedule store to UI pages as flat, sync FRB functions.
//! - Own the process-wide store provider and its init/shutdown lifecycle.
//! - Run teacher-form validation before any schedule reaches the store.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls made before `store_init` return an explicit failure envelope.
//! - Storage write failures are never reported to the UI.

use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use trackit_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_db_path, HandleError, Notice, Schedule, ScheduleForm, ScheduleStore,
    SqliteSlotStorage, StoreHandle,
};

static STORE: StoreHandle<SqliteSlotStorage> = StoreHandle::new();
// Guarded together with `STORE` mount/unmount so init calls serialize.
static MOUNTED_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Schedule row rendered by the teacher page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleItem {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub room: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub created_at: i64,
}

/// Notice row rendered by the notifications page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeItem {
    pub id: String,
    /// Display label (`Schedule|Update`).
    pub kind: String,
    pub message: String,
    pub created_at: i64,
    pub read: bool,
}

/// Field-level validation message for the teacher form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldError {
    pub field: String,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether the operation ran.
    pub ok: bool,
    /// Created schedule ID for `schedule_add`.
    pub schedule_id: Option<String>,
    /// Per-field form errors; empty unless validation failed.
    pub field_errors: Vec<FormFieldError>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            schedule_id: None,
            field_errors: Vec::new(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            schedule_id: None,
            field_errors: Vec::new(),
            message: message.into(),
        }
    }
}

/// Opens the slot database and mounts the process-wide store.
///
/// Input semantics:
/// - `db_path`: SQLite file path; `None` or blank resolves via
///   `TRACKIT_DB_PATH`, then the temp directory.
///
/// # FFI contract
/// - Sync call; opens a file and restores both collections.
/// - Calling again with the mounted path is a no-op success.
/// - Calling again with a different path fails; call `store_shutdown` first.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn store_init(db_path: Option<String>) -> String {
    let path = match db_path.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => PathBuf::from(trimmed),
        _ => resolve_db_path(),
    };

    let mut mounted_path = lock_mounted_path();
    if let Some(active) = mounted_path.as_ref() {
        if STORE.is_mounted() {
            if *active == path {
                return String::new();
            }
            return format!(
                "store_init failed: store already mounted at `{}`; refusing to switch to `{}`",
                active.display(),
                path.display()
            );
        }
    }

    let storage = match SqliteSlotStorage::open(&path) {
        Ok(storage) => storage,
        Err(err) => return format!("store_init failed: {err}"),
    };

    match STORE.mount(ScheduleStore::open(storage)) {
        Ok(()) => {
            *mounted_path = Some(path);
            info!("event=store_init module=ffi status=ok");
            String::new()
        }
        Err(err) => format!("store_init failed: {err}"),
    }
}

/// Unmounts the store and closes its database.
///
/// # FFI contract
/// - Idempotent; returns whether a store was mounted.
#[flutter_rust_bridge::frb(sync)]
pub fn store_shutdown() -> bool {
    let mut mounted_path = lock_mounted_path();
    *mounted_path = None;
    STORE.unmount().is_some()
}

/// Validates teacher-form input and schedules the class.
///
/// # FFI contract
/// - Never panics.
/// - Validation failures return `ok=false` with `field_errors` populated.
/// - Success returns the created schedule ID.
#[flutter_rust_bridge::frb(sync)]
pub fn schedule_add(
    title: String,
    subject: String,
    room: String,
    date: String,
    start: String,
    end: String,
) -> StoreActionResponse {
    let form = ScheduleForm {
        title,
        subject,
        room,
        date,
        start,
        end,
    };
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(err) => {
            let mut response = StoreActionResponse::failure(err.to_string());
            response.field_errors = err
                .errors
                .iter()
                .map(|error| FormFieldError {
                    field: error.field.to_string(),
                    message: error.message.to_string(),
                })
                .collect();
            return response;
        }
    };

    match STORE.try_with(|store| store.add_schedule(payload).id) {
        Ok(schedule_id) => {
            let mut response = StoreActionResponse::success("Class scheduled.");
            response.schedule_id = Some(schedule_id.to_string());
            response
        }
        Err(err) => not_mounted_failure("schedule_add", err),
    }
}

/// Lists schedules in chronological order (date, then start time).
///
/// Returns an empty list when the store is not initialized.
#[flutter_rust_bridge::frb(sync)]
pub fn schedules_upcoming() -> Vec<ScheduleItem> {
    read_or_default("schedules_upcoming", |store| {
        store.upcoming().into_iter().map(to_schedule_item).collect()
    })
}

/// Lists notices newest first.
///
/// Returns an empty list when the store is not initialized.
#[flutter_rust_bridge::frb(sync)]
pub fn notices_list() -> Vec<NoticeItem> {
    read_or_default("notices_list", |store| {
        store
            .notices_newest_first()
            .into_iter()
            .map(to_notice_item)
            .collect()
    })
}

/// Number of unread notices for the navigation badge.
#[flutter_rust_bridge::frb(sync)]
pub fn notices_unread_count() -> u32 {
    read_or_default("notices_unread_count", |store| {
        u32::try_from(store.unread_count()).unwrap_or(u32::MAX)
    })
}

/// Marks every notice as read.
#[flutter_rust_bridge::frb(sync)]
pub fn notices_mark_all_read() -> StoreActionResponse {
    match STORE.try_with(|store| store.mark_all_read()) {
        Ok(()) => StoreActionResponse::success("All notices marked read."),
        Err(err) => not_mounted_failure("notices_mark_all_read", err),
    }
}

/// Removes every notice.
#[flutter_rust_bridge::frb(sync)]
pub fn notices_clear() -> StoreActionResponse {
    match STORE.try_with(|store| store.clear_notices()) {
        Ok(()) => StoreActionResponse::success("Notices cleared."),
        Err(err) => not_mounted_failure("notices_clear", err),
    }
}

fn read_or_default<R: Default>(
    operation: &str,
    f: impl FnOnce(&ScheduleStore<SqliteSlotStorage>) -> R,
) -> R {
    match STORE.try_with(|store| f(store)) {
        Ok(value) => value,
        Err(err) => {
            warn!("event={operation} module=ffi status=error error_code=store_not_mounted error={err}");
            R::default()
        }
    }
}

fn lock_mounted_path() -> MutexGuard<'static, Option<PathBuf>> {
    MOUNTED_PATH.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_mounted_failure(operation: &str, err: HandleError) -> StoreActionResponse {
    warn!("event={operation} module=ffi status=error error_code=store_not_mounted error={err}");
    StoreActionResponse::failure(format!("{operation} failed: {err}; call store_init first"))
}

fn to_schedule_item(schedule: &Schedule) -> ScheduleItem {
    ScheduleItem {
        id: schedule.id.to_string(),
        title: schedule.title.clone(),
        subject: schedule.subject.clone(),
        room: schedule.room.clone(),
        date: schedule.date.clone(),
        start: schedule.start.clone(),
        end: schedule.end.clone(),
        created_at: schedule.created_at,
    }
}

fn to_notice_item(notice: &Notice) -> NoticeItem {
    NoticeItem {
        id: notice.id.to_string(),
        kind: notice.kind.label().to_string(),
        message: notice.message.clone(),
        created_at: notice.created_at,
        read: notice.read,
    }
}
