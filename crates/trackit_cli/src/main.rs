//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `trackit_core` linkage without the Flutter/FFI runtime.
//! - Print a deterministic summary of the store at `TRACKIT_DB_PATH`.

use std::process::ExitCode;
use trackit_core::{resolve_db_path, ScheduleStore, SqliteSlotStorage};

fn main() -> ExitCode {
    println!("trackit_core ping={}", trackit_core::ping());
    println!("trackit_core version={}", trackit_core::core_version());

    let db_path = resolve_db_path();
    let storage = match SqliteSlotStorage::open(&db_path) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("trackit_core store_open=error path={} error={err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let store = ScheduleStore::open(storage);
    println!("trackit_core db_path={}", db_path.display());
    println!("trackit_core schedules={}", store.schedules().len());
    println!(
        "trackit_core notices={} unread={}",
        store.notices().len(),
        store.unread_count()
    );
    ExitCode::SUCCESS
}
