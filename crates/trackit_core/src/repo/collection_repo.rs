//! JSON collection persistence over key-value slots.
//!
//! # Responsibility
//! - Restore a whole collection from its slot.
//! - Serialize and write a whole collection on every change.
//!
//! # Invariants
//! - Loading never fails: a missing, unreadable or corrupt slot is an empty
//!   collection.
//! - Saving never fails outward: the outcome is returned for logging only.

use crate::storage::KeyValueStorage;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result of one best-effort collection write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    Failed(String),
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Restores the collection stored under `key`.
///
/// Returns an empty collection when the slot is absent, the backend cannot be
/// read, or the stored text is not a valid JSON array of `T`.
pub fn load_collection<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=slot_load module=repo status=empty key={key}");
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=slot_load module=repo status=error key={key} error_code=slot_unreadable error={err}"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!(
                "event=slot_load module=repo status=ok key={key} items={}",
                items.len()
            );
            items
        }
        Err(err) => {
            warn!(
                "event=slot_load module=repo status=error key={key} error_code=slot_corrupt error={err}"
            );
            Vec::new()
        }
    }
}

/// Writes the full `items` collection to the slot under `key`.
pub fn save_collection<T, S>(storage: &S, key: &str, items: &[T]) -> PersistOutcome
where
    T: Serialize,
    S: KeyValueStorage + ?Sized,
{
    let raw = match serde_json::to_string(items) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                "event=slot_save module=repo status=error key={key} error_code=serialize_failed error={err}"
            );
            return PersistOutcome::Failed(err.to_string());
        }
    };

    match storage.set_item(key, &raw) {
        Ok(()) => {
            debug!(
                "event=slot_save module=repo status=ok key={key} items={} bytes={}",
                items.len(),
                raw.len()
            );
            PersistOutcome::Saved
        }
        Err(err) => {
            warn!(
                "event=slot_save module=repo status=error key={key} error_code=write_failed error={err}"
            );
            PersistOutcome::Failed(err.to_string())
        }
    }
}
