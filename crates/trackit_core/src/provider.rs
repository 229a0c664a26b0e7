//! Mountable shared handle for the application's single schedule store.
//!
//! # Responsibility
//! - Give page-level code access to the store mounted at application start.
//! - Tie the store lifetime to explicit `mount` / `unmount` calls.
//!
//! # Invariants
//! - At most one store is mounted per handle.
//! - `with` on an unmounted handle is a programming error and panics.
//! - `try_with` never panics; boundaries that must not unwind use it.

use crate::service::schedule_store::ScheduleStore;
use crate::storage::KeyValueStorage;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

const NOT_MOUNTED_MESSAGE: &str = "schedule store used outside of a mounted provider";

/// Provider lifecycle misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    NotMounted,
    AlreadyMounted,
}

impl Display for HandleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotMounted => write!(f, "{NOT_MOUNTED_MESSAGE}"),
            Self::AlreadyMounted => write!(f, "schedule store provider is already mounted"),
        }
    }
}

impl Error for HandleError {}

/// Shared slot holding the mounted store.
///
/// `new` is `const`, so a handle can live in a `static`.
pub struct StoreHandle<S: KeyValueStorage> {
    inner: Mutex<Option<ScheduleStore<S>>>,
}

impl<S: KeyValueStorage> StoreHandle<S> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Mounts `store` for the rest of the application lifetime.
    ///
    /// # Errors
    /// - `HandleError::AlreadyMounted` when a store is already mounted; the
    ///   passed store is dropped.
    pub fn mount(&self, store: ScheduleStore<S>) -> Result<(), HandleError> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(HandleError::AlreadyMounted);
        }
        *slot = Some(store);
        info!("event=provider_mount module=provider status=ok");
        Ok(())
    }

    /// Unmounts and returns the store, if any.
    pub fn unmount(&self) -> Option<ScheduleStore<S>> {
        let store = self.lock().take();
        if store.is_some() {
            info!("event=provider_unmount module=provider status=ok");
        }
        store
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().is_some()
    }

    /// Runs `f` against the mounted store.
    ///
    /// # Panics
    /// - When no store is mounted.
    pub fn with<R>(&self, f: impl FnOnce(&mut ScheduleStore<S>) -> R) -> R {
        match self.try_with(f) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Runs `f` against the mounted store, or reports `NotMounted`.
    pub fn try_with<R>(
        &self,
        f: impl FnOnce(&mut ScheduleStore<S>) -> R,
    ) -> Result<R, HandleError> {
        let mut slot = self.lock();
        let store = slot.as_mut().ok_or(HandleError::NotMounted)?;
        Ok(f(store))
    }

    fn lock(&self) -> MutexGuard<'_, Option<ScheduleStore<S>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: KeyValueStorage> Default for StoreHandle<S> {
    fn default() -> Self {
        Self::new()
    }
}
