//! Persisted schedule and notice store.
//!
//! # Responsibility
//! - Own the schedules and notices collections for the application lifetime.
//! - Persist each collection to its slot after every mutation.
//! - Notify subscribers once a mutation is complete.
//!
//! # Invariants
//! - Schedule and notice IDs are unique for the store lifetime.
//! - `created_at` values issued by one store are strictly increasing, also
//!   across reloads of the same storage.
//! - Both collections are kept most-recent-first by insertion.
//! - Persistence is best-effort: failures are logged and counted, never
//!   returned.
//! - Subscribers only ever observe post-mutation state.

use crate::model::notice::{Notice, NoticeId};
use crate::model::schedule::{NewSchedule, Schedule, ScheduleId};
use crate::repo::collection_repo::{load_collection, save_collection, PersistOutcome};
use crate::storage::{KeyValueStorage, NOTICES_KEY, SCHEDULES_KEY};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Mutation that just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    ScheduleAdded {
        schedule_id: ScheduleId,
        notice_id: NoticeId,
    },
    /// `updated` counts notices that were unread before the call.
    NoticesMarkedRead { updated: usize },
    NoticesCleared { removed: usize },
}

/// Read-only view of both collections handed to listeners.
#[derive(Debug, Clone, Copy)]
pub struct StoreSnapshot<'a> {
    pub schedules: &'a [Schedule],
    pub notices: &'a [Notice],
}

type Listener = Box<dyn FnMut(&StoreChange, StoreSnapshot<'_>) + Send>;

/// Store owning schedules and notices, persisted through `S`.
pub struct ScheduleStore<S: KeyValueStorage> {
    storage: S,
    schedules: Vec<Schedule>,
    notices: Vec<Notice>,
    last_issued_at: i64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    persist_failures: u64,
}

impl<S: KeyValueStorage> ScheduleStore<S> {
    /// Restores both collections from `storage`.
    ///
    /// Missing or corrupt slots load as empty collections.
    pub fn open(storage: S) -> Self {
        let schedules: Vec<Schedule> = load_collection(&storage, SCHEDULES_KEY);
        let notices: Vec<Notice> = load_collection(&storage, NOTICES_KEY);
        let last_issued_at = schedules
            .iter()
            .map(|schedule| schedule.created_at)
            .chain(notices.iter().map(|notice| notice.created_at))
            .max()
            .unwrap_or(i64::MIN);

        info!(
            "event=store_open module=store status=ok schedules={} notices={}",
            schedules.len(),
            notices.len()
        );

        Self {
            storage,
            schedules,
            notices,
            last_issued_at,
            listeners: Vec::new(),
            next_subscription: 0,
            persist_failures: 0,
        }
    }

    /// Schedules are most-recent-first by insertion.
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Notices are most-recent-first by insertion.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        StoreSnapshot {
            schedules: &self.schedules,
            notices: &self.notices,
        }
    }

    /// Schedules in chronological order (date, then start time).
    pub fn upcoming(&self) -> Vec<&Schedule> {
        let mut items = self.schedules.iter().collect::<Vec<_>>();
        items.sort_by(|a, b| a.chronological_cmp(b));
        items
    }

    /// Notices sorted by `created_at`, newest first.
    pub fn notices_newest_first(&self) -> Vec<&Notice> {
        let mut items = self.notices.iter().collect::<Vec<_>>();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub fn unread_count(&self) -> usize {
        self.notices.iter().filter(|notice| !notice.read).count()
    }

    /// Number of slot writes that failed since this store was opened.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    /// Records a new class session and its announcement notice.
    ///
    /// The payload is expected to be validated by the caller
    /// (see `ScheduleForm::validate`). This call cannot fail.
    pub fn add_schedule(&mut self, payload: NewSchedule) -> &Schedule {
        let created_at = self.next_timestamp();
        let schedule = Schedule::from_payload(Uuid::new_v4(), created_at, payload);
        let notice = Notice::for_schedule(&schedule);
        let change = StoreChange::ScheduleAdded {
            schedule_id: schedule.id,
            notice_id: notice.id,
        };

        self.schedules.insert(0, schedule);
        self.notices.insert(0, notice);
        self.persist_schedules();
        self.persist_notices();

        info!(
            "event=schedule_add module=store status=ok schedule_id={} schedules={} notices={}",
            self.schedules[0].id,
            self.schedules.len(),
            self.notices.len()
        );
        self.notify(change);
        &self.schedules[0]
    }

    /// Marks every notice as read. Idempotent.
    pub fn mark_all_read(&mut self) {
        let mut updated = 0;
        for notice in self.notices.iter_mut().filter(|notice| !notice.read) {
            notice.mark_read();
            updated += 1;
        }
        self.persist_notices();

        info!("event=notices_mark_read module=store status=ok updated={updated}");
        self.notify(StoreChange::NoticesMarkedRead { updated });
    }

    /// Removes every notice. Idempotent; schedules are untouched.
    pub fn clear_notices(&mut self) {
        let removed = self.notices.len();
        self.notices.clear();
        self.persist_notices();

        info!("event=notices_clear module=store status=ok removed={removed}");
        self.notify(StoreChange::NoticesCleared { removed });
    }

    /// Registers `listener` for every subsequent mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreChange, StoreSnapshot<'_>) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Consumes the store and returns its storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn next_timestamp(&mut self) -> i64 {
        let issued = now_epoch_ms().max(self.last_issued_at.saturating_add(1));
        self.last_issued_at = issued;
        issued
    }

    fn persist_schedules(&mut self) {
        let outcome = save_collection(&self.storage, SCHEDULES_KEY, &self.schedules);
        self.record(outcome);
    }

    fn persist_notices(&mut self) {
        let outcome = save_collection(&self.storage, NOTICES_KEY, &self.notices);
        self.record(outcome);
    }

    fn record(&mut self, outcome: PersistOutcome) {
        if !outcome.is_saved() {
            self.persist_failures += 1;
        }
    }

    fn notify(&mut self, change: StoreChange) {
        if self.listeners.is_empty() {
            return;
        }

        let mut listeners = std::mem::take(&mut self.listeners);
        let snapshot = self.snapshot();
        for (_, listener) in listeners.iter_mut() {
            listener(&change, snapshot);
        }
        self.listeners = listeners;
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
