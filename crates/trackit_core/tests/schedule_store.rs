use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use trackit_core::{
    KeyValueStorage, MemoryStorage, NewSchedule, NoticeKind, ScheduleStore, SqliteSlotStorage,
    StorageError, StorageResult, StoreChange, NOTICES_KEY, SCHEDULES_KEY,
};

fn eng_lecture() -> NewSchedule {
    NewSchedule {
        title: "ENG-101 Lecture".to_string(),
        subject: "English".to_string(),
        room: "A2".to_string(),
        date: "2024-05-01".to_string(),
        start: "09:00".to_string(),
        end: "09:50".to_string(),
    }
}

fn class(title: &str, date: &str, start: &str) -> NewSchedule {
    NewSchedule {
        title: title.to_string(),
        subject: "Physics".to_string(),
        room: "Lab 3".to_string(),
        date: date.to_string(),
        start: start.to_string(),
        end: "23:59".to_string(),
    }
}

/// Storage whose every call fails, as when the backend is unavailable.
struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("detached".to_string()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("detached".to_string()))
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("detached".to_string()))
    }
}

#[test]
fn add_schedule_on_empty_store_records_schedule_and_notice() {
    let mut store = ScheduleStore::open(MemoryStorage::new());

    let created = store.add_schedule(eng_lecture()).clone();

    assert_eq!(store.schedules().len(), 1);
    let schedule = &store.schedules()[0];
    assert_eq!(schedule, &created);
    assert_eq!(schedule.title, "ENG-101 Lecture");
    assert_eq!(schedule.subject, "English");
    assert_eq!(schedule.room, "A2");
    assert_eq!(schedule.date, "2024-05-01");
    assert_eq!(schedule.start, "09:00");
    assert_eq!(schedule.end, "09:50");

    assert_eq!(store.notices().len(), 1);
    let notice = &store.notices()[0];
    assert_eq!(notice.kind, NoticeKind::Schedule);
    assert!(!notice.read);
    for fragment in ["ENG-101 Lecture", "English", "A2", "2024-05-01", "09:00", "09:50"] {
        assert!(
            notice.message.contains(fragment),
            "notice message `{}` is missing `{fragment}`",
            notice.message
        );
    }
}

#[test]
fn mark_all_read_then_clear_leaves_schedules_untouched() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.add_schedule(eng_lecture());
    let schedules_before = store.schedules().to_vec();

    store.mark_all_read();
    assert_eq!(store.notices().len(), 1);
    assert!(store.notices()[0].read);
    assert_eq!(store.schedules(), schedules_before.as_slice());

    store.clear_notices();
    assert!(store.notices().is_empty());
    assert_eq!(store.schedules(), schedules_before.as_slice());
}

#[test]
fn repeated_adds_keep_unique_ids_and_one_notice_each() {
    let mut store = ScheduleStore::open(MemoryStorage::new());

    for index in 0..25 {
        let notices_before = store.notices().len();
        store.add_schedule(class(&format!("class {index}"), "2024-06-01", "08:00"));
        assert_eq!(store.notices().len(), notices_before + 1);
        assert_eq!(store.notices()[0].kind, NoticeKind::Schedule);
        assert!(!store.notices()[0].read);
    }

    assert_eq!(store.schedules().len(), 25);
    let ids = store
        .schedules()
        .iter()
        .map(|schedule| schedule.id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 25);
    assert_eq!(store.schedules()[0].title, "class 24");
}

#[test]
fn mark_all_read_is_idempotent() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.add_schedule(class("a", "2024-06-01", "08:00"));
    store.add_schedule(class("b", "2024-06-01", "09:00"));

    store.mark_all_read();
    let once = store.notices().to_vec();
    store.mark_all_read();

    assert_eq!(store.notices(), once.as_slice());
    assert!(store.notices().iter().all(|notice| notice.read));
    assert_eq!(store.unread_count(), 0);
}

#[test]
fn clear_notices_on_empty_store_is_noop() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.clear_notices();
    store.clear_notices();
    assert!(store.notices().is_empty());
    assert!(store.schedules().is_empty());
}

#[test]
fn derived_views_sort_without_touching_stored_order() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.add_schedule(class("late", "2024-06-02", "08:00"));
    store.add_schedule(class("early", "2024-06-01", "13:00"));
    store.add_schedule(class("earliest", "2024-06-01", "08:30"));

    let upcoming = store
        .upcoming()
        .into_iter()
        .map(|schedule| schedule.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(upcoming, vec!["earliest", "early", "late"]);

    let newest = store.notices_newest_first();
    assert!(newest[0].message.contains("earliest"));
    assert!(newest[2].message.contains("late"));
    assert_eq!(store.schedules()[0].title, "earliest");
}

#[test]
fn reopening_same_storage_restores_both_collections() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.add_schedule(class("first", "2024-06-01", "08:00"));
    store.add_schedule(class("second", "2024-06-01", "09:00"));
    store.mark_all_read();
    store.add_schedule(class("third", "2024-06-01", "10:00"));
    let schedules = store.schedules().to_vec();
    let notices = store.notices().to_vec();

    let reopened = ScheduleStore::open(store.into_storage());

    assert_eq!(reopened.schedules(), schedules.as_slice());
    assert_eq!(reopened.notices(), notices.as_slice());
    assert_eq!(reopened.unread_count(), 1);
}

#[test]
fn cleared_notices_stay_cleared_after_reload() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.add_schedule(eng_lecture());
    store.clear_notices();
    let schedules = store.schedules().to_vec();

    let reopened = ScheduleStore::open(store.into_storage());

    assert!(reopened.notices().is_empty());
    assert_eq!(reopened.schedules(), schedules.as_slice());
    let snapshot = reopened.snapshot();
    assert_eq!(snapshot.schedules.len(), 1);
    assert!(snapshot.notices.is_empty());
}

#[test]
fn timestamps_keep_increasing_after_reload() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    store.add_schedule(class("before", "2024-06-01", "08:00"));
    let last_before = store.schedules()[0].created_at;

    let mut reopened = ScheduleStore::open(store.into_storage());
    let created_at = reopened
        .add_schedule(class("after", "2024-06-01", "09:00"))
        .created_at;

    assert!(created_at > last_before);
}

#[test]
fn corrupt_slots_load_as_empty_collections() {
    let storage = MemoryStorage::with_slots([
        (SCHEDULES_KEY, "not json at all"),
        (NOTICES_KEY, r#"[{"id":"oops"}]"#),
    ]);

    let mut store = ScheduleStore::open(storage);
    assert!(store.schedules().is_empty());
    assert!(store.notices().is_empty());

    store.add_schedule(eng_lecture());
    assert_eq!(store.schedules().len(), 1);
}

#[test]
fn slots_written_by_web_front_end_are_readable() {
    let schedules = r#"[{"id":"0b0e6f52-8f0a-4a53-9d3f-2b8c9f2f3c11","title":"BIO-7","subject":"Biology","room":"C4","date":"2024-04-30","start":"11:00","end":"11:45","createdAt":1714470000000}]"#;
    let notices = r#"[{"id":"6a8d0c3e-51c4-4c43-a0c5-0e4a3d7f9b21","type":"update","message":"Portal maintenance","createdAt":1714470000001,"read":true}]"#;
    let storage = MemoryStorage::with_slots([(SCHEDULES_KEY, schedules), (NOTICES_KEY, notices)]);

    let store = ScheduleStore::open(storage);

    assert_eq!(store.schedules()[0].title, "BIO-7");
    assert_eq!(store.schedules()[0].created_at, 1_714_470_000_000);
    assert_eq!(store.notices()[0].kind, NoticeKind::Update);
    assert!(store.notices()[0].read);
}

#[test]
fn unavailable_storage_keeps_in_memory_state_authoritative() {
    let mut store = ScheduleStore::open(UnavailableStorage);
    assert!(store.schedules().is_empty());

    store.add_schedule(eng_lecture());
    store.mark_all_read();

    assert_eq!(store.schedules().len(), 1);
    assert_eq!(store.notices().len(), 1);
    assert!(store.notices()[0].read);
    assert_eq!(store.persist_failures(), 3);

    store.clear_notices();
    assert!(store.notices().is_empty());
    assert_eq!(store.schedules().len(), 1);
    assert_eq!(store.persist_failures(), 4);
}

#[test]
fn subscribers_observe_post_mutation_state() {
    let mut store = ScheduleStore::open(MemoryStorage::new());
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    store.subscribe(move |change, snapshot| {
        sink.lock()
            .unwrap()
            .push((*change, snapshot.schedules.len(), snapshot.notices.len()));
    });

    let schedule_id = store.add_schedule(eng_lecture()).id;
    let notice_id = store.notices()[0].id;
    store.mark_all_read();
    store.clear_notices();

    assert_eq!(
        *observed.lock().unwrap(),
        vec![
            (
                StoreChange::ScheduleAdded {
                    schedule_id,
                    notice_id
                },
                1,
                1
            ),
            (StoreChange::NoticesMarkedRead { updated: 1 }, 1, 1),
            (StoreChange::NoticesCleared { removed: 1 }, 1, 0),
        ]
    );
}

#[test]
fn sqlite_backed_store_survives_reopen_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackit.sqlite3");

    {
        let mut store = ScheduleStore::open(SqliteSlotStorage::open(&path).unwrap());
        store.add_schedule(eng_lecture());
        store.add_schedule(class("PHY-2 Lab", "2024-05-03", "14:00"));
        store.mark_all_read();
    }

    let store = ScheduleStore::open(SqliteSlotStorage::open(&path).unwrap());
    assert_eq!(store.schedules().len(), 2);
    assert_eq!(store.schedules()[0].title, "PHY-2 Lab");
    assert_eq!(store.notices().len(), 2);
    assert!(store.notices().iter().all(|notice| notice.read));
}
