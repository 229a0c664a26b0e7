//! Notice domain model.
//!
//! # Responsibility
//! - Define the user-visible notification record.
//! - Format the notice emitted when a class is scheduled.
//!
//! # Invariants
//! - `read` starts as `false` and only moves to `true`.

use crate::model::schedule::Schedule;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a notice.
pub type NoticeId = Uuid;

/// Notice category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Emitted when a class session is scheduled.
    Schedule,
    /// Generic update.
    Update,
}

impl NoticeKind {
    /// Display label used by the notifications page.
    pub fn label(self) -> &'static str {
        match self {
            Self::Schedule => "Schedule",
            Self::Update => "Update",
        }
    }
}

/// One notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: NoticeId,
    /// Serialized as `type` to match the stored slot shape.
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub message: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub read: bool,
}

impl Notice {
    /// Creates an unread notice with a generated ID.
    pub fn new(kind: NoticeKind, message: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at,
            read: false,
        }
    }

    /// Synthesizes the unread notice announcing `schedule`.
    pub fn for_schedule(schedule: &Schedule) -> Self {
        Self::new(
            NoticeKind::Schedule,
            schedule_message(schedule),
            schedule.created_at,
        )
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

fn schedule_message(schedule: &Schedule) -> String {
    format!(
        "New class scheduled: {} ({}) in {} on {} {}\u{2013}{}",
        schedule.title, schedule.subject, schedule.room, schedule.date, schedule.start, schedule.end
    )
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeKind};
    use crate::model::schedule::Schedule;
    use uuid::Uuid;

    fn lecture() -> Schedule {
        Schedule {
            id: Uuid::new_v4(),
            title: "ENG-101 Lecture".to_string(),
            subject: "English".to_string(),
            room: "A2".to_string(),
            date: "2024-05-01".to_string(),
            start: "09:00".to_string(),
            end: "09:50".to_string(),
            created_at: 1_714_550_000_000,
        }
    }

    #[test]
    fn for_schedule_formats_summary_message() {
        let notice = Notice::for_schedule(&lecture());
        assert_eq!(
            notice.message,
            "New class scheduled: ENG-101 Lecture (English) in A2 on 2024-05-01 09:00\u{2013}09:50"
        );
        assert_eq!(notice.kind, NoticeKind::Schedule);
        assert_eq!(notice.created_at, 1_714_550_000_000);
        assert!(!notice.read);
    }

    #[test]
    fn kind_serializes_under_type_key() {
        let notice = Notice::new(NoticeKind::Update, "maintenance tonight", 7);
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "update");
        assert_eq!(json["createdAt"], 7);
        assert_eq!(json["read"], false);
    }
}
