//! Schedule domain model.
//!
//! # Responsibility
//! - Define the class-session record created from the teacher form.
//! - Validate raw form input before it reaches the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another schedule.
//! - Schedules are immutable after creation.
//! - `date` is `YYYY-MM-DD` and `start`/`end` are `HH:mm`, so lexicographic
//!   order equals chronological order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a scheduled class session.
pub type ScheduleId = Uuid;

const TITLE_MIN_CHARS: usize = 2;
const SUBJECT_MIN_CHARS: usize = 2;
const ROOM_MIN_CHARS: usize = 1;

/// One scheduled class session.
///
/// Serialized with camelCase names to stay compatible with slots written by
/// the web front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub title: String,
    pub subject: String,
    pub room: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time, `HH:mm`.
    pub start: String,
    /// End time, `HH:mm`.
    pub end: String,
    /// Unix epoch milliseconds. Strictly increasing per store.
    pub created_at: i64,
}

impl Schedule {
    /// Builds a schedule from a payload plus store-issued identity.
    pub fn from_payload(id: ScheduleId, created_at: i64, payload: NewSchedule) -> Self {
        Self {
            id,
            title: payload.title,
            subject: payload.subject,
            room: payload.room,
            date: payload.date,
            start: payload.start,
            end: payload.end,
            created_at,
        }
    }

    /// Orders by `date`, then `start`.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.start.cmp(&other.start))
    }
}

/// `add_schedule` payload: a schedule minus `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedule {
    pub title: String,
    pub subject: String,
    pub room: String,
    pub date: String,
    pub start: String,
    pub end: String,
}

/// Raw teacher-form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    pub title: String,
    pub subject: String,
    pub room: String,
    pub date: String,
    pub start: String,
    pub end: String,
}

impl ScheduleForm {
    /// Validates every field and returns a trimmed payload.
    ///
    /// # Errors
    /// - Returns all field errors at once, in form order.
    pub fn validate(&self) -> Result<NewSchedule, ScheduleFormError> {
        let mut errors = Vec::new();

        let title = check_min_chars(
            "title",
            &self.title,
            TITLE_MIN_CHARS,
            "Title required",
            &mut errors,
        );
        let subject = check_min_chars(
            "subject",
            &self.subject,
            SUBJECT_MIN_CHARS,
            "Subject required",
            &mut errors,
        );
        let room = check_min_chars(
            "room",
            &self.room,
            ROOM_MIN_CHARS,
            "Room required",
            &mut errors,
        );
        let date = check_min_chars("date", &self.date, 1, "Pick date", &mut errors);
        let start = check_min_chars("start", &self.start, 1, "Start time", &mut errors);
        let end = check_min_chars("end", &self.end, 1, "End time", &mut errors);

        if !errors.is_empty() {
            return Err(ScheduleFormError { errors });
        }

        Ok(NewSchedule {
            title,
            subject,
            room,
            date,
            start,
            end,
        })
    }
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name (`title`, `subject`, ...).
    pub field: &'static str,
    /// User-facing message shown under the field.
    pub message: &'static str,
}

/// Form validation failure carrying every field error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFormError {
    pub errors: Vec<FieldError>,
}

impl ScheduleFormError {
    /// Returns the message for `field`, if that field was rejected.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

impl Display for ScheduleFormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>();
        write!(f, "invalid schedule form ({})", fields.join(", "))
    }
}

impl Error for ScheduleFormError {}

fn check_min_chars(
    field: &'static str,
    value: &str,
    min_chars: usize,
    message: &'static str,
    errors: &mut Vec<FieldError>,
) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() < min_chars {
        errors.push(FieldError { field, message });
    }
    trimmed.to_string()
}
