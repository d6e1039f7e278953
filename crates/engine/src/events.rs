//! Group events: time window, status and attendance.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventStatus {
    Future,
    Current,
    Past,
}

impl EventStatus {
    /// `Current` includes both bounds of the window.
    pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            Self::Future
        } else if now > end {
            Self::Past
        } else {
            Self::Current
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Current => "current",
            Self::Past => "past",
        }
    }
}

/// Length of a window in fractional hours.
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

/// A validated event window (`end` strictly after `start`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl EventWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ResultEngine<Self> {
        if end <= start {
            return Err(EngineError::InvalidEventWindow(format!(
                "end {end} must be after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn status(&self, now: DateTime<Utc>) -> EventStatus {
        EventStatus::classify(now, self.start, self.end)
    }

    pub fn duration_hours(&self) -> f64 {
        duration_hours(self.start, self.end)
    }

    /// Hours of the window already elapsed at `now`.
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        match self.status(now) {
            EventStatus::Future => 0.0,
            EventStatus::Current => duration_hours(self.start, now),
            EventStatus::Past => self.duration_hours(),
        }
    }
}

/// Answer of a member to an event invitation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attendance {
    Yes,
    Maybe,
    No,
}

impl Attendance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Maybe => "maybe",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Attendance {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "yes" | "sim" => Ok(Self::Yes),
            "maybe" | "talvez" => Ok(Self::Maybe),
            "no" | "nao" | "não" => Ok(Self::No),
            other => Err(EngineError::InvalidInput(format!(
                "invalid attendance status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub group_id: Uuid,
    pub created_by: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub window: EventWindow,
}

impl TryFrom<Model> for Event {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            group_id: model.group_id,
            created_by: model.created_by,
            name: model.name,
            description: model.description,
            location: model.location,
            window: EventWindow::new(model.start_at, model.end_at)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attendee {
    pub username: String,
    pub name: String,
    pub status: Attendance,
    pub confirmed_at: DateTime<Utc>,
}

/// An event together with its attendees and comments.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDetail {
    pub event: Event,
    pub attendees: Vec<Attendee>,
    pub comments: Vec<crate::Comment>,
}

#[derive(Clone, Debug)]
pub struct NewEvent {
    pub group_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub group_id: Uuid,
    pub created_by: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(has_many = "super::event_attendees::Entity")]
    Attendees,
    #[sea_orm(has_many = "super::event_comments::Entity")]
    Comments,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::event_attendees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendees.def()
    }
}

impl Related<super::event_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn overnight_event_is_current() {
        let start = utc(2025, 6, 1, 20);
        let end = utc(2025, 6, 2, 2);
        let now = utc(2025, 6, 1, 21);
        assert_eq!(EventStatus::classify(now, start, end), EventStatus::Current);
        assert_eq!(duration_hours(start, end), 6.0);
    }

    #[test]
    fn classification_bounds() {
        let window = EventWindow::new(utc(2025, 6, 1, 20), utc(2025, 6, 2, 2)).unwrap();
        assert_eq!(window.status(utc(2025, 6, 1, 19)), EventStatus::Future);
        assert_eq!(window.status(utc(2025, 6, 1, 20)), EventStatus::Current);
        assert_eq!(window.status(utc(2025, 6, 2, 2)), EventStatus::Current);
        assert_eq!(window.status(utc(2025, 6, 2, 3)), EventStatus::Past);
    }

    #[test]
    fn window_must_end_after_start() {
        let start = utc(2025, 6, 1, 20);
        assert!(matches!(
            EventWindow::new(start, start),
            Err(EngineError::InvalidEventWindow(_))
        ));
        assert!(matches!(
            EventWindow::new(start, utc(2025, 6, 1, 18)),
            Err(EngineError::InvalidEventWindow(_))
        ));
    }

    #[test]
    fn elapsed_hours_clip_to_now() {
        let window = EventWindow::new(utc(2025, 6, 1, 20), utc(2025, 6, 2, 2)).unwrap();
        assert_eq!(window.elapsed_hours(utc(2025, 6, 1, 10)), 0.0);
        assert_eq!(window.elapsed_hours(utc(2025, 6, 1, 23)), 3.0);
        assert_eq!(window.elapsed_hours(utc(2025, 6, 3, 0)), 6.0);
    }

    #[test]
    fn attendance_accepts_legacy_answers() {
        assert_eq!(Attendance::try_from("sim").unwrap(), Attendance::Yes);
        assert_eq!(Attendance::try_from("Talvez").unwrap(), Attendance::Maybe);
        assert_eq!(Attendance::try_from("no").unwrap(), Attendance::No);
        assert!(Attendance::try_from("later").is_err());
    }
}
