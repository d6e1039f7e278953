//! Hangover Club engine.
//!
//! The pure core (scoring, aggregation, ranking, event classification)
//! lives in [`scoring`], [`stats`], [`ranking`] and [`events`]. The
//! [`Engine`] persists users, groups, drinks and events through `sea-orm`
//! and feeds stored data through that core.

pub use comments::Comment;
pub use drinks::{Drink, DrinkRecord, DrinkType, NewDrink};
pub use error::EngineError;
pub use events::{
    Attendance, Attendee, Event, EventDetail, EventStatus, EventUpdate, EventWindow, NewEvent,
    duration_hours,
};
pub use group_members::{GroupMember, GroupRole};
pub use groups::Group;
pub use ops::{Engine, EngineBuilder, GroupDashboard, GroupUpdate};
pub use ranking::{MemberTotals, RankMetric, SortOrder, rank, select_metric};
pub use scoring::{points_per_hundred_ml, score, score_named};
pub use stats::{
    AggregateBucket, Averages, BucketKey, GroupAverages, GroupTotals, TimePeriod, Totals,
    aggregate_by_time_period, aggregate_by_type, summarize, totals_by,
};
pub use users::User;

pub mod events;
pub mod ranking;
pub mod scoring;
pub mod stats;

mod comments;
mod drink_comments;
mod drinks;
mod error;
mod event_attendees;
mod event_comments;
mod group_members;
mod groups;
mod ops;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
