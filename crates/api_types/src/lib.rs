use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment on a drink or an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentNew {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentView>,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRegister {
        pub username: String,
        pub name: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserLogin {
        pub username: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub name: String,
    }
}

pub mod group {
    use super::*;

    /// Role of a user inside a group.
    ///
    /// - `admin`: edits the group and manages members.
    /// - `member`: logs drinks, creates events and comments.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GroupRole {
        Admin,
        Member,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
    }

    /// Partial update. Absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GroupUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub owner: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub username: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub name: String,
        pub role: GroupRole,
        pub joined_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod drink {
    use super::*;

    /// Drink category. Accepts the labels of the first web client, in any
    /// case, as aliases.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case", try_from = "String")]
    pub enum DrinkType {
        Beer,
        Wine,
        Spirit,
        Cocktail,
        Shot,
        Other,
    }

    impl TryFrom<String> for DrinkType {
        type Error = String;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            match value.trim().to_lowercase().as_str() {
                "beer" | "cerveja" => Ok(Self::Beer),
                "wine" | "vinho" => Ok(Self::Wine),
                "spirit" | "destilado" => Ok(Self::Spirit),
                "cocktail" | "coquetel" => Ok(Self::Cocktail),
                "shot" => Ok(Self::Shot),
                "other" | "outro" => Ok(Self::Other),
                _ => Err(format!("unknown drink type: {value}")),
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DrinkNew {
        pub group_id: Uuid,
        pub event_id: Option<Uuid>,
        pub name: String,
        pub drink_type: DrinkType,
        pub brand: String,
        /// Milliliters, must be > 0.
        pub volume_ml: i64,
        pub location: Option<String>,
        /// URL of the photo in object storage.
        pub photo_url: String,
        /// If absent, server uses now().
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DrinkView {
        pub id: Uuid,
        pub user_id: String,
        pub group_id: Uuid,
        pub event_id: Option<Uuid>,
        pub name: String,
        pub drink_type: DrinkType,
        pub brand: String,
        pub volume_ml: i64,
        pub location: Option<String>,
        pub photo_url: String,
        pub points: f64,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DrinksResponse {
        pub drinks: Vec<DrinkView>,
    }
}

pub mod event {
    use super::*;

    /// Answer to an invitation. The Portuguese answers are accepted too.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case", try_from = "String")]
    pub enum Attendance {
        Yes,
        Maybe,
        No,
    }

    impl TryFrom<String> for Attendance {
        type Error = String;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            match value.trim().to_lowercase().as_str() {
                "yes" | "sim" => Ok(Self::Yes),
                "maybe" | "talvez" => Ok(Self::Maybe),
                "no" | "não" | "nao" => Ok(Self::No),
                _ => Err(format!("invalid attendance status: {value}")),
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EventStatus {
        Past,
        Current,
        Future,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventNew {
        pub group_id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub location: String,
        pub start: DateTime<Utc>,
        /// Must be after `start`.
        pub end: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EventUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub location: Option<String>,
        pub start: Option<DateTime<Utc>>,
        pub end: Option<DateTime<Utc>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct EventView {
        pub id: Uuid,
        pub group_id: Uuid,
        pub created_by: String,
        pub name: String,
        pub description: Option<String>,
        pub location: String,
        pub start: DateTime<Utc>,
        pub end: DateTime<Utc>,
        /// Status at the time the response was built.
        pub status: EventStatus,
        pub duration_hours: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct EventsResponse {
        pub events: Vec<EventView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceSet {
        pub status: Attendance,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AttendeeView {
        pub username: String,
        pub name: String,
        pub status: Attendance,
        pub confirmed_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AttendeesResponse {
        pub attendees: Vec<AttendeeView>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct EventDetail {
        pub event: EventView,
        pub attendees: Vec<AttendeeView>,
        pub comments: Vec<CommentView>,
    }
}

pub mod stats {
    use super::*;
    use crate::drink::DrinkType;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TimePeriod {
        Morning,
        Afternoon,
        Evening,
        Night,
    }

    /// Leaderboard column.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RankMetric {
        #[default]
        Points,
        #[serde(alias = "totalDrinks")]
        TotalDrinks,
        #[serde(alias = "totalLiters")]
        TotalLiters,
        #[serde(alias = "totalPartyHours")]
        TotalPartyHours,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        Asc,
        #[default]
        Desc,
    }

    /// Query string of the ranking endpoint. Defaults to points, descending.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RankingQuery {
        pub metric: Option<RankMetric>,
        pub order: Option<SortOrder>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MemberTotals {
        pub username: String,
        pub name: String,
        pub total_drinks: u64,
        pub total_liters: f64,
        pub total_points: f64,
        pub total_party_hours: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RankingResponse {
        pub metric: RankMetric,
        pub order: SortOrder,
        pub members: Vec<MemberTotals>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TypeBucket {
        pub drink_type: DrinkType,
        pub count: u64,
        pub total_liters: f64,
        pub total_points: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PeriodBucket {
        pub period: TimePeriod,
        pub count: u64,
        pub total_liters: f64,
        pub total_points: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GroupTotals {
        pub drinks: u64,
        pub liters: f64,
        pub points: f64,
        pub party_hours: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Averages {
        pub drinks: f64,
        pub liters: f64,
        pub points: f64,
        pub party_hours: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Dashboard {
        pub totals: GroupTotals,
        pub by_type: Vec<TypeBucket>,
        /// Always four buckets, morning to night.
        pub by_period: Vec<PeriodBucket>,
        /// Top ten by points.
        pub ranking: Vec<MemberTotals>,
        pub member_count: u64,
        pub total_events: u64,
        pub upcoming_events: u64,
        /// Absent when the group has no members.
        pub per_member: Option<Averages>,
        /// Absent when the group has no events.
        pub per_event: Option<Averages>,
    }
}

#[cfg(test)]
mod tests {
    use super::{drink::DrinkType, event::Attendance, stats::RankMetric};

    #[test]
    fn drink_type_accepts_legacy_labels() {
        let kind: DrinkType = serde_json::from_str("\"Cerveja\"").unwrap();
        assert_eq!(kind, DrinkType::Beer);
        let kind: DrinkType = serde_json::from_str("\"cocktail\"").unwrap();
        assert_eq!(kind, DrinkType::Cocktail);
        let kind: DrinkType = serde_json::from_str("\"cerveja\"").unwrap();
        assert_eq!(kind, DrinkType::Beer);
        let kind: DrinkType = serde_json::from_str("\" DESTILADO \"").unwrap();
        assert_eq!(kind, DrinkType::Spirit);
        assert_eq!(serde_json::to_string(&DrinkType::Spirit).unwrap(), "\"spirit\"");
        assert!(serde_json::from_str::<DrinkType>("\"Suco\"").is_err());
    }

    #[test]
    fn attendance_accepts_legacy_answers() {
        let status: Attendance = serde_json::from_str("\"não\"").unwrap();
        assert_eq!(status, Attendance::No);
        let status: Attendance = serde_json::from_str("\"sim\"").unwrap();
        assert_eq!(status, Attendance::Yes);
        let status: Attendance = serde_json::from_str("\"Talvez\"").unwrap();
        assert_eq!(status, Attendance::Maybe);
        assert_eq!(serde_json::to_string(&Attendance::Maybe).unwrap(), "\"maybe\"");
    }

    #[test]
    fn rank_metric_accepts_camel_case() {
        let metric: RankMetric = serde_json::from_str("\"totalPartyHours\"").unwrap();
        assert_eq!(metric, RankMetric::TotalPartyHours);
        assert_eq!(
            serde_json::to_string(&RankMetric::TotalLiters).unwrap(),
            "\"total_liters\""
        );
    }
}
