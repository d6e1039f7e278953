//! Mapping between engine values and wire types.

use api_types::{
    CommentView,
    drink::{DrinkType as ApiDrinkType, DrinkView},
    event::{Attendance as ApiAttendance, AttendeeView, EventStatus as ApiEventStatus, EventView},
    group::{GroupRole as ApiGroupRole, GroupView, MemberView},
    stats::{
        Averages as ApiAverages, MemberTotals as ApiMemberTotals, PeriodBucket,
        RankMetric as ApiRankMetric, SortOrder as ApiSortOrder, TimePeriod as ApiTimePeriod,
        TypeBucket,
    },
    user::UserView,
};
use chrono::{DateTime, Utc};
use engine::{
    AggregateBucket, Attendance, Attendee, Averages, BucketKey, Comment, Drink, DrinkType, Event,
    EventStatus, Group, GroupMember, GroupRole, MemberTotals, RankMetric, SortOrder, TimePeriod,
    User,
};

pub(crate) fn drink_type(kind: ApiDrinkType) -> DrinkType {
    match kind {
        ApiDrinkType::Beer => DrinkType::Beer,
        ApiDrinkType::Wine => DrinkType::Wine,
        ApiDrinkType::Spirit => DrinkType::Spirit,
        ApiDrinkType::Cocktail => DrinkType::Cocktail,
        ApiDrinkType::Shot => DrinkType::Shot,
        ApiDrinkType::Other => DrinkType::Other,
    }
}

fn api_drink_type(kind: DrinkType) -> ApiDrinkType {
    match kind {
        DrinkType::Beer => ApiDrinkType::Beer,
        DrinkType::Wine => ApiDrinkType::Wine,
        DrinkType::Spirit => ApiDrinkType::Spirit,
        DrinkType::Cocktail => ApiDrinkType::Cocktail,
        DrinkType::Shot => ApiDrinkType::Shot,
        DrinkType::Other => ApiDrinkType::Other,
    }
}

pub(crate) fn attendance(status: ApiAttendance) -> Attendance {
    match status {
        ApiAttendance::Yes => Attendance::Yes,
        ApiAttendance::Maybe => Attendance::Maybe,
        ApiAttendance::No => Attendance::No,
    }
}

fn api_attendance(status: Attendance) -> ApiAttendance {
    match status {
        Attendance::Yes => ApiAttendance::Yes,
        Attendance::Maybe => ApiAttendance::Maybe,
        Attendance::No => ApiAttendance::No,
    }
}

pub(crate) fn rank_metric(metric: ApiRankMetric) -> RankMetric {
    match metric {
        ApiRankMetric::Points => RankMetric::Points,
        ApiRankMetric::TotalDrinks => RankMetric::TotalDrinks,
        ApiRankMetric::TotalLiters => RankMetric::TotalLiters,
        ApiRankMetric::TotalPartyHours => RankMetric::TotalPartyHours,
    }
}

pub(crate) fn sort_order(order: ApiSortOrder) -> SortOrder {
    match order {
        ApiSortOrder::Asc => SortOrder::Asc,
        ApiSortOrder::Desc => SortOrder::Desc,
    }
}

fn period(period: TimePeriod) -> ApiTimePeriod {
    match period {
        TimePeriod::Morning => ApiTimePeriod::Morning,
        TimePeriod::Afternoon => ApiTimePeriod::Afternoon,
        TimePeriod::Evening => ApiTimePeriod::Evening,
        TimePeriod::Night => ApiTimePeriod::Night,
    }
}

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        username: user.username,
        name: user.name,
    }
}

pub(crate) fn group_view(group: Group) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        owner: group.owner,
        created_at: group.created_at,
    }
}

pub(crate) fn member_view(member: GroupMember) -> MemberView {
    MemberView {
        username: member.username,
        name: member.name,
        role: match member.role {
            GroupRole::Admin => ApiGroupRole::Admin,
            GroupRole::Member => ApiGroupRole::Member,
        },
        joined_at: member.joined_at,
    }
}

pub(crate) fn drink_view(drink: Drink) -> DrinkView {
    DrinkView {
        id: drink.id,
        user_id: drink.user_id,
        group_id: drink.group_id,
        event_id: drink.event_id,
        name: drink.name,
        drink_type: api_drink_type(drink.drink_type),
        brand: drink.brand,
        volume_ml: drink.volume_ml,
        location: drink.location,
        photo_url: drink.photo_url,
        points: drink.points,
        occurred_at: drink.occurred_at,
    }
}

pub(crate) fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        id: comment.id,
        author: comment.author,
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub(crate) fn event_view(event: Event, now: DateTime<Utc>) -> EventView {
    EventView {
        id: event.id,
        group_id: event.group_id,
        created_by: event.created_by,
        name: event.name,
        description: event.description,
        location: event.location,
        start: event.window.start(),
        end: event.window.end(),
        status: match event.window.status(now) {
            EventStatus::Past => ApiEventStatus::Past,
            EventStatus::Current => ApiEventStatus::Current,
            EventStatus::Future => ApiEventStatus::Future,
        },
        duration_hours: event.window.duration_hours(),
    }
}

pub(crate) fn attendee_view(attendee: Attendee) -> AttendeeView {
    AttendeeView {
        username: attendee.username,
        name: attendee.name,
        status: api_attendance(attendee.status),
        confirmed_at: attendee.confirmed_at,
    }
}

pub(crate) fn member_totals(totals: MemberTotals) -> ApiMemberTotals {
    ApiMemberTotals {
        username: totals.user_id,
        name: totals.name,
        total_drinks: totals.total_drinks,
        total_liters: totals.total_liters,
        total_points: totals.total_points,
        total_party_hours: totals.total_party_hours,
    }
}

pub(crate) fn averages(averages: Averages) -> ApiAverages {
    ApiAverages {
        drinks: averages.drinks,
        liters: averages.liters,
        points: averages.points,
        party_hours: averages.party_hours,
    }
}

/// Split engine buckets into their wire shapes. Period buckets keep
/// their fixed order.
pub(crate) fn buckets(
    by_type: Vec<AggregateBucket>,
    by_period: Vec<AggregateBucket>,
) -> (Vec<TypeBucket>, Vec<PeriodBucket>) {
    let types = by_type
        .into_iter()
        .filter_map(|b| match b.key {
            BucketKey::Type(kind) => Some(TypeBucket {
                drink_type: api_drink_type(kind),
                count: b.count,
                total_liters: b.total_liters,
                total_points: b.total_points,
            }),
            BucketKey::Period(_) => None,
        })
        .collect();
    let periods = by_period
        .into_iter()
        .filter_map(|b| match b.key {
            BucketKey::Period(p) => Some(PeriodBucket {
                period: period(p),
                count: b.count,
                total_liters: b.total_liters,
                total_points: b.total_points,
            }),
            BucketKey::Type(_) => None,
        })
        .collect();
    (types, periods)
}
