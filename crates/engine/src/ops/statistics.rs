use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    AggregateBucket, Attendance, Drink, Event, GroupAverages, GroupTotals, MemberTotals,
    RankMetric, ResultEngine, SortOrder, aggregate_by_time_period, aggregate_by_type, drinks,
    event_attendees, events, rank, summarize, totals_by,
};

use super::{Engine, with_tx};

const DASHBOARD_RANKING_SIZE: usize = 10;

/// Everything the group statistics page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupDashboard {
    pub totals: GroupTotals,
    pub by_type: Vec<AggregateBucket>,
    pub by_period: Vec<AggregateBucket>,
    /// Top members by points.
    pub ranking: Vec<MemberTotals>,
    pub member_count: u64,
    pub total_events: u64,
    /// Events that start after `now`.
    pub upcoming_events: u64,
    pub averages: GroupAverages,
}

/// Raw material of the statistics views, loaded in one transaction.
struct GroupActivity {
    members: Vec<(String, String)>,
    drinks: Vec<Drink>,
    events: Vec<Event>,
    party_hours: HashMap<String, f64>,
}

impl GroupActivity {
    fn member_totals(&self) -> Vec<MemberTotals> {
        let per_member = totals_by(self.drinks.iter().map(|d| (d.user_id.as_str(), d.record())));
        self.members
            .iter()
            .map(|(username, name)| {
                let totals = per_member.get(username.as_str()).copied().unwrap_or_default();
                MemberTotals {
                    user_id: username.clone(),
                    name: name.clone(),
                    total_drinks: totals.drinks,
                    total_liters: totals.liters,
                    total_points: totals.points,
                    total_party_hours: self.party_hours.get(username).copied().unwrap_or(0.0),
                }
            })
            .collect()
    }
}

impl Engine {
    /// Per-member totals of a group, in member join order.
    ///
    /// Party hours count the elapsed part of every event the member
    /// answered `yes` to; an event in progress counts up to `now`.
    pub async fn member_totals(
        &self,
        group_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<MemberTotals>> {
        let activity = with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            self.group_activity(&db_tx, group_id, now).await
        })?;
        Ok(activity.member_totals())
    }

    pub async fn group_ranking(
        &self,
        group_id: Uuid,
        metric: RankMetric,
        order: SortOrder,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<MemberTotals>> {
        let members = self.member_totals(group_id, user_id, now).await?;
        Ok(rank(members, metric, order))
    }

    pub async fn group_dashboard(
        &self,
        group_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<GroupDashboard> {
        let activity = with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            self.group_activity(&db_tx, group_id, now).await
        })?;

        let records: Vec<_> = activity.drinks.iter().map(Drink::record).collect();
        let summary = summarize(&records);
        let totals = GroupTotals {
            drinks: summary.drinks,
            liters: summary.liters,
            points: summary.points,
            party_hours: activity.party_hours.values().sum(),
        };

        let member_count = activity.members.len() as u64;
        let total_events = activity.events.len() as u64;
        let upcoming_events = activity
            .events
            .iter()
            .filter(|e| e.window.start() > now)
            .count() as u64;

        let mut ranking = rank(activity.member_totals(), RankMetric::Points, SortOrder::Desc);
        ranking.truncate(DASHBOARD_RANKING_SIZE);

        Ok(GroupDashboard {
            by_type: aggregate_by_type(&records),
            by_period: aggregate_by_time_period(&records, &self.timezone),
            ranking,
            member_count,
            total_events,
            upcoming_events,
            averages: totals.averages(member_count, total_events),
            totals,
        })
    }

    async fn group_activity(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<GroupActivity> {
        let members: Vec<(String, String)> = self
            .members_in(db, group_id)
            .await?
            .into_iter()
            .map(|m| (m.username, m.name))
            .collect();

        let drinks = drinks::Entity::find()
            .filter(drinks::Column::GroupId.eq(group_id))
            .order_by_asc(drinks::Column::OccurredAt)
            .order_by_asc(drinks::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Drink::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let events = events::Entity::find()
            .filter(events::Column::GroupId.eq(group_id))
            .all(db)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let mut party_hours: HashMap<String, f64> = HashMap::new();
        let started: HashMap<Uuid, f64> = events
            .iter()
            .map(|e| (e.id, e.window.elapsed_hours(now)))
            .filter(|(_, hours)| *hours > 0.0)
            .collect();
        if !started.is_empty() {
            let answers = event_attendees::Entity::find()
                .filter(event_attendees::Column::EventId.is_in(started.keys().copied()))
                .filter(event_attendees::Column::Status.eq(Attendance::Yes.as_str()))
                .all(db)
                .await?;
            for answer in answers {
                let Some(hours) = started.get(&answer.event_id) else {
                    continue;
                };
                // Former members keep their answers but leave the statistics.
                if members.iter().any(|(username, _)| *username == answer.user_id) {
                    *party_hours.entry(answer.user_id).or_default() += hours;
                }
            }
        }

        Ok(GroupActivity {
            members,
            drinks,
            events,
            party_hours,
        })
    }
}
