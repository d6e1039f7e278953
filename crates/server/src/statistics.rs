//! Group statistics endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use uuid::Uuid;

use api_types::stats::{Dashboard, GroupTotals, RankingQuery, RankingResponse};
use engine::User;

use crate::{ServerError, convert, server::ServerState};

pub async fn dashboard(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Dashboard>, ServerError> {
    let dashboard = state
        .engine
        .group_dashboard(group_id, &user.username, Utc::now())
        .await?;

    let (by_type, by_period) = convert::buckets(dashboard.by_type, dashboard.by_period);
    Ok(Json(Dashboard {
        totals: GroupTotals {
            drinks: dashboard.totals.drinks,
            liters: dashboard.totals.liters,
            points: dashboard.totals.points,
            party_hours: dashboard.totals.party_hours,
        },
        by_type,
        by_period,
        ranking: dashboard
            .ranking
            .into_iter()
            .map(convert::member_totals)
            .collect(),
        member_count: dashboard.member_count,
        total_events: dashboard.total_events,
        upcoming_events: dashboard.upcoming_events,
        per_member: dashboard.averages.per_member.map(convert::averages),
        per_event: dashboard.averages.per_event.map(convert::averages),
    }))
}

/// Leaderboard of a group. Defaults to points, descending.
pub async fn ranking(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, ServerError> {
    let metric = query.metric.unwrap_or_default();
    let order = query.order.unwrap_or_default();
    let members = state
        .engine
        .group_ranking(
            group_id,
            convert::rank_metric(metric),
            convert::sort_order(order),
            &user.username,
            Utc::now(),
        )
        .await?
        .into_iter()
        .map(convert::member_totals)
        .collect();
    Ok(Json(RankingResponse {
        metric,
        order,
        members,
    }))
}
