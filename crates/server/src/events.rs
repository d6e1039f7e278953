//! Event endpoints: scheduling, attendance and comments.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use api_types::{
    CommentNew, CommentsResponse,
    event::{
        AttendanceSet, AttendeesResponse, EventDetail, EventNew, EventUpdate, EventView,
        EventsResponse,
    },
};
use engine::{NewEvent, User};

use crate::{ServerError, convert, server::ServerState};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<EventNew>,
) -> Result<(StatusCode, Json<EventView>), ServerError> {
    let new = NewEvent {
        group_id: payload.group_id,
        name: payload.name,
        description: payload.description,
        location: payload.location,
        start: payload.start,
        end: payload.end,
    };
    let event = state.engine.create_event(new, &user.username).await?;
    tracing::info!("event {} scheduled in group {}", event.id, event.group_id);
    Ok((
        StatusCode::CREATED,
        Json(convert::event_view(event, Utc::now())),
    ))
}

pub async fn for_group(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<EventsResponse>, ServerError> {
    let now = Utc::now();
    let events = state
        .engine
        .events_for_group(group_id, &user.username)
        .await?
        .into_iter()
        .map(|e| convert::event_view(e, now))
        .collect();
    Ok(Json(EventsResponse { events }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetail>, ServerError> {
    let detail = state.engine.event(event_id, &user.username).await?;
    Ok(Json(EventDetail {
        event: convert::event_view(detail.event, Utc::now()),
        attendees: detail
            .attendees
            .into_iter()
            .map(convert::attendee_view)
            .collect(),
        comments: detail
            .comments
            .into_iter()
            .map(convert::comment_view)
            .collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<EventUpdate>,
) -> Result<Json<EventView>, ServerError> {
    let update = engine::EventUpdate {
        name: payload.name,
        description: payload.description,
        location: payload.location,
        start: payload.start,
        end: payload.end,
    };
    let event = state
        .engine
        .update_event(event_id, update, &user.username)
        .await?;
    Ok(Json(convert::event_view(event, Utc::now())))
}

pub async fn attend(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<AttendanceSet>,
) -> Result<Json<AttendeesResponse>, ServerError> {
    let attendees = state
        .engine
        .set_attendance(event_id, convert::attendance(payload.status), &user.username)
        .await?
        .into_iter()
        .map(convert::attendee_view)
        .collect();
    Ok(Json(AttendeesResponse { attendees }))
}

pub async fn comment(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<CommentNew>,
) -> Result<(StatusCode, Json<CommentsResponse>), ServerError> {
    let comments = state
        .engine
        .add_event_comment(event_id, &payload.text, &user.username)
        .await?
        .into_iter()
        .map(convert::comment_view)
        .collect();
    Ok((StatusCode::CREATED, Json(CommentsResponse { comments })))
}
