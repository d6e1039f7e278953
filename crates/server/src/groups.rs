//! Group and membership endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::group::{
    GroupNew, GroupUpdate, GroupView, GroupsResponse, MemberAdd, MembersResponse,
};
use engine::User;

use crate::{ServerError, convert, server::ServerState};

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state
        .engine
        .groups_for_user(&user.username)
        .await?
        .into_iter()
        .map(convert::group_view)
        .collect();
    Ok(Json(GroupsResponse { groups }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state
        .engine
        .create_group(&payload.name, payload.description.as_deref(), &user.username)
        .await?;
    tracing::info!("group {} created by {}", group.id, user.username);
    Ok((StatusCode::CREATED, Json(convert::group_view(group))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state.engine.group(group_id, &user.username).await?;
    Ok(Json(convert::group_view(group)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<GroupUpdate>,
) -> Result<Json<GroupView>, ServerError> {
    let update = engine::GroupUpdate {
        name: payload.name,
        description: payload.description,
    };
    let group = state
        .engine
        .update_group(group_id, update, &user.username)
        .await?;
    Ok(Json(convert::group_view(group)))
}

pub async fn members(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .group_members(group_id, &user.username)
        .await?
        .into_iter()
        .map(convert::member_view)
        .collect();
    Ok(Json(MembersResponse { members }))
}

pub async fn add_member(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<MemberAdd>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .add_member(group_id, &payload.username, &user.username)
        .await?
        .into_iter()
        .map(convert::member_view)
        .collect();
    tracing::info!("{} added to group {group_id}", payload.username);
    Ok(Json(MembersResponse { members }))
}

pub async fn remove_member(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((group_id, username)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_member(group_id, &username, &user.username)
        .await?;
    tracing::info!("{username} removed from group {group_id}");
    Ok(StatusCode::NO_CONTENT)
}
