//! Drink logging endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use api_types::{
    CommentNew, CommentsResponse,
    drink::{DrinkNew, DrinkView, DrinksResponse},
};
use engine::{Drink, NewDrink, User};

use crate::{ServerError, convert, server::ServerState};

fn drinks_response(drinks: Vec<Drink>) -> Json<DrinksResponse> {
    Json(DrinksResponse {
        drinks: drinks.into_iter().map(convert::drink_view).collect(),
    })
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<DrinkNew>,
) -> Result<(StatusCode, Json<DrinkView>), ServerError> {
    let new = NewDrink {
        group_id: payload.group_id,
        event_id: payload.event_id,
        name: payload.name,
        drink_type: convert::drink_type(payload.drink_type),
        brand: payload.brand,
        volume_ml: payload.volume_ml,
        location: payload.location,
        photo_url: payload.photo_url,
        occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
    };
    let drink = state.engine.add_drink(new, &user.username).await?;
    tracing::info!(
        "{} logged {} ml of {} ({} points)",
        user.username,
        drink.volume_ml,
        drink.drink_type,
        drink.points
    );
    Ok((StatusCode::CREATED, Json(convert::drink_view(drink))))
}

pub async fn for_user(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<DrinksResponse>, ServerError> {
    let drinks = state.engine.drinks_for_user(&user.username).await?;
    Ok(drinks_response(drinks))
}

pub async fn for_group(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<DrinksResponse>, ServerError> {
    let drinks = state
        .engine
        .drinks_for_group(group_id, &user.username)
        .await?;
    Ok(drinks_response(drinks))
}

pub async fn for_event(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<DrinksResponse>, ServerError> {
    let drinks = state
        .engine
        .drinks_for_event(event_id, &user.username)
        .await?;
    Ok(drinks_response(drinks))
}

pub async fn comments(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(drink_id): Path<Uuid>,
) -> Result<Json<CommentsResponse>, ServerError> {
    let comments = state
        .engine
        .drink_comments(drink_id, &user.username)
        .await?
        .into_iter()
        .map(convert::comment_view)
        .collect();
    Ok(Json(CommentsResponse { comments }))
}

pub async fn comment(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(drink_id): Path<Uuid>,
    Json(payload): Json<CommentNew>,
) -> Result<(StatusCode, Json<CommentsResponse>), ServerError> {
    let comments = state
        .engine
        .add_drink_comment(drink_id, &payload.text, &user.username)
        .await?
        .into_iter()
        .map(convert::comment_view)
        .collect();
    Ok((StatusCode::CREATED, Json(CommentsResponse { comments })))
}
