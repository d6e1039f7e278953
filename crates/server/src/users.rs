//! Account endpoints.

use api_types::user::{UserLogin, UserRegister, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::User;

use crate::{ServerError, convert, server::ServerState};

/// Register a new account. This route is public.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserRegister>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register_user(&payload.username, &payload.name, &payload.password)
        .await?;
    tracing::info!("registered user {}", user.username);
    Ok((StatusCode::CREATED, Json(convert::user_view(user))))
}

/// Check credentials sent in the body and return the account.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.username, &payload.password)
        .await?;
    Ok(Json(convert::user_view(user)))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(convert::user_view(user))
}
