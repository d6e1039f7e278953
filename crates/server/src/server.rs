use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{drinks, events, groups, statistics, users};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolve Basic credentials into an [`engine::User`] request extension.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = match state
        .engine
        .authenticate(credentials.username(), credentials.password())
        .await
    {
        Ok(user) => user,
        Err(EngineError::InvalidCredentials) => {
            tracing::debug!("rejected credentials for {}", credentials.username());
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/users/me", get(users::me))
        .route("/api/groups", get(groups::list).post(groups::create))
        .route("/api/groups/{id}", get(groups::get).put(groups::update))
        .route(
            "/api/groups/{id}/members",
            get(groups::members).post(groups::add_member),
        )
        .route(
            "/api/groups/{id}/members/{username}",
            delete(groups::remove_member),
        )
        .route("/api/groups/{id}/stats", get(statistics::dashboard))
        .route("/api/groups/{id}/ranking", get(statistics::ranking))
        .route("/api/drinks", post(drinks::create))
        .route("/api/drinks/user", get(drinks::for_user))
        .route("/api/drinks/group/{id}", get(drinks::for_group))
        .route("/api/drinks/event/{id}", get(drinks::for_event))
        .route(
            "/api/drinks/{id}/comment",
            get(drinks::comments).post(drinks::comment),
        )
        .route("/api/events", post(events::create))
        .route("/api/events/group/{id}", get(events::for_group))
        .route("/api/events/{id}", get(events::get).put(events::update))
        .route("/api/events/{id}/attend", post(events::attend))
        .route("/api/events/{id}/comment", post(events::comment))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .with_state(state)
}

/// Build the HTTP application around an engine.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run(engine: Engine, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
