//! Route handlers.
//!
//! The service is synchronous, so each handler runs it on the blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use noughts_engine::GameId;
use tracing::{debug, instrument};

use crate::api::{ApiError, AppState};
use crate::{
    ActiveGameView, CreateUserRequest, GameService, GameView, HistoryView, MessageView,
    MoveRequest, NewGameRequest, NotificationSink, PlayerView, Ranking, ServiceError, Store,
};

async fn run<S, N, T, F>(state: &AppState<S, N>, op: F) -> Result<T, ApiError>
where
    S: Store,
    N: NotificationSink,
    T: Send + 'static,
    F: FnOnce(&GameService<S, N>) -> Result<T, ServiceError> + Send + 'static,
{
    let service = Arc::clone(state.service());
    tokio::task::spawn_blocking(move || op(service.as_ref()))
        .await
        .map_err(|e| ApiError::internal(format!("Worker task failed: {e}")))?
        .map_err(ApiError::from)
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `POST /users`
#[instrument(skip_all, fields(user = %request.user_name))]
pub async fn create_user<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageView>), ApiError> {
    let view = run(&state, move |service| {
        service.create_user(&request.user_name, request.email.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /users`
pub async fn list_users<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<PlayerView>>, ApiError> {
    run(&state, |service| service.list_users()).await.map(Json)
}

/// `GET /users/{name}/games`
#[instrument(skip(state))]
pub async fn active_games<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ActiveGameView>>, ApiError> {
    run(&state, move |service| service.active_games(&name))
        .await
        .map(Json)
}

/// `POST /games`
#[instrument(skip_all, fields(user_x = %request.user_x, user_o = %request.user_o))]
pub async fn new_game<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Json(request): Json<NewGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let view = run(&state, move |service| {
        service.new_game(&request.user_x, &request.user_o)
    })
    .await?;
    debug!(game_id = %view.id, "Game created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /games/{id}`
#[instrument(skip(state))]
pub async fn get_game<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Path(id): Path<GameId>,
) -> Result<Json<GameView>, ApiError> {
    run(&state, move |service| service.game(id)).await.map(Json)
}

/// `GET /games/{id}/history`
#[instrument(skip(state))]
pub async fn history<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Path(id): Path<GameId>,
) -> Result<Json<Vec<HistoryView>>, ApiError> {
    run(&state, move |service| service.history(id))
        .await
        .map(Json)
}

/// `POST /games/{id}/moves`
#[instrument(
    skip(state, request),
    fields(user = %request.user, row = request.row, col = request.col)
)]
pub async fn make_move<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Path(id): Path<GameId>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    run(&state, move |service| {
        service.make_move(id, &request.user, request.row, request.col)
    })
    .await
    .map(Json)
}

/// `POST /games/{id}/cancel`
#[instrument(skip(state))]
pub async fn cancel_game<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
    Path(id): Path<GameId>,
) -> Result<Json<MessageView>, ApiError> {
    run(&state, move |service| service.cancel_game(id))
        .await
        .map(Json)
}

/// `GET /rankings`
pub async fn rankings<S: Store, N: NotificationSink>(
    State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Ranking>>, ApiError> {
    run(&state, |service| service.rankings()).await.map(Json)
}
