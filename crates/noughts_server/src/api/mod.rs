//! HTTP surface.

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::instrument;

use crate::{GameService, NotificationSink, Store};

/// Shared handler state.
#[derive(Debug)]
pub struct AppState<S, N> {
    service: Arc<GameService<S, N>>,
}

impl<S, N> AppState<S, N> {
    /// Wraps a service for sharing across requests.
    pub fn new(service: GameService<S, N>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// The shared service.
    pub fn service(&self) -> &Arc<GameService<S, N>> {
        &self.service
    }
}

impl<S, N> Clone for AppState<S, N> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Builds the router with every endpoint.
#[instrument(skip_all)]
pub fn router<S: Store, N: NotificationSink>(state: AppState<S, N>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/users",
            get(handlers::list_users::<S, N>).post(handlers::create_user::<S, N>),
        )
        .route("/users/{name}/games", get(handlers::active_games::<S, N>))
        .route("/games", post(handlers::new_game::<S, N>))
        .route("/games/{id}", get(handlers::get_game::<S, N>))
        .route("/games/{id}/history", get(handlers::history::<S, N>))
        .route("/games/{id}/moves", post(handlers::make_move::<S, N>))
        .route("/games/{id}/cancel", post(handlers::cancel_game::<S, N>))
        .route("/rankings", get(handlers::rankings::<S, N>))
        .with_state(state)
}
