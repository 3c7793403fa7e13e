//! HTTP error bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use noughts_engine::GameError;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::ServiceError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

/// Error returned by a handler.
#[derive(Debug, Clone, Display, Error)]
pub enum ApiError {
    /// 404
    #[display("{message}")]
    NotFound {
        /// Explanation.
        message: String,
    },
    /// 401; someone moved out of turn.
    #[display("{message}")]
    Unauthorized {
        /// Explanation.
        message: String,
    },
    /// 403; the move or cancel is not allowed in this state.
    #[display("{message}")]
    Forbidden {
        /// Explanation.
        message: String,
    },
    /// 409
    #[display("{message}")]
    Conflict {
        /// Explanation.
        message: String,
    },
    /// 500
    #[display("{message}")]
    Internal {
        /// Explanation.
        message: String,
    },
}

impl ApiError {
    /// An internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status for the response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Code placed in the JSON body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "NOT_YOUR_TURN",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Conflict { .. } => "CONFLICT",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::NotFound { .. } | ServiceError::NoPlayers => Self::NotFound { message },
            ServiceError::NotYourTurn { .. } => Self::Unauthorized { message },
            ServiceError::Conflict { .. } => Self::Conflict { message },
            ServiceError::Game(GameError::WrongTurn { .. }) => Self::Unauthorized { message },
            ServiceError::Game(GameError::SamePlayer) => Self::Conflict { message },
            ServiceError::Game(e) if e.is_client_error() => Self::Forbidden { message },
            ServiceError::Game(_) | ServiceError::Store(_) => {
                error!(error = %message, "Internal failure");
                Self::Internal { message }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_engine::GameId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::game_not_found(GameId::new(1)), StatusCode::NOT_FOUND),
            (ServiceError::NoPlayers, StatusCode::NOT_FOUND),
            (
                ServiceError::NotYourTurn {
                    expected: "bob".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                ServiceError::Game(GameError::GameAlreadyEnded),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Game(GameError::CellOccupied { row: 0, col: 0 }),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Game(GameError::OutOfRange { row: 3, col: 0 }),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Conflict {
                    message: "taken".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Game(GameError::InvalidCompletion),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }
}
