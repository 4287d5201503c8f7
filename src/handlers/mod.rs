mod character;
mod rewards;
mod tasks;

use crate::engine::EngineError;
use crate::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Routes mounted under `/api`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(character::login))
        .route("/characters", get(character::list_characters))
        .route("/characters/:id", get(character::get_character))
        .route("/characters/:id/health", post(character::set_health))
        .route("/tasks/today", get(tasks::today))
        .route("/tasks/weekly", get(tasks::weekly))
        .route("/tasks/complete", post(tasks::complete))
        .route("/daily-check", post(tasks::daily_check))
        .route("/rewards", get(rewards::list_rewards).post(rewards::upsert_reward))
        .route("/rewards/:level", delete(rewards::delete_reward))
}

/// Who is asking, for admin-gated routes.
#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub actor_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Engine(err) => match err {
                EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                EngineError::AlreadyCompleted { .. } => (StatusCode::CONFLICT, "ALREADY_COMPLETED"),
                EngineError::InvalidRange(_) => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
                EngineError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                EngineError::InactiveCharacter(_) => (StatusCode::LOCKED, "INACTIVE_CHARACTER"),
                EngineError::NotAssigned { .. } => (StatusCode::FORBIDDEN, "NOT_ASSIGNED"),
                EngineError::NotScheduled { .. } => (StatusCode::BAD_REQUEST, "NOT_SCHEDULED"),
                EngineError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let internal = matches!(&self, ApiError::Engine(err) if !err.is_recoverable());
        let message = if internal {
            tracing::error!("Error handling request: {}", self);
            "An internal error occurred".to_string()
        } else {
            tracing::debug!("Request rejected: {}", self);
            self.to_string()
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });
        (status, Json(body)).into_response()
    }
}
