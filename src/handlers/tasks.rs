use super::{ApiError, ApiResult};
use crate::engine::{CompletionResult, DailyCheckResult, TodayTasks, WeeklyTasks};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CharacterQuery {
    pub character_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    pub character_id: String,
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DailyCheckRequest {
    pub character_id: String,
}

pub async fn today(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CharacterQuery>,
) -> ApiResult<Json<TodayTasks>> {
    Ok(Json(state.engine.tasks_today(&query.character_id).await?))
}

pub async fn weekly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CharacterQuery>,
) -> ApiResult<Json<WeeklyTasks>> {
    Ok(Json(state.engine.tasks_this_week(&query.character_id).await?))
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompleteTaskRequest>,
) -> ApiResult<Json<CompletionResult>> {
    if request.task_id.trim().is_empty() {
        return Err(ApiError::BadRequest("task_id is required".to_string()));
    }
    let result = state
        .engine
        .complete_task(&request.character_id, &request.task_id)
        .await?;
    Ok(Json(result))
}

/// Clients call this when a session starts; the engine makes repeats free.
pub async fn daily_check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DailyCheckRequest>,
) -> ApiResult<Json<DailyCheckResult>> {
    let today = state.engine.today();
    Ok(Json(
        state
            .engine
            .evaluate_daily_check(&request.character_id, today)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::models::Assignment;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use chrono::Weekday;

    async fn state() -> Arc<AppState> {
        let store = store_with_characters().await;
        add_daily(&store, "a", Weekday::Mon, Assignment::Everyone).await;
        Arc::new(AppState {
            engine: Arc::new(engine_at(store, monday(), 7)),
        })
    }

    fn complete_request(task_id: &str) -> Json<CompleteTaskRequest> {
        Json(CompleteTaskRequest {
            character_id: HERO.to_string(),
            task_id: task_id.to_string(),
        })
    }

    #[tokio::test]
    async fn test_complete_then_repeat_is_conflict() {
        let state = state().await;

        let Json(result) = complete(State(state.clone()), complete_request("a")).await.unwrap();
        assert!(result.success);

        let err = complete(State(state.clone()), complete_request("a")).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_blank_task_id_is_bad_request() {
        let state = state().await;
        let err = complete(State(state), complete_request("  ")).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_daily_check_uses_engine_day() {
        let state = state().await;
        let request = || {
            Json(DailyCheckRequest {
                character_id: HERO.to_string(),
            })
        };

        let Json(first) = daily_check(State(state.clone()), request()).await.unwrap();
        assert!(!first.already_checked);
        let Json(second) = daily_check(State(state.clone()), request()).await.unwrap();
        assert!(second.already_checked);
    }
}
