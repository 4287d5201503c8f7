use super::{ActorQuery, ApiResult};
use crate::engine::{CharacterView, OverrideResult};
use crate::models::Character;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthUpdate {
    pub health: i32,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<CharacterView>> {
    Ok(Json(state.engine.login(&request.name).await?))
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CharacterView>> {
    Ok(Json(state.engine.get_character_view(&id).await?))
}

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    Query(actor): Query<ActorQuery>,
) -> ApiResult<Json<Vec<Character>>> {
    Ok(Json(state.engine.list_characters(&actor.actor_id).await?))
}

pub async fn set_health(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<String>,
    Query(actor): Query<ActorQuery>,
    Json(update): Json<HealthUpdate>,
) -> ApiResult<Json<OverrideResult>> {
    tracing::info!("Health override for {} requested by {}", target_id, actor.actor_id);
    Ok(Json(
        state
            .engine
            .set_health(&actor.actor_id, &target_id, update.health)
            .await?,
    ))
}
