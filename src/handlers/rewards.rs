use super::{ActorQuery, ApiResult};
use crate::models::Reward;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn list_rewards(
    State(state): State<Arc<AppState>>,
    Query(actor): Query<ActorQuery>,
) -> ApiResult<Json<Vec<Reward>>> {
    Ok(Json(state.engine.list_rewards(&actor.actor_id).await?))
}

pub async fn upsert_reward(
    State(state): State<Arc<AppState>>,
    Query(actor): Query<ActorQuery>,
    Json(reward): Json<Reward>,
) -> ApiResult<Json<Value>> {
    let reward = state.engine.upsert_reward(&actor.actor_id, reward).await?;
    Ok(Json(json!({ "success": true, "reward": reward })))
}

pub async fn delete_reward(
    State(state): State<Arc<AppState>>,
    Path(level): Path<i32>,
    Query(actor): Query<ActorQuery>,
) -> ApiResult<Json<Value>> {
    state.engine.delete_reward(&actor.actor_id, level).await?;
    Ok(Json(json!({ "success": true })))
}
