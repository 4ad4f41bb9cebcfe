//! Tree asset HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{AssessedTree, TreeAsset};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::assets::CreateTreeInput;
use crate::AppState;

/// List all trees with risk scored against the current weather
pub async fn list_assets(State(state): State<AppState>) -> Json<Vec<AssessedTree>> {
    let weather = state.weather.current_snapshot().await;
    Json(state.assets.list_with_risk(&weather))
}

/// Get one tree with risk scored against the current weather
pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<Uuid>,
) -> AppResult<Json<AssessedTree>> {
    // Look up before touching the weather provider
    state.assets.get(asset_id)?;

    let weather = state.weather.current_snapshot().await;
    let tree = state.assets.get_with_risk(asset_id, &weather)?;
    Ok(Json(tree))
}

/// Register a new tree
pub async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateTreeInput>,
) -> AppResult<(StatusCode, Json<TreeAsset>)> {
    let tree = state.assets.create(input)?;
    Ok((StatusCode::CREATED, Json(tree)))
}
