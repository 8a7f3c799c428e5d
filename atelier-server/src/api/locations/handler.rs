//! Location handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Location, LocationCreate};
use shared::util::{now_millis, record_id};
use shared::{ApiResponse, AppError, AppResult};

use crate::core::ServerState;

pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Location>>> {
    let mut locations = state.storage.list_locations()?;
    locations.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ApiResponse::success(locations))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LocationCreate>,
) -> AppResult<ApiResponse<Location>> {
    if payload.name.is_empty() {
        return Err(AppError::validation("name is required").with_detail("field", "name"));
    }
    let now = now_millis();
    let location = Location {
        id: record_id(),
        name: payload.name,
        address: payload.address,
        note: payload.note,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.storage.put_location(&location)?;
    Ok(ApiResponse::success(location))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    if !state.storage.remove_location(&id)? {
        return Err(AppError::not_found(format!("Location {}", id)));
    }
    Ok(ApiResponse::ok())
}
