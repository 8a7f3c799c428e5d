//! Incentive ledger handlers

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::models::IncentiveEntry;
use shared::{ApiResponse, AppResult};

use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// "YYYY-MM"
    pub month: Option<String>,
    /// Exact staff name match
    pub staff: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<IncentiveEntry>>> {
    let mut entries = state.ledger().list(query.month.as_deref())?;
    if let Some(staff) = query.staff.as_deref() {
        entries.retain(|e| e.staff == staff);
    }
    Ok(ApiResponse::success(entries))
}

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    /// Ledger entries after the rebuild
    pub entries: usize,
}

/// Rebuild the ledger from the reservation store
pub async fn rebuild(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<RebuildResponse>> {
    let entries = state.ledger().rebuild()?;
    tracing::info!(entries, "incentive ledger rebuilt");
    Ok(ApiResponse::success(RebuildResponse { entries }))
}
