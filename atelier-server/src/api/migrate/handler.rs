//! Migration handlers

use axum::extract::State;
use shared::{ApiResponse, AppResult};

use crate::core::ServerState;
use crate::reservations::MigrationReport;

/// Extract embedded personal fields from legacy reservations into the
/// customer registry. Idempotent, safe to re-run.
pub async fn migrate_customers(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<MigrationReport>> {
    let report = state.migration().run()?;
    Ok(ApiResponse::success(report))
}
