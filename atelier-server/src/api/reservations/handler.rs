//! Reservation handlers
//!
//! Lifecycle operations delegate to the engine; a ledger failure after
//! the primary write rides back as `warning` on a success envelope.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{ReservationCreate, ReservationUpdate, ReservationWithCustomer};
use shared::{ApiResponse, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reservations::ReservationFilter;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    /// "YYYY-MM"
    pub month: Option<String>,
    pub customer_id: Option<String>,
    pub staff: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<ReservationWithCustomer>>> {
    let filter = ReservationFilter {
        date: query.date,
        month: query.month,
        customer_id: query.customer_id,
        staff: query.staff,
    };
    Ok(ApiResponse::success(state.engine().list(&filter)?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReservationWithCustomer>> {
    Ok(ApiResponse::success(state.engine().get(&id)?))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<ApiResponse<ReservationWithCustomer>> {
    let outcome = state.engine().create(payload, Some(user.username))?;
    Ok(ApiResponse::success(outcome.reservation).maybe_warn(outcome.ledger_warning))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<ApiResponse<ReservationWithCustomer>> {
    let outcome = state.engine().update(&id, payload)?;
    Ok(ApiResponse::success(outcome.reservation).maybe_warn(outcome.ledger_warning))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let warning = state.engine().delete(&id)?;
    Ok(ApiResponse::ok().maybe_warn(warning))
}

pub async fn advance_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReservationWithCustomer>> {
    Ok(ApiResponse::success(state.engine().advance_payment(&id)?))
}

pub async fn advance_delivery(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReservationWithCustomer>> {
    Ok(ApiResponse::success(state.engine().advance_delivery(&id)?))
}
