//! Customer registry handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Customer, CustomerUpsert, Reservation};
use shared::{ApiResponse, AppResult};

use crate::core::ServerState;
use crate::reservations::ReservationFilter;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Substring match over name and phone fields
    pub q: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Customer>>> {
    let customers = match query.q.as_deref() {
        Some(q) if !q.is_empty() => state.registry().search(q)?,
        _ => state.registry().list()?,
    };
    Ok(ApiResponse::success(customers))
}

/// Customer detail with their reservations joined in
#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub reservations: Vec<Reservation>,
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CustomerDetail>> {
    let customer = state.registry().get(&id)?;
    let reservations = state
        .engine()
        .list(&ReservationFilter {
            customer_id: Some(id),
            ..Default::default()
        })?
        .into_iter()
        .map(|r| r.reservation)
        .collect();
    Ok(ApiResponse::success(CustomerDetail {
        customer,
        reservations,
    }))
}

/// Create a customer under a generated id
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerUpsert>,
) -> AppResult<ApiResponse<Customer>> {
    Ok(ApiResponse::success(
        state.registry().upsert(None, &payload)?,
    ))
}

/// Partial-merge upsert: present fields overwrite, absent fields retain
pub async fn upsert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpsert>,
) -> AppResult<ApiResponse<Customer>> {
    Ok(ApiResponse::success(
        state.registry().upsert(Some(&id), &payload)?,
    ))
}

/// Delete a customer. Reservations referencing it are not touched.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.registry().delete(&id)?;
    Ok(ApiResponse::ok())
}
