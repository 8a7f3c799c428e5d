//! Legacy data migration API (managers only)

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/migrate/customers", post(handler::migrate_customers))
        .layer(middleware::from_fn(require_manager))
}
