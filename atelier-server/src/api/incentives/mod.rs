//! Incentive Ledger API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/incentives", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::list));

    // Rebuild rewrites the whole ledger, managers only
    let manage_routes = Router::new()
        .route("/rebuild", post(handler::rebuild))
        .layer(middleware::from_fn(require_manager));

    read_routes.merge(manage_routes)
}
