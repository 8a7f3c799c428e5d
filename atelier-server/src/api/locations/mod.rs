//! Location Master Data API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/locations", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::list));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_manager));

    read_routes.merge(manage_routes)
}
