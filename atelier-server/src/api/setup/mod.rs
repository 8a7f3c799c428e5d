//! First-run bootstrap API (public)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/setup", post(handler::setup))
}
