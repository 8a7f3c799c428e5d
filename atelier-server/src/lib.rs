//! Atelier Server - 手形・足形工房の予約管理サーバー
//!
//! Reservation management backend for an infant hand/foot molding
//! studio. Core responsibilities:
//!
//! - **Reservations** (`reservations`): lifecycle engine over the
//!   reservation store, with three independent status axes
//! - **Customers** (`customers`): deduplicated registry with partial-merge
//!   upserts
//! - **Incentive ledger** (`reservations::ledger`): derived (staff, date)
//!   aggregate, kept consistent with the store on every write
//! - **Auth** (`auth`): JWT + argon2 staff authentication
//! - **HTTP API** (`api`): RESTful endpoints with a uniform
//!   `{success, data | error}` envelope
//!
//! # Module layout
//!
//! ```text
//! atelier-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, passwords, middleware
//! ├── db/            # redb storage layer
//! ├── customers/     # customer registry
//! ├── reservations/  # engine, ledger, migration
//! ├── api/           # HTTP routes and handlers
//! ├── routes/        # router assembly and middleware stack
//! └── utils/         # logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod customers;
pub mod db;
pub mod reservations;
pub mod routes;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use customers::CustomerRegistry;
pub use db::StudioStorage;
pub use reservations::{CustomerMigration, IncentiveLedger, ReservationEngine};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, create the work directory and initialize logging
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(config.log_dir())?;
    let log_dir = config.log_dir();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    init_logger_with_file(Some(&log_level), log_dir.to_str());

    Ok(())
}
