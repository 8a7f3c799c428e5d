//! Reservation store, lifecycle engine, incentive ledger and migration

pub mod engine;
pub mod ledger;
pub mod migration;

pub use engine::{EngineOutcome, ReservationEngine, ReservationFilter};
pub use ledger::IncentiveLedger;
pub use migration::{CustomerMigration, MigrationReport};
