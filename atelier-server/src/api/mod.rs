//! HTTP API modules
//!
//! # Structure
//!
//! - [`auth`] - login and current-user endpoints
//! - [`health`] - health check
//! - [`reservations`] - reservation lifecycle
//! - [`customers`] - customer registry
//! - [`incentives`] - incentive ledger queries and rebuild
//! - [`staff`] - staff account management
//! - [`locations`] - location master data
//! - [`setup`] - first-run bootstrap
//! - [`migrate`] - legacy data migration

pub mod auth;
pub mod customers;
pub mod health;
pub mod incentives;
pub mod locations;
pub mod migrate;
pub mod reservations;
pub mod setup;
pub mod staff;
