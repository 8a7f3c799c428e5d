//! Shared server state

use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::customers::CustomerRegistry;
use crate::db::StudioStorage;
use crate::reservations::{CustomerMigration, IncentiveLedger, ReservationEngine};

/// Server state shared across handlers.
///
/// Cloning is cheap: the storage holds an `Arc<Database>` and the JWT
/// service is behind an `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: StudioStorage,
    pub jwt_service: Arc<JwtService>,
    engine: ReservationEngine,
}

impl ServerState {
    /// Initialize the state: work directory, database, services
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let storage = StudioStorage::open(config.database_path())?;
        Ok(Self::with_storage(config.clone(), storage))
    }

    /// Build state around an existing storage (tests use the in-memory
    /// backend)
    pub fn with_storage(config: Config, storage: StudioStorage) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let engine = ReservationEngine::new(storage.clone());
        Self {
            config,
            storage,
            jwt_service,
            engine,
        }
    }

    pub fn engine(&self) -> &ReservationEngine {
        &self.engine
    }

    pub fn registry(&self) -> &CustomerRegistry {
        self.engine.registry()
    }

    pub fn ledger(&self) -> &IncentiveLedger {
        self.engine.ledger()
    }

    pub fn migration(&self) -> CustomerMigration {
        CustomerMigration::new(self.storage.clone())
    }
}
