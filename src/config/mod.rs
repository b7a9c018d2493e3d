// Runtime configuration, store construction and seeding

pub mod app;
pub mod database;
pub mod seeding;

pub use app::{AppConfig, StorageBackend};
pub use database::{run_migrations, DatabaseConfig};
pub use seeding::DatabaseSeeder;

use anyhow::Result;
use std::sync::Arc;

use crate::database::{BookingStore, MemoryStore, PgBookingStore};

/// Build the configured store, applying migrations and demo data when enabled.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn BookingStore>> {
    let store: Arc<dyn BookingStore> = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = db_config.create_pool().await?;
            tracing::info!(
                max_connections = db_config.max_connections,
                "Connected to PostgreSQL"
            );

            if config.run_migrations {
                run_migrations(&pool).await?;
                tracing::info!("Database migrations applied");
            }

            Arc::new(PgBookingStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; bookings are lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_demo_data {
        DatabaseSeeder::new(store.clone()).seed_all().await?;
    }

    Ok(store)
}
