use anyhow::Result;
use std::sync::Arc;

use crate::database::BookingStore;
use crate::models::NewTrainer;

pub struct DatabaseSeeder {
    store: Arc<dyn BookingStore>,
}

impl DatabaseSeeder {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Insert the demo trainers unless the store already has trainers.
    /// Returns how many were created.
    pub async fn seed_all(&self) -> Result<usize> {
        tracing::info!("Starting database seeding...");

        let created = self.seed_trainers().await?;

        tracing::info!(created, "Database seeding completed!");
        Ok(created)
    }

    async fn seed_trainers(&self) -> Result<usize> {
        if self.store.count_trainers().await? > 0 {
            tracing::info!("Trainers already present, skipping");
            return Ok(0);
        }

        let demo_trainers = vec![
            NewTrainer {
                name: "Maria Lopez".to_string(),
                specialization: Some("strength".to_string()),
                working_hours: 8,
            },
            NewTrainer {
                name: "Tom Becker".to_string(),
                specialization: Some("mobility".to_string()),
                working_hours: 6,
            },
            NewTrainer {
                name: "Priya Nair".to_string(),
                specialization: None,
                working_hours: 4,
            },
        ];

        let count = demo_trainers.len();
        for trainer_data in demo_trainers {
            let trainer = self.store.insert_trainer(&trainer_data).await?;
            tracing::info!(trainer_id = trainer.id, "Created demo trainer");
        }

        Ok(count)
    }
}
