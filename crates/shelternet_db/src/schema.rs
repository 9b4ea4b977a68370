//! Database schema creation for all Shelternet tables.
//!
//! All CREATE TABLE statements live here - single source of truth.

use crate::error::Result;
use crate::ShelterDb;
use tracing::info;

impl ShelterDb {
    /// Ensure all tables exist.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        // Enable WAL mode for better concurrent access
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA foreign_keys=ON")
            .execute(&self.pool)
            .await?;

        self.create_shelter_tables().await?;
        self.create_application_tables().await?;

        info!("Database schema verified");
        Ok(())
    }

    /// Create shelter and animal tables
    async fn create_shelter_tables(&self) -> Result<()> {
        // Shelters: remaining_capacity is the capacity ledger
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS shelters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                total_capacity INTEGER NOT NULL CHECK (total_capacity >= 0),
                remaining_capacity INTEGER NOT NULL,
                CHECK (remaining_capacity >= 0 AND remaining_capacity <= total_capacity)
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS animals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                species TEXT NOT NULL,
                breed TEXT NOT NULL,
                birth_date TEXT NOT NULL,
                sex TEXT NOT NULL,
                color TEXT NOT NULL,
                notes TEXT,
                status TEXT NOT NULL DEFAULT 'AVAILABLE'
                    CHECK (status IN ('AVAILABLE', 'PENDING', 'OFFSITE', 'ADOPTED')),
                shelter_id INTEGER REFERENCES shelters(id)
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_animals_shelter ON animals(shelter_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_animals_status ON animals(status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create adoption application tables
    async fn create_application_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS adoption_applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                animal_id INTEGER NOT NULL REFERENCES animals(id),
                status TEXT NOT NULL DEFAULT 'PENDING'
                    CHECK (status IN ('PENDING', 'APPROVED', 'REJECTED'))
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_applications_animal ON adoption_applications(animal_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
