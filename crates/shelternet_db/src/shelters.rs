//! Shelter operations and the capacity ledger's persistence.

use crate::animals::row_to_animal;
use crate::error::{DbError, Result};
use crate::ledger::CapacityLedger;
use crate::types::*;
use crate::ShelterDb;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, info};

impl ShelterDb {
    /// Create an empty shelter.
    pub async fn shelter_create(&self, new: &NewShelter) -> Result<Shelter> {
        if new.name.trim().is_empty() {
            return Err(DbError::constraint("Shelter name must not be empty"));
        }
        let ledger = CapacityLedger::new(new.capacity)?;

        let result = sqlx::query(
            r#"
            INSERT INTO shelters (name, total_capacity, remaining_capacity)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(ledger.total())
        .bind(ledger.remaining())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(shelter_id = id, capacity = ledger.total(), "Shelter created");

        Ok(Shelter {
            id,
            name: new.name.clone(),
            total_capacity: ledger.total(),
            remaining_capacity: ledger.remaining(),
        })
    }

    /// Get a shelter by ID
    pub async fn shelter_get(&self, id: i64) -> Result<Option<Shelter>> {
        let row = sqlx::query("SELECT * FROM shelters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_shelter).transpose()
    }

    /// Get a shelter with the animals it owns
    pub async fn shelter_detail(&self, id: i64) -> Result<Option<ShelterDetail>> {
        let Some(shelter) = self.shelter_get(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query("SELECT * FROM animals WHERE shelter_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        let animals = rows.iter().map(row_to_animal).collect::<Result<Vec<_>>>()?;

        Ok(Some(ShelterDetail { shelter, animals }))
    }

    /// List all shelters
    pub async fn shelter_list(&self) -> Result<Vec<Shelter>> {
        let rows = sqlx::query("SELECT * FROM shelters ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_shelter).collect()
    }
}

/// Load a shelter's ledger inside a transaction.
pub(crate) async fn fetch_ledger(
    conn: &mut SqliteConnection,
    shelter_id: i64,
) -> Result<CapacityLedger> {
    let row = sqlx::query("SELECT total_capacity, remaining_capacity FROM shelters WHERE id = ?")
        .bind(shelter_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found(format!("shelter {}", shelter_id)))?;

    CapacityLedger::restore(
        row.try_get("total_capacity")?,
        row.try_get("remaining_capacity")?,
    )
}

/// Apply a signed capacity change to one shelter inside a transaction.
pub(crate) async fn adjust_capacity(
    conn: &mut SqliteConnection,
    shelter_id: i64,
    delta: i64,
) -> Result<CapacityLedger> {
    let mut ledger = fetch_ledger(conn, shelter_id).await?;
    ledger.apply_delta(delta)?;

    // Relative write; the schema CHECK catches a concurrent writer.
    sqlx::query("UPDATE shelters SET remaining_capacity = remaining_capacity + ? WHERE id = ?")
        .bind(delta)
        .bind(shelter_id)
        .execute(&mut *conn)
        .await?;

    debug!(
        shelter_id,
        delta,
        remaining = ledger.remaining(),
        "Shelter capacity adjusted"
    );
    Ok(ledger)
}

fn row_to_shelter(row: &sqlx::sqlite::SqliteRow) -> Result<Shelter> {
    Ok(Shelter {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        total_capacity: row.try_get("total_capacity")?,
        remaining_capacity: row.try_get("remaining_capacity")?,
    })
}
