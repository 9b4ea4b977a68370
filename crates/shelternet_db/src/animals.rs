//! Animal operations, including the all-or-nothing status batches.

use crate::batch::{plan_batch, AnimalState, BatchItem, BatchOperation, BatchPlan};
use crate::error::{DbError, Result};
use crate::shelters::adjust_capacity;
use crate::types::*;
use crate::ShelterDb;
use sqlx::{Row, SqliteConnection};
use std::collections::BTreeMap;
use tracing::{info, warn};

impl ShelterDb {
    // ========================================================================
    // Catalog Operations
    // ========================================================================

    /// Create an animal, placing it in a shelter if one is given.
    ///
    /// An animal that occupies a slot takes one from the shelter's ledger;
    /// a full shelter rejects it.
    pub async fn animal_create(&self, new: &NewAnimal) -> Result<Animal> {
        let status = new.initial_status();
        let mut tx = self.begin_write().await?;

        if let Some(shelter_id) = new.shelter_id {
            let delta = if status.occupies_slot() { -1 } else { 0 };
            adjust_capacity(&mut tx, shelter_id, delta).await?;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO animals (species, breed, birth_date, sex, color, notes, status, shelter_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.species)
        .bind(&new.breed)
        .bind(new.birth_date)
        .bind(&new.sex)
        .bind(&new.color)
        .bind(&new.notes)
        .bind(status.as_str())
        .bind(new.shelter_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        info!(animal_id = id, shelter_id = ?new.shelter_id, %status, "Animal created");

        Ok(Animal {
            id,
            species: new.species.clone(),
            breed: new.breed.clone(),
            birth_date: new.birth_date,
            sex: new.sex.clone(),
            color: new.color.clone(),
            notes: new.notes.clone(),
            status,
            shelter_id: new.shelter_id,
        })
    }

    /// Get an animal by ID
    pub async fn animal_get(&self, id: i64) -> Result<Option<Animal>> {
        let mut conn = self.pool.acquire().await?;
        fetch_animal(&mut conn, id).await
    }

    /// List all animals, oldest record first
    pub async fn animal_list(&self) -> Result<Vec<Animal>> {
        let rows = sqlx::query("SELECT * FROM animals ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_animal).collect()
    }

    // ========================================================================
    // Status Batches
    // ========================================================================

    /// Send AVAILABLE animals offsite. Frees one slot per animal.
    pub async fn animals_request(&self, ids: &[i64]) -> Result<Vec<Animal>> {
        let items = ids.iter().copied().map(BatchItem::id).collect();
        self.run_batch(BatchOperation::Request, items).await
    }

    /// Take OFFSITE animals back with per-animal notes.
    pub async fn animals_return(&self, returns: &[AnimalReturn]) -> Result<Vec<Animal>> {
        let items = returns
            .iter()
            .map(|r| BatchItem::with_notes(r.id, r.notes.clone()))
            .collect();
        self.run_batch(BatchOperation::Return, items).await
    }

    /// Call OFFSITE animals back; notes are set to the fixed return-request note.
    pub async fn animals_return_request(&self, ids: &[i64]) -> Result<Vec<Animal>> {
        let items = ids.iter().copied().map(BatchItem::id).collect();
        self.run_batch(BatchOperation::ReturnRequest, items).await
    }

    /// Mark animals ADOPTED. Any animal not yet adopted qualifies.
    pub async fn animals_adopt(&self, ids: &[i64]) -> Result<Vec<Animal>> {
        let items = ids.iter().copied().map(BatchItem::id).collect();
        self.run_batch(BatchOperation::Adopt, items).await
    }

    /// Validate every item, then apply the whole plan in one transaction.
    async fn run_batch(
        &self,
        operation: BatchOperation,
        items: Vec<BatchItem>,
    ) -> Result<Vec<Animal>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.begin_write().await?;

        let mut current = BTreeMap::new();
        for item in &items {
            if let Some(animal) = fetch_animal(&mut tx, item.animal_id).await? {
                current.insert(
                    animal.id,
                    AnimalState {
                        status: animal.status,
                        shelter_id: animal.shelter_id,
                    },
                );
            }
        }

        let plan = match plan_batch(operation, &items, &current) {
            Ok(plan) => plan,
            Err(rejection) => {
                tx.rollback().await?;
                warn!(
                    %operation,
                    animals = ?rejection.animal_ids(),
                    "Batch rejected"
                );
                return Err(rejection.into());
            }
        };

        // Dropping the transaction on error rolls back every write below.
        apply_plan(&mut tx, &plan).await?;

        let mut updated = Vec::with_capacity(plan.transitions.len());
        for animal_id in plan.animal_ids() {
            let animal = fetch_animal(&mut tx, animal_id)
                .await?
                .ok_or_else(|| DbError::not_found(format!("animal {}", animal_id)))?;
            updated.push(animal);
        }

        tx.commit().await?;

        info!(
            %operation,
            count = updated.len(),
            shelters = plan.capacity_deltas.len(),
            "Batch applied"
        );
        Ok(updated)
    }
}

/// Write a validated plan. Capacity is checked before any animal row changes.
async fn apply_plan(conn: &mut SqliteConnection, plan: &BatchPlan) -> Result<()> {
    for (&shelter_id, &delta) in &plan.capacity_deltas {
        adjust_capacity(conn, shelter_id, delta).await?;
    }

    for transition in &plan.transitions {
        sqlx::query("UPDATE animals SET status = ?, notes = COALESCE(?, notes) WHERE id = ?")
            .bind(transition.to.as_str())
            .bind(&transition.notes)
            .bind(transition.animal_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Load one animal on an existing connection or transaction.
pub(crate) async fn fetch_animal(conn: &mut SqliteConnection, id: i64) -> Result<Option<Animal>> {
    let row = sqlx::query("SELECT * FROM animals WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(row_to_animal).transpose()
}

/// Set one animal's status on an existing transaction.
pub(crate) async fn update_animal_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: AnimalStatus,
) -> Result<()> {
    sqlx::query("UPDATE animals SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) fn row_to_animal(row: &sqlx::sqlite::SqliteRow) -> Result<Animal> {
    let status_str: String = row.try_get("status")?;
    let status = AnimalStatus::parse(&status_str)
        .ok_or_else(|| DbError::corrupted(format!("Unknown animal status: {}", status_str)))?;

    Ok(Animal {
        id: row.try_get("id")?,
        species: row.try_get("species")?,
        breed: row.try_get("breed")?,
        birth_date: row.try_get("birth_date")?,
        sex: row.try_get("sex")?,
        color: row.try_get("color")?,
        notes: row.try_get("notes")?,
        status,
        shelter_id: row.try_get("shelter_id")?,
    })
}
