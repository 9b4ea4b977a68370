//! Adoption application intake and review.

use crate::animals::{fetch_animal, update_animal_status};
use crate::error::{DbError, Result};
use crate::types::*;
use crate::ShelterDb;
use sqlx::{Row, SqliteConnection};
use tracing::info;

impl ShelterDb {
    /// Submit an application for an existing animal. Starts out PENDING.
    pub async fn application_submit(&self, new: &NewApplication) -> Result<AdoptionApplication> {
        let mut tx = self.begin_write().await?;

        if fetch_animal(&mut tx, new.animal_id).await?.is_none() {
            tx.rollback().await?;
            return Err(DbError::not_found(format!("animal {}", new.animal_id)));
        }

        let status = ApplicationStatus::Pending;
        let result = sqlx::query(
            r#"
            INSERT INTO adoption_applications (name, address, phone_number, animal_id, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.phone_number)
        .bind(new.animal_id)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        info!(application_id = id, animal_id = new.animal_id, "Adoption application submitted");

        Ok(AdoptionApplication {
            id,
            name: new.name.clone(),
            address: new.address.clone(),
            phone_number: new.phone_number.clone(),
            animal_id: new.animal_id,
            status,
        })
    }

    /// Get an application by ID
    pub async fn application_get(&self, id: i64) -> Result<Option<AdoptionApplication>> {
        let mut conn = self.pool.acquire().await?;
        fetch_application(&mut conn, id).await
    }

    /// Approve a PENDING application. Its AVAILABLE animal becomes PENDING.
    ///
    /// Returns `None` when no application has this id.
    pub async fn application_approve(&self, id: i64) -> Result<Option<AdoptionApplication>> {
        let mut tx = self.begin_write().await?;

        let Some(application) = fetch_application(&mut tx, id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        ensure_pending(&application)?;

        let animal = fetch_animal(&mut tx, application.animal_id)
            .await?
            .ok_or_else(|| DbError::not_found(format!("animal {}", application.animal_id)))?;
        // Only AVAILABLE animals can go on hold.
        animal.status.can_transition_to(AnimalStatus::Pending)?;

        update_animal_status(&mut tx, animal.id, AnimalStatus::Pending).await?;
        let approved = set_status(&mut tx, application, ApplicationStatus::Approved).await?;

        tx.commit().await?;

        info!(application_id = id, animal_id = approved.animal_id, "Adoption application approved");
        Ok(Some(approved))
    }

    /// Reject a PENDING application. The animal is untouched.
    ///
    /// Returns `None` when no application has this id.
    pub async fn application_reject(&self, id: i64) -> Result<Option<AdoptionApplication>> {
        let mut tx = self.begin_write().await?;

        let Some(application) = fetch_application(&mut tx, id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        ensure_pending(&application)?;

        let rejected = set_status(&mut tx, application, ApplicationStatus::Rejected).await?;
        tx.commit().await?;

        info!(application_id = id, "Adoption application rejected");
        Ok(Some(rejected))
    }
}

fn ensure_pending(application: &AdoptionApplication) -> Result<()> {
    if application.status != ApplicationStatus::Pending {
        return Err(DbError::invalid_state(format!(
            "Application {} is already {}",
            application.id, application.status
        )));
    }
    Ok(())
}

async fn set_status(
    conn: &mut SqliteConnection,
    mut application: AdoptionApplication,
    status: ApplicationStatus,
) -> Result<AdoptionApplication> {
    sqlx::query("UPDATE adoption_applications SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(application.id)
        .execute(&mut *conn)
        .await?;

    application.status = status;
    Ok(application)
}

async fn fetch_application(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<AdoptionApplication>> {
    let row = sqlx::query("SELECT * FROM adoption_applications WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(row_to_application).transpose()
}

fn row_to_application(row: &sqlx::sqlite::SqliteRow) -> Result<AdoptionApplication> {
    let status_str: String = row.try_get("status")?;
    let status = ApplicationStatus::parse(&status_str).ok_or_else(|| {
        DbError::corrupted(format!("Unknown application status: {}", status_str))
    })?;

    Ok(AdoptionApplication {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        phone_number: row.try_get("phone_number")?,
        animal_id: row.try_get("animal_id")?,
        status,
    })
}
