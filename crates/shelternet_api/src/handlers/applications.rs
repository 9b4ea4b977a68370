//! Adoption application handlers
//!
//! Submitting is public; reviewing needs staff credentials.

use crate::auth::StaffUser;
use crate::error::ApiError;
use actix_web::{web, HttpResponse};
use shelternet_db::{NewApplication, ShelterDb};
use tracing::info;

/// POST /application
///
/// 201 with the stored application, 400 if the animal does not exist.
pub async fn submit_application(
    db: web::Data<ShelterDb>,
    body: web::Json<NewApplication>,
) -> Result<HttpResponse, ApiError> {
    let application = db.application_submit(&body).await?;
    Ok(HttpResponse::Created().json(application))
}

/// GET /application/{id}
pub async fn get_application(
    db: web::Data<ShelterDb>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let application = db
        .application_get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("application {}", id)))?;
    Ok(HttpResponse::Ok().json(application))
}

/// POST /application/{id}/approve
pub async fn approve_application(
    staff: StaffUser,
    db: web::Data<ShelterDb>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let application = db
        .application_approve(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("application {}", id)))?;
    info!(application_id = id, reviewer = %staff.username, "Application approved");
    Ok(HttpResponse::Ok().json(application))
}

/// POST /application/{id}/reject
pub async fn reject_application(
    staff: StaffUser,
    db: web::Data<ShelterDb>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let application = db
        .application_reject(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("application {}", id)))?;
    info!(application_id = id, reviewer = %staff.username, "Application rejected");
    Ok(HttpResponse::Ok().json(application))
}
