//! Shelter handlers

use crate::auth::StaffUser;
use crate::error::ApiError;
use actix_web::{web, HttpResponse};
use shelternet_db::{NewShelter, ShelterDb};

/// GET /shelters
pub async fn list_shelters(db: web::Data<ShelterDb>) -> Result<HttpResponse, ApiError> {
    let shelters = db.shelter_list().await?;
    Ok(HttpResponse::Ok().json(shelters))
}

/// GET /shelters/{id}
///
/// Shelter detail including `remainingCapacity` and the animals it owns.
pub async fn get_shelter(
    db: web::Data<ShelterDb>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let detail = db
        .shelter_detail(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("shelter {}", id)))?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /shelters
pub async fn create_shelter(
    _staff: StaffUser,
    db: web::Data<ShelterDb>,
    body: web::Json<NewShelter>,
) -> Result<HttpResponse, ApiError> {
    let shelter = db.shelter_create(&body).await?;
    Ok(HttpResponse::Created().json(shelter))
}
