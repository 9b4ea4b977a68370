//! Animal handlers
//!
//! The batch endpoints are all-or-nothing: a 400 means no animal changed.

use crate::auth::StaffUser;
use crate::error::ApiError;
use crate::models::{AnimalRequestIds, AnimalReturnBatch};
use actix_web::{web, HttpResponse};
use shelternet_db::{NewAnimal, ShelterDb};

/// GET /animals
pub async fn list_animals(db: web::Data<ShelterDb>) -> Result<HttpResponse, ApiError> {
    let animals = db.animal_list().await?;
    Ok(HttpResponse::Ok().json(animals))
}

/// GET /animals/{id}
pub async fn get_animal(
    db: web::Data<ShelterDb>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let animal = db
        .animal_get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("animal {}", id)))?;
    Ok(HttpResponse::Ok().json(animal))
}

/// POST /animals
pub async fn create_animal(
    _staff: StaffUser,
    db: web::Data<ShelterDb>,
    body: web::Json<NewAnimal>,
) -> Result<HttpResponse, ApiError> {
    let animal = db.animal_create(&body).await?;
    Ok(HttpResponse::Created().json(animal))
}

/// POST /animals/request/
///
/// Sends AVAILABLE animals to a partner location.
pub async fn request_animals(
    _staff: StaffUser,
    db: web::Data<ShelterDb>,
    body: web::Json<AnimalRequestIds>,
) -> Result<HttpResponse, ApiError> {
    let animals = db.animals_request(&body.ids).await?;
    Ok(HttpResponse::Ok().json(animals))
}

/// POST /animals/return
pub async fn return_animals(
    _staff: StaffUser,
    db: web::Data<ShelterDb>,
    body: web::Json<AnimalReturnBatch>,
) -> Result<HttpResponse, ApiError> {
    let animals = db.animals_return(&body.animals).await?;
    Ok(HttpResponse::Ok().json(animals))
}

/// POST /animals/return-request
pub async fn return_request_animals(
    _staff: StaffUser,
    db: web::Data<ShelterDb>,
    body: web::Json<AnimalRequestIds>,
) -> Result<HttpResponse, ApiError> {
    let animals = db.animals_return_request(&body.ids).await?;
    Ok(HttpResponse::Ok().json(animals))
}

/// POST /animals/adopted
pub async fn adopt_animals(
    _staff: StaffUser,
    db: web::Data<ShelterDb>,
    body: web::Json<AnimalRequestIds>,
) -> Result<HttpResponse, ApiError> {
    let animals = db.animals_adopt(&body.ids).await?;
    Ok(HttpResponse::Ok().json(animals))
}
