//! Liveness probe handler

use crate::models::HealthResponse;
use actix_web::{HttpResponse, Responder};

/// GET /healthz
///
/// Returns 200 while the server is running. No authentication required.
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::ok())
}
