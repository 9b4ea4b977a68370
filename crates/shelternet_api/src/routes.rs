//! API routes configuration

use crate::handlers::{animals, applications, health, shelters};
use actix_web::{error::InternalError, web, HttpResponse};
use tracing::warn;

/// Configure every Shelternet route.
///
/// Expects `web::Data<ShelterDb>` and `web::Data<AuthSettings>` to be
/// registered on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/healthz", web::get().to(health::healthz))
        .service(
            web::scope("/application")
                .route("", web::post().to(applications::submit_application))
                .route("/{id}", web::get().to(applications::get_application))
                .route("/{id}/approve", web::post().to(applications::approve_application))
                .route("/{id}/reject", web::post().to(applications::reject_application)),
        )
        .service(
            web::scope("/animals")
                .route("", web::get().to(animals::list_animals))
                .route("", web::post().to(animals::create_animal))
                .route("/request", web::post().to(animals::request_animals))
                .route("/request/", web::post().to(animals::request_animals))
                .route("/return", web::post().to(animals::return_animals))
                .route("/return-request", web::post().to(animals::return_request_animals))
                .route("/adopted", web::post().to(animals::adopt_animals))
                .route("/{id}", web::get().to(animals::get_animal)),
        )
        .service(
            web::scope("/shelters")
                .route("", web::get().to(shelters::list_shelters))
                .route("", web::post().to(shelters::create_shelter))
                .route("/{id}", web::get().to(shelters::get_shelter)),
        );
}

/// Malformed JSON bodies are a plain 400 with an empty body, like every
/// other client error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!(path = %req.path(), error = %err, "Rejected request body");
        InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
    })
}
