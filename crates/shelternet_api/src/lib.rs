//! Shelternet HTTP API.
//!
//! Actix-web handlers over [`shelternet_db::ShelterDb`]. Mutating staff
//! endpoints require HTTP Basic credentials (see [`auth`]).

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use auth::{AuthError, AuthSettings, StaffUser};
pub use error::ApiError;
pub use models::{AnimalRequestIds, AnimalReturnBatch, HealthResponse};
pub use routes::configure_routes;
