//! HTTP error mapping.
//!
//! Client errors carry an empty body; the reason is logged instead.

use crate::auth::{AuthError, AUTH_REALM};
use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use shelternet_db::DbError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource named in the request path does not exist.
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            // Referenced ids that do not exist are a bad request, not a 404.
            Self::Db(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(AuthError::NotConfigured) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request refused");
        }

        let mut response = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            response.insert_header((
                header::WWW_AUTHENTICATE,
                format!("Basic realm=\"{}\"", AUTH_REALM),
            ));
        }
        response.finish()
    }
}
