//! HTTP Basic authentication for shelter staff endpoints.
//!
//! Handlers that take a [`StaffUser`] argument require valid credentials.
//! The expected credentials are registered as app data:
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(web::Data::new(AuthSettings::new("user", "secret")))
//!     .configure(shelternet_api::configure_routes)
//! ```

use crate::error::ApiError;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use base64::prelude::*;
use std::fmt;
use std::future::{ready, Ready};
use thiserror::Error;
use tracing::debug;

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const AUTH_REALM: &str = "shelternet";

/// Authentication failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingAuthorization,

    #[error("Malformed authorization: {0}")]
    MalformedAuthorization(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication is not configured")]
    NotConfigured,
}

/// Staff credentials accepted by protected endpoints.
#[derive(Clone)]
pub struct AuthSettings {
    username: String,
    password: String,
}

impl AuthSettings {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a username/password pair.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.username && password == self.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parse an HTTP Basic `Authorization` header value into (username, password).
pub fn parse_basic_auth_header(auth_header: &str) -> Result<(String, String), AuthError> {
    let encoded = auth_header.strip_prefix("Basic ").ok_or_else(|| {
        AuthError::MalformedAuthorization(
            "Authorization header must start with 'Basic '".to_string(),
        )
    })?;

    let decoded_bytes = BASE64_STANDARD.decode(encoded.trim().as_bytes()).map_err(|e| {
        AuthError::MalformedAuthorization(format!("Invalid base64 encoding: {}", e))
    })?;

    let decoded = String::from_utf8(decoded_bytes).map_err(|e| {
        AuthError::MalformedAuthorization(format!("Invalid UTF-8 in credentials: {}", e))
    })?;

    let (username, password) = decoded.split_once(':').ok_or_else(|| {
        AuthError::MalformedAuthorization(
            "Credentials must be in format 'username:password'".to_string(),
        )
    })?;

    Ok((username.to_string(), password.to_string()))
}

/// An authenticated staff member.
#[derive(Debug, Clone)]
pub struct StaffUser {
    pub username: String,
}

impl FromRequest for StaffUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|err| {
            debug!(path = %req.path(), error = %err, "Rejected staff request");
            ApiError::from(err)
        }))
    }
}

fn authenticate(req: &HttpRequest) -> Result<StaffUser, AuthError> {
    let settings = req
        .app_data::<web::Data<AuthSettings>>()
        .ok_or(AuthError::NotConfigured)?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| {
            AuthError::MalformedAuthorization(
                "Authorization header contains invalid characters".to_string(),
            )
        })?;

    let (username, password) = parse_basic_auth_header(auth_header)?;
    settings.verify(&username, &password)?;

    Ok(StaffUser { username })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_valid_header() {
        // base64("user:shelterPass1")
        let (username, password) = parse_basic_auth_header("Basic dXNlcjpzaGVsdGVyUGFzczE=").unwrap();
        assert_eq!(username, "user");
        assert_eq!(password, "shelterPass1");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let header = format!("Basic {}", BASE64_STANDARD.encode("user:pa:ss"));
        let (_, password) = parse_basic_auth_header(&header).unwrap();
        assert_eq!(password, "pa:ss");
    }

    #[test]
    fn test_parse_rejects_malformed_headers() {
        assert!(matches!(
            parse_basic_auth_header("Bearer abc"),
            Err(AuthError::MalformedAuthorization(_))
        ));
        assert!(matches!(
            parse_basic_auth_header("Basic not-base64!"),
            Err(AuthError::MalformedAuthorization(_))
        ));
        let no_colon = format!("Basic {}", BASE64_STANDARD.encode("nocolon"));
        assert!(matches!(
            parse_basic_auth_header(&no_colon),
            Err(AuthError::MalformedAuthorization(_))
        ));
    }

    #[test]
    fn test_authenticate_request() {
        let settings = web::Data::new(AuthSettings::new("user", "shelterPass1"));
        let good = format!("Basic {}", BASE64_STANDARD.encode("user:shelterPass1"));
        let bad = format!("Basic {}", BASE64_STANDARD.encode("user:wrong"));

        let req = TestRequest::post()
            .app_data(settings.clone())
            .insert_header((header::AUTHORIZATION, good))
            .to_http_request();
        assert_eq!(authenticate(&req).unwrap().username, "user");

        let req = TestRequest::post()
            .app_data(settings.clone())
            .insert_header((header::AUTHORIZATION, bad))
            .to_http_request();
        assert_eq!(authenticate(&req).unwrap_err(), AuthError::InvalidCredentials);

        let req = TestRequest::post().app_data(settings).to_http_request();
        assert_eq!(authenticate(&req).unwrap_err(), AuthError::MissingAuthorization);

        let req = TestRequest::post().to_http_request();
        assert_eq!(authenticate(&req).unwrap_err(), AuthError::NotConfigured);
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = AuthSettings::new("user", "shelterPass1");
        assert!(!format!("{:?}", settings).contains("shelterPass1"));
    }
}
