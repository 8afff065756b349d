//! Actix-web extractor for the caller-supplied identity header.
//!
//! The portal trusts the `User-ID` header as presented: there is no session
//! or token renewal. The extractor only verifies the id maps to a known user
//! before any handler logic (or query) runs.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use std::future::{ready, Ready};

use crate::config::USER_ID_HEADER;
use crate::db::{users, DbPool};
use crate::error::ErrorResponse;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a known user id in the `User-ID` header.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(identity: UserIdentity) -> impl Responder {
///     // identity.user_id is the verified caller id
/// }
/// ```
pub struct UserIdentity {
    pub user_id: String,
}

impl FromRequest for UserIdentity {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Get DbPool from app data
        let pool = match req.app_data::<web::Data<DbPool>>() {
            Some(pool) => pool,
            None => {
                return ready(Err(AuthError {
                    message: "Internal configuration error".to_string(),
                }));
            }
        };

        let user_id = match req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return ready(Err(AuthError {
                    message: "Missing User-ID header".to_string(),
                }));
            }
        };

        let lookup = {
            let conn = pool.connection();
            users::find_by_id(&conn, &user_id)
        };

        match lookup {
            Ok(Some(_)) => ready(Ok(UserIdentity { user_id })),
            Ok(None) => ready(Err(AuthError {
                message: "User not found".to_string(),
            })),
            Err(e) => ready(Err(AuthError {
                message: e.to_string(),
            })),
        }
    }
}
