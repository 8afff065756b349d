//! Account endpoints: signup, login, logout, and the role surface.

use actix_web::{get, post, web, HttpResponse};
use rand::RngCore;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::UserIdentity;
use crate::db::{roles, users, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse, SignupRequest};

/// Simple success envelope used by signup/logout.
#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// Caller's usertype tag.
#[derive(Serialize, ToSchema)]
pub struct UserRoleResponse {
    pub success: bool,
    pub usertype: Option<String>,
}

fn hash_password(password: &str) -> AppResult<String> {
    let mut salt = [0u8; 16];
    rand::rng().fill_bytes(&mut salt);

    let config = argon2::Config {
        variant: argon2::Variant::Argon2id,
        ..argon2::Config::default()
    };
    argon2::hash_encoded(password.as_bytes(), &salt, &config)
        .map_err(|e| AppError::Database(format!("Failed to hash password: {}", e)))
}

fn verify_password(encoded: &str, password: &str) -> bool {
    argon2::verify_encoded(encoded, password.as_bytes()).unwrap_or(false)
}

/// Create a new account.
///
/// POST /api/signup
#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "Accounts",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = StatusResponse),
        (status = 400, description = "Duplicate email or username", body = crate::error::ErrorResponse)
    )
)]
#[post("/api/signup")]
pub async fn signup(
    pool: web::Data<DbPool>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    {
        let conn = pool.connection();
        if users::email_exists(&conn, &body.email)? {
            return Err(AppError::InvalidInput("Email already exists".to_string()));
        }
        if users::username_exists(&conn, &body.username)? {
            return Err(AppError::InvalidInput("Username already exists".to_string()));
        }
    }

    // Hashing is CPU-bound; keep it off the worker thread.
    let password = body.password.clone();
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Database(format!("Hashing task failed: {}", e)))??;

    let user_id = {
        let conn = pool.connection();
        users::insert_user(
            &conn,
            &body.email,
            &body.username,
            &password_hash,
            body.usertype.as_deref(),
        )?
    };

    info!(user_id = %user_id, "User created");

    Ok(HttpResponse::Ok().json(StatusResponse {
        success: true,
        message: "User created successfully".to_string(),
    }))
}

/// Authenticate with email and password.
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
#[post("/api/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let creds = {
        let conn = pool.connection();
        users::find_credentials_by_email(&conn, &body.email)?
    };

    // Unknown email and wrong password are indistinguishable to the caller.
    let creds = creds
        .ok_or_else(|| AppError::InvalidInput("Invalid email or password".to_string()))?;

    let hash = creds.password_hash.clone();
    let password = body.password;
    let matches = web::block(move || verify_password(&hash, &password))
        .await
        .map_err(|e| AppError::Database(format!("Hashing task failed: {}", e)))?;

    if !matches {
        return Err(AppError::InvalidInput(
            "Invalid email or password".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        user_id: creds.id,
        username: creds.username,
    }))
}

/// Log out. The identity header is trusted as presented, so there is no
/// server-side session to tear down.
///
/// POST /api/logout
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Accounts",
    responses(
        (status = 200, description = "Logged out", body = StatusResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[post("/api/logout")]
pub async fn logout(_identity: UserIdentity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(StatusResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    }))
}

/// List the seeded reference roles.
///
/// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Accounts",
    responses(
        (status = 200, description = "Reference roles", body = [crate::models::Role]),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/api/roles")]
pub async fn list_roles(
    _identity: UserIdentity,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let roles = {
        let conn = pool.connection();
        roles::list_roles(&conn)?
    };
    Ok(HttpResponse::Ok().json(roles))
}

/// Get the caller's usertype tag.
///
/// GET /api/user-role
#[utoipa::path(
    get,
    path = "/api/user-role",
    tag = "Accounts",
    responses(
        (status = 200, description = "Caller's usertype", body = UserRoleResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/api/user-role")]
pub async fn user_role(
    identity: UserIdentity,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let usertype = {
        let conn = pool.connection();
        users::get_usertype(&conn, &identity.user_id)?
    };
    Ok(HttpResponse::Ok().json(UserRoleResponse {
        success: true,
        usertype,
    }))
}

/// Configure account routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(logout)
        .service(list_roles)
        .service(user_role);
}
