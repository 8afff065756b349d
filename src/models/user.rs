//! User and role models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User stored in database. The password hash never leaves the db layer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub username: String,
    pub usertype: Option<String>,
}

/// User row with credentials, used only during login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

/// Signup request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub usertype: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
}

/// A seeded reference role, as returned by the roles endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub role_name: String,
}
