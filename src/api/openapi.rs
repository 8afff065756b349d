//! OpenAPI documentation configuration.

use actix_web::{get, web, HttpResponse};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Compliance Portal Server",
        version = "0.3.0",
        description = "API server for submitting, reviewing, and extracting compliance forms with attached policy documents"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Account endpoints
        api::accounts::signup,
        api::accounts::login,
        api::accounts::logout,
        api::accounts::list_roles,
        api::accounts::user_role,
        // Submission endpoints
        api::submissions::submit_form,
        api::submissions::list_user_submissions,
        api::submissions::get_submission,
        api::submissions::last_submission,
        api::submissions::update_submission,
        // Extract + files
        api::extract::extract_data,
        api::downloads::download_policy,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Accounts
            models::SignupRequest,
            models::LoginRequest,
            models::LoginResponse,
            models::Role,
            models::User,
            api::accounts::StatusResponse,
            api::accounts::UserRoleResponse,
            // Submissions
            models::ReviewStatus,
            models::Submission,
            models::SubmissionSummary,
            models::ReviewUpdateRequest,
            models::FileInfo,
            api::submissions::SubmitResponse,
            api::submissions::UpdateResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Accounts", description = "Signup, login, and roles"),
        (name = "Submissions", description = "Form submission workflow"),
        (name = "Extract", description = "Full-table reporting dumps"),
        (name = "Files", description = "Policy document downloads")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the User-ID header security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("User-ID"),
                    ),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document as JSON.
///
/// GET /api/openapi.json
#[get("/api/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure documentation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
