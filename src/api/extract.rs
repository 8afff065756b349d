//! Reporting extract endpoint.

use actix_web::{get, web, HttpResponse};

use crate::api::submissions::FormNameQuery;
use crate::auth::UserIdentity;
use crate::db::{submissions, DbPool};
use crate::error::AppResult;
use crate::forms::FormKind;

/// Dump every row of a form's table for reporting.
///
/// GET /api/extract-data?formName=...
///
/// Not ownership-scoped: any authenticated user sees all rows. That mirrors
/// the shipped behavior and is flagged as a pending product decision rather
/// than silently narrowed here.
#[utoipa::path(
    get,
    path = "/api/extract-data",
    tag = "Extract",
    params(
        ("formName" = String, Query, description = "Human-readable form name")
    ),
    responses(
        (status = 200, description = "All rows of the form's table", body = [crate::models::Submission]),
        (status = 400, description = "Unknown form name", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/api/extract-data")]
pub async fn extract_data(
    _identity: UserIdentity,
    pool: web::Data<DbPool>,
    query: web::Query<FormNameQuery>,
) -> AppResult<HttpResponse> {
    let kind = FormKind::resolve(&query.form_name)?;

    let rows = {
        let conn = pool.connection();
        submissions::extract_all(&conn, kind)?
    };
    Ok(HttpResponse::Ok().json(rows))
}

/// Configure extract routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(extract_data);
}
