//! Ownership-checked file download endpoint.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, web, HttpResponse};
use tracing::debug;

use crate::auth::UserIdentity;
use crate::db::{file_info, DbPool};
use crate::error::{AppError, AppResult};
use crate::services::FileStore;

/// Download an uploaded policy document by file id.
///
/// GET /download-policy/{fileId}
///
/// The file must belong to the caller; an unknown id and someone else's id
/// both answer 404.
#[utoipa::path(
    get,
    path = "/download-policy/{fileId}",
    tag = "Files",
    params(
        ("fileId" = String, Path, description = "Generated file id")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown or unowned file", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/download-policy/{file_id}")]
pub async fn download_policy(
    identity: UserIdentity,
    pool: web::Data<DbPool>,
    store: web::Data<FileStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let file_id = path.into_inner();

    let info = {
        let conn = pool.connection();
        file_info::find_owned(&conn, &file_id, &identity.user_id)?
    }
    .ok_or_else(|| AppError::NotFound("File".to_string()))?;

    let file_path = store.resolve(&info.file_id, &info.original_filename).await?;
    debug!("Serving download {}", file_path.display());

    let data = tokio::fs::read(&file_path)
        .await
        .map_err(|e| AppError::FileSystem(format!("Failed to read {}: {}", file_path.display(), e)))?;

    let content_type =
        FileStore::content_type_for_extension(&FileStore::extension_of(&info.original_filename));

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(info.original_filename.clone())],
        })
        .body(data))
}

/// Configure file routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(download_policy);
}
