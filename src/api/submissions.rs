//! Submission endpoints: submit, list, get-one, last submission, and the
//! reviewer update.

use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpResponse};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use utoipa::ToSchema;

use crate::auth::UserIdentity;
use crate::db::{submissions, DbPool};
use crate::error::{AppError, AppResult};
use crate::forms::FormKind;
use crate::models::{ReviewStatus, ReviewUpdateRequest, SubmissionFields};
use crate::services::{self, FileStore, StagedUpload};

/// Multipart field name carrying the attached document.
const FILE_FIELD: &str = "policy_document";

/// Upper bound for a single text field in the submit form.
const MAX_TEXT_FIELD_BYTES: usize = 65_536;

/// Submit response body.
#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
}

/// Reviewer update response body.
#[derive(Serialize, ToSchema)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

/// Query parameters naming a form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FormNameQuery {
    #[serde(rename = "formName")]
    pub form_name: String,
}

/// Everything parsed out of a submit-form multipart body.
struct ParsedSubmission {
    form_name: Option<String>,
    fields: SubmissionFields,
    upload: Option<StagedUpload>,
}

/// Drain a multipart field without saving.
async fn drain_field(field: &mut actix_multipart::Field) {
    while let Some(chunk) = field.next().await {
        let _ = chunk;
    }
}

/// Read one text field into a string, bounded.
async fn read_text_field(field: &mut actix_multipart::Field) -> AppResult<String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        if data.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::InvalidInput("Form field too large".to_string()));
        }
        data.extend_from_slice(&chunk);
    }
    String::from_utf8(data)
        .map_err(|_| AppError::InvalidInput("Form field is not valid UTF-8".to_string()))
}

/// Stream the attached document to a staged temp file, bounded.
async fn stage_file_field(
    field: &mut actix_multipart::Field,
    store: &FileStore,
    original_name: String,
    max_upload_size: usize,
) -> AppResult<StagedUpload> {
    let staged_path = store.stage_path();
    let mut staged_file = tokio::fs::File::create(&staged_path)
        .await
        .map_err(|e| AppError::FileSystem(format!("Failed to create staging file: {}", e)))?;

    let mut size: usize = 0;
    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                store.discard(&staged_path).await;
                return Err(AppError::InvalidInput(format!("Read error: {}", e)));
            }
        };
        size += chunk.len();
        if size > max_upload_size {
            store.discard(&staged_path).await;
            return Err(AppError::InvalidInput(format!(
                "Attached document exceeds the {} byte limit",
                max_upload_size
            )));
        }
        if let Err(e) = staged_file.write_all(&chunk).await {
            store.discard(&staged_path).await;
            return Err(AppError::FileSystem(format!(
                "Failed to write staging file: {}",
                e
            )));
        }
    }
    staged_file.flush().await.ok();

    Ok(StagedUpload {
        staged_path,
        original_name,
    })
}

/// Parse the submit-form multipart body. On error every staged file has
/// already been discarded.
async fn read_submission(
    payload: &mut Multipart,
    store: &FileStore,
    max_upload_size: usize,
) -> AppResult<ParsedSubmission> {
    let mut parsed = ParsedSubmission {
        form_name: None,
        fields: SubmissionFields::default(),
        upload: None,
    };

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                if let Some(upload) = parsed.upload.take() {
                    store.discard(&upload.staged_path).await;
                }
                return Err(AppError::InvalidInput(format!("Multipart error: {}", e)));
            }
        };

        let (name, filename) = {
            let Some(cd) = field.content_disposition() else {
                continue;
            };
            (
                cd.get_name().map(str::to_string),
                cd.get_filename().map(str::to_string),
            )
        };

        let result = match (name.as_deref(), filename) {
            (Some(FILE_FIELD), Some(original_name)) if !original_name.is_empty() => {
                if parsed.upload.is_some() {
                    drain_field(&mut field).await;
                    Err(AppError::InvalidInput(
                        "Unexpected additional file part".to_string(),
                    ))
                } else {
                    match stage_file_field(&mut field, store, original_name, max_upload_size).await
                    {
                        Ok(upload) => {
                            parsed.upload = Some(upload);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
            }
            // A file input left empty arrives as a file part with no name
            (Some(FILE_FIELD), _) => {
                drain_field(&mut field).await;
                Ok(())
            }
            (Some("formName"), _) => match read_text_field(&mut field).await {
                Ok(v) => {
                    parsed.form_name = Some(v);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            (Some("policy_title"), _) => match read_text_field(&mut field).await {
                Ok(v) => {
                    parsed.fields.policy_title = Some(v);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            (Some("comments"), _) => match read_text_field(&mut field).await {
                Ok(v) => {
                    parsed.fields.comments = Some(v);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            _ => {
                drain_field(&mut field).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            if let Some(upload) = parsed.upload.take() {
                store.discard(&upload.staged_path).await;
            }
            return Err(e);
        }
    }

    Ok(parsed)
}

/// Submit a form, creating a new submission or revising the caller's open
/// draft.
///
/// POST /submit-form (multipart/form-data)
#[utoipa::path(
    post,
    path = "/submit-form",
    tag = "Submissions",
    responses(
        (status = 200, description = "Submission recorded", body = SubmitResponse),
        (status = 400, description = "Unknown form name or malformed body", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[post("/submit-form")]
pub async fn submit_form(
    identity: UserIdentity,
    mut payload: Multipart,
    pool: web::Data<DbPool>,
    store: web::Data<FileStore>,
    max_upload_size: web::Data<usize>,
) -> AppResult<HttpResponse> {
    let parsed = read_submission(&mut payload, &store, *max_upload_size.get_ref()).await?;

    let kind = match parsed.form_name.as_deref().map(FormKind::resolve) {
        Some(Ok(kind)) => kind,
        other => {
            if let Some(upload) = parsed.upload {
                store.discard(&upload.staged_path).await;
            }
            return Err(match other {
                Some(Err(e)) => e,
                _ => AppError::InvalidInput("Invalid form name".to_string()),
            });
        }
    };

    services::create_or_revise(
        &pool,
        &store,
        kind,
        &identity.user_id,
        &parsed.fields,
        parsed.upload,
    )
    .await?;

    Ok(HttpResponse::Ok().json(SubmitResponse { success: true }))
}

/// List the caller's submissions for a form.
///
/// GET /api/user-submissions?formName=...
#[utoipa::path(
    get,
    path = "/api/user-submissions",
    tag = "Submissions",
    params(
        ("formName" = String, Query, description = "Human-readable form name")
    ),
    responses(
        (status = 200, description = "Summary list", body = [crate::models::SubmissionSummary]),
        (status = 400, description = "Unknown form name", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/api/user-submissions")]
pub async fn list_user_submissions(
    identity: UserIdentity,
    pool: web::Data<DbPool>,
    query: web::Query<FormNameQuery>,
) -> AppResult<HttpResponse> {
    let kind = FormKind::resolve(&query.form_name)?;

    let summaries = {
        let conn = pool.connection();
        submissions::list_for_user(&conn, kind, &identity.user_id)?
    };
    Ok(HttpResponse::Ok().json(summaries))
}

/// Get one of the caller's submissions by id.
///
/// GET /api/submission/{formName}/{id}
#[utoipa::path(
    get,
    path = "/api/submission/{formName}/{id}",
    tag = "Submissions",
    params(
        ("formName" = String, Path, description = "Human-readable form name"),
        ("id" = i64, Path, description = "Submission row id")
    ),
    responses(
        (status = 200, description = "Full submission row", body = crate::models::Submission),
        (status = 404, description = "Not found or not owned", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/api/submission/{form_name}/{id}")]
pub async fn get_submission(
    identity: UserIdentity,
    pool: web::Data<DbPool>,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let (form_name, id) = path.into_inner();
    let kind = FormKind::resolve(&form_name)?;

    let submission = {
        let conn = pool.connection();
        submissions::get_by_id_for_user(&conn, kind, id, &identity.user_id)?
    }
    .ok_or_else(|| AppError::NotFound("Submission".to_string()))?;

    Ok(HttpResponse::Ok().json(submission))
}

/// Get the caller's most recent submission for a form, or null.
///
/// GET /api/last-submission/{formName}
#[utoipa::path(
    get,
    path = "/api/last-submission/{formName}",
    tag = "Submissions",
    params(
        ("formName" = String, Path, description = "Human-readable form name")
    ),
    responses(
        (status = 200, description = "Latest submission, or JSON null when none exists", body = crate::models::Submission),
        (status = 400, description = "Unknown form name", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[get("/api/last-submission/{form_name}")]
pub async fn last_submission(
    identity: UserIdentity,
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let kind = FormKind::resolve(&path.into_inner())?;

    let last = {
        let conn = pool.connection();
        submissions::last_for_user(&conn, kind, &identity.user_id)?
    };
    Ok(HttpResponse::Ok().json(last))
}

/// Reviewer update of a submission's review fields by id. Deliberately not
/// ownership-checked; any authenticated caller acting as reviewer may move
/// a submission through the workflow.
///
/// PUT /api/update-submission/{formName}/{id}
#[utoipa::path(
    put,
    path = "/api/update-submission/{formName}/{id}",
    tag = "Submissions",
    params(
        ("formName" = String, Path, description = "Human-readable form name"),
        ("id" = i64, Path, description = "Submission row id")
    ),
    request_body = ReviewUpdateRequest,
    responses(
        (status = 200, description = "Submission updated", body = UpdateResponse),
        (status = 400, description = "Unknown form name or status", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown submission id", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
#[put("/api/update-submission/{form_name}/{id}")]
pub async fn update_submission(
    _identity: UserIdentity,
    pool: web::Data<DbPool>,
    path: web::Path<(String, i64)>,
    body: web::Json<ReviewUpdateRequest>,
) -> AppResult<HttpResponse> {
    let (form_name, id) = path.into_inner();
    let kind = FormKind::resolve(&form_name)?;
    let update = body.into_inner();

    let status = ReviewStatus::parse(&update.review_status).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Unknown review status '{}'",
            update.review_status
        ))
    })?;

    {
        let conn = pool.connection();
        submissions::review_update(&conn, kind, id, &update, status)?;
    }

    Ok(HttpResponse::Ok().json(UpdateResponse {
        success: true,
        message: "Submission updated successfully".to_string(),
    }))
}

/// Configure submission routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_form)
        .service(list_user_submissions)
        .service(get_submission)
        .service(last_submission)
        .service(update_submission);
}
