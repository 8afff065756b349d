//! E2E tests for the attached-file lifecycle and downloads.

use actix_web::test;

use crate::test_helpers::*;

const FORM: &str = "Supplier Security Assessment";

async fn download<S>(app: &S, user_id: &str, file_id: &str) -> (u16, Vec<u8>, Option<String>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get()
        .uri(&format!("/download-policy/{}", file_id))
        .insert_header(("User-ID", user_id))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = test::read_body(resp).await.to_vec();
    (status, body, disposition)
}

#[actix_rt::test]
async fn test_download_unknown_file_is_not_found() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    let (status, _, _) = download(&app, &user, "does-not-exist").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_upload_then_download_round_trip() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    let (status, _) = submit_form(
        &app,
        &user,
        FORM,
        "Vendor assessment",
        Some(("assessment.pdf", b"%PDF-1.4 vendor assessment")),
    )
    .await;
    assert_eq!(status, 200);

    let last = last_submission(&app, &user, FORM).await;
    let file_id = last["file_id"].as_str().unwrap().to_string();
    assert_eq!(last["file_name"], "assessment.pdf");

    let (status, body, disposition) = download(&app, &user, &file_id).await;
    assert_eq!(status, 200);
    assert_eq!(body, b"%PDF-1.4 vendor assessment");
    let disposition = disposition.unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("assessment.pdf"));
}

#[actix_rt::test]
async fn test_download_is_owner_scoped() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let alice = signup_and_login(&app, "alice@example.com", "alice").await;
    let bob = signup_and_login(&app, "bob@example.com", "bob").await;

    submit_form(
        &app,
        &alice,
        FORM,
        "Vendor assessment",
        Some(("assessment.pdf", b"private bytes")),
    )
    .await;

    let last = last_submission(&app, &alice, FORM).await;
    let file_id = last["file_id"].as_str().unwrap().to_string();

    let (status, _, _) = download(&app, &bob, &file_id).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_revise_replaces_file_on_disk_and_in_file_info() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    submit_form(
        &app,
        &user,
        FORM,
        "Vendor assessment",
        Some(("v1.pdf", b"first version")),
    )
    .await;

    let last = last_submission(&app, &user, FORM).await;
    let row_id = last["id"].as_i64().unwrap();
    let old_file_id = last["file_id"].as_str().unwrap().to_string();
    let old_path = ctx.uploads_dir.join(format!("{}.pdf", old_file_id));
    assert!(old_path.exists());

    // Reviewer sends it back; the next submit replaces the attachment
    let status = review_submission(&app, &user, FORM, row_id, "Needs revision").await;
    assert_eq!(status, 200);

    let (status, _) = submit_form(
        &app,
        &user,
        FORM,
        "Vendor assessment v2",
        Some(("v2.pdf", b"second version")),
    )
    .await;
    assert_eq!(status, 200);

    let (status, row) = get_submission(&app, &user, FORM, row_id).await;
    assert_eq!(status, 200);
    let new_file_id = row["file_id"].as_str().unwrap().to_string();
    assert_ne!(new_file_id, old_file_id);
    assert_eq!(row["file_name"], "v2.pdf");

    // Old bytes gone, old id no longer resolvable
    assert!(!old_path.exists());
    let (status, _, _) = download(&app, &user, &old_file_id).await;
    assert_eq!(status, 404);

    // New bytes retrievable under the new id
    let (status, body, _) = download(&app, &user, &new_file_id).await;
    assert_eq!(status, 200);
    assert_eq!(body, b"second version");
}

#[actix_rt::test]
async fn test_oversized_upload_rejected() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    let big = vec![0u8; TEST_MAX_UPLOAD_SIZE + 1];
    let (status, _) = submit_form(
        &app,
        &user,
        FORM,
        "Vendor assessment",
        Some(("huge.pdf", big.as_slice())),
    )
    .await;
    assert_eq!(status, 400);

    // Nothing staged or stored is left behind
    let leftovers: Vec<_> = std::fs::read_dir(&ctx.uploads_dir)
        .unwrap()
        .filter_map(Result::ok)
        .collect();
    assert!(leftovers.is_empty(), "upload dir should be empty");

    let list = list_submissions(&app, &user, FORM).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_submit_without_file_keeps_existing_attachment() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    submit_form(
        &app,
        &user,
        FORM,
        "Vendor assessment",
        Some(("v1.pdf", b"first version")),
    )
    .await;

    let last = last_submission(&app, &user, FORM).await;
    let row_id = last["id"].as_i64().unwrap();
    let file_id = last["file_id"].as_str().unwrap().to_string();

    review_submission(&app, &user, FORM, row_id, "Needs revision").await;
    submit_form(&app, &user, FORM, "Vendor assessment v2", None).await;

    let (_, row) = get_submission(&app, &user, FORM, row_id).await;
    assert_eq!(row["file_id"], file_id.as_str());
    assert_eq!(row["file_name"], "v1.pdf");

    let (status, body, _) = download(&app, &user, &file_id).await;
    assert_eq!(status, 200);
    assert_eq!(body, b"first version");
}
