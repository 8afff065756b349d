//! E2E tests for the submission workflow and query surface.

use actix_web::test;
use serde_json::Value;

use crate::test_helpers::*;

const FORM: &str = "Information Security Policy Review";

#[actix_rt::test]
async fn test_first_submit_creates_review_row() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    let (status, body) = submit_form(&app, &user, FORM, "Q1 Review", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let list = list_submissions(&app, &user, FORM).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let last = last_submission(&app, &user, FORM).await;
    assert_eq!(last["review_status"], "review");
    assert_eq!(last["policy_title"], "Q1 Review");
    assert!(last["file_id"].is_null());
    assert!(last["file_name"].is_null());
}

#[actix_rt::test]
async fn test_submit_while_under_review_creates_second_row() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    submit_form(&app, &user, FORM, "Q1 Review", None).await;
    submit_form(&app, &user, FORM, "Q1 Review v2", None).await;

    let list = list_submissions(&app, &user, FORM).await;
    let rows = list.as_array().unwrap();
    assert_eq!(rows.len(), 2, "a row under review is immutable history");
}

#[actix_rt::test]
async fn test_needs_revision_row_is_revised_in_place() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    submit_form(&app, &user, FORM, "Q1 Review", None).await;
    submit_form(&app, &user, FORM, "Q1 Review v2", None).await;

    let list = list_submissions(&app, &user, FORM).await;
    let first_id = list.as_array().unwrap()[0]["id"].as_i64().unwrap();

    // Reviewer sends the first row back
    let status = review_submission(&app, &user, FORM, first_id, "Needs revision").await;
    assert_eq!(status, 200);

    // The next submission revises that row instead of creating a third
    let (status, _) = submit_form(
        &app,
        &user,
        FORM,
        "Q1 Review v3",
        Some(("revision.pdf", b"%PDF-1.4 revised")),
    )
    .await;
    assert_eq!(status, 200);

    let list = list_submissions(&app, &user, FORM).await;
    assert_eq!(list.as_array().unwrap().len(), 2, "no new row on revise");

    let (status, row) = get_submission(&app, &user, FORM, first_id).await;
    assert_eq!(status, 200);
    assert_eq!(row["id"].as_i64().unwrap(), first_id);
    assert_eq!(row["policy_title"], "Q1 Review v3");
    assert_eq!(row["review_status"], "review");
    assert_eq!(row["file_name"], "revision.pdf");
    assert!(row["file_id"].is_string());
}

#[actix_rt::test]
async fn test_list_requires_identity_header() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/user-submissions?formName={}", urlencode(FORM)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_unknown_form_name_rejected_everywhere() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    let (status, _) = submit_form(&app, &user, "Bogus Form", "x", None).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::get()
        .uri("/api/user-submissions?formName=Bogus%20Form")
        .insert_header(("User-ID", user.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::get()
        .uri("/api/extract-data?formName=Bogus%20Form")
        .insert_header(("User-ID", user.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::get()
        .uri("/api/last-submission/Bogus%20Form")
        .insert_header(("User-ID", user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_rt::test]
async fn test_get_one_is_owner_scoped() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let alice = signup_and_login(&app, "alice@example.com", "alice").await;
    let bob = signup_and_login(&app, "bob@example.com", "bob").await;

    submit_form(&app, &alice, FORM, "Alice's review", None).await;
    let list = list_submissions(&app, &alice, FORM).await;
    let id = list.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let (status, _) = get_submission(&app, &bob, FORM, id).await;
    assert_eq!(status, 404);

    let (status, _) = get_submission(&app, &alice, FORM, id).await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
async fn test_last_submission_is_caller_scoped() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let alice = signup_and_login(&app, "alice@example.com", "alice").await;
    let bob = signup_and_login(&app, "bob@example.com", "bob").await;

    submit_form(&app, &alice, FORM, "Alice's review", None).await;
    submit_form(&app, &bob, FORM, "Bob's newer review", None).await;

    let last = last_submission(&app, &alice, FORM).await;
    assert_eq!(last["policy_title"], "Alice's review");

    // A user with no submissions sees null
    let carol = signup_and_login(&app, "carol@example.com", "carol").await;
    let last = last_submission(&app, &carol, FORM).await;
    assert!(last.is_null());
}

#[actix_rt::test]
async fn test_reviewer_update_rejects_unknown_status() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    submit_form(&app, &user, FORM, "Q1 Review", None).await;
    let list = list_submissions(&app, &user, FORM).await;
    let id = list.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let status = review_submission(&app, &user, FORM, id, "rejected").await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_reviewer_update_missing_row_is_not_found() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    let status = review_submission(&app, &user, FORM, 424242, "approved").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_extract_returns_all_users_rows() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let alice = signup_and_login(&app, "alice@example.com", "alice").await;
    let bob = signup_and_login(&app, "bob@example.com", "bob").await;

    submit_form(&app, &alice, FORM, "Alice's review", None).await;
    submit_form(&app, &bob, FORM, "Bob's review", None).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/extract-data?formName={}", urlencode(FORM)))
        .insert_header(("User-ID", alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let rows: Value = test::read_body_json(resp).await;
    assert_eq!(rows.as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_every_registered_form_accepts_a_submission() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    for kind in compliance_portal_lib::forms::FormKind::all() {
        let (status, body) = submit_form(&app, &user, kind.name(), "smoke title", None).await;
        assert_eq!(status, 200, "submit failed for {}", kind.name());
        assert_eq!(body["success"], true);

        let last = last_submission(&app, &user, kind.name()).await;
        assert_eq!(last["review_status"], "review", "for {}", kind.name());
    }
}

#[actix_rt::test]
async fn test_each_form_kind_has_its_own_table() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;
    let user = signup_and_login(&app, "alice@example.com", "alice").await;

    submit_form(&app, &user, "Asset Inventory", "Server inventory", None).await;
    submit_form(&app, &user, "Incident Response Report", "Phishing report", None).await;

    let assets = list_submissions(&app, &user, "Asset Inventory").await;
    assert_eq!(assets.as_array().unwrap().len(), 1);

    let incidents = list_submissions(&app, &user, "Incident Response Report").await;
    assert_eq!(incidents.as_array().unwrap().len(), 1);

    let policies = list_submissions(&app, &user, FORM).await;
    assert!(policies.as_array().unwrap().is_empty());
}
