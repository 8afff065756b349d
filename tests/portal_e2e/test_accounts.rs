//! E2E tests for signup, login, and the role surface.

use actix_web::test;
use serde_json::Value;

use crate::test_helpers::*;

#[actix_rt::test]
async fn test_signup_then_login() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    let user_id = signup_and_login(&app, "alice@example.com", "alice").await;
    assert!(!user_id.is_empty());
}

#[actix_rt::test]
async fn test_signup_rejects_duplicate_email() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    signup_and_login(&app, "alice@example.com", "alice").await;

    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(serde_json::json!({
            "email": "alice@example.com",
            "username": "alice2",
            "password": "pw",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("Email already exists"));
}

#[actix_rt::test]
async fn test_signup_rejects_duplicate_username() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    signup_and_login(&app, "alice@example.com", "alice").await;

    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(serde_json::json!({
            "email": "other@example.com",
            "username": "alice",
            "password": "pw",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("Username already exists"));
}

#[actix_rt::test]
async fn test_login_rejects_wrong_password() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    signup_and_login(&app, "alice@example.com", "alice").await;

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(serde_json::json!({
            "email": "alice@example.com",
            "password": "not the password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Unknown email answers the same way
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(serde_json::json!({
            "email": "nobody@example.com",
            "password": "whatever",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_rt::test]
async fn test_roles_require_identity() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/api/roles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let user_id = signup_and_login(&app, "alice@example.com", "alice").await;
    let req = test::TestRequest::get()
        .uri("/api/roles")
        .insert_header(("User-ID", user_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let roles: Value = test::read_body_json(resp).await;
    let roles = roles.as_array().unwrap();
    assert_eq!(roles.len(), 12);
    assert!(roles
        .iter()
        .any(|r| r["role_name"] == "Security Administrator"));
}

#[actix_rt::test]
async fn test_unknown_user_id_is_unauthorized() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/api/roles")
        .insert_header(("User-ID", "no-such-user"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_user_role_returns_usertype() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    let user_id = signup_and_login(&app, "alice@example.com", "alice").await;
    let req = test::TestRequest::get()
        .uri("/api/user-role")
        .insert_header(("User-ID", user_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["usertype"], "employee");
}

#[actix_rt::test]
async fn test_logout() {
    let ctx = create_test_context().await;
    let app = create_test_app(&ctx).await;

    let user_id = signup_and_login(&app, "alice@example.com", "alice").await;
    let req = test::TestRequest::post()
        .uri("/api/logout")
        .insert_header(("User-ID", user_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
}
