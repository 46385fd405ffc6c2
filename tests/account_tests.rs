use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bedu::api::AppState;
use bedu::config::Config;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Seeded by the initial migration.
const SEED_ADMIN_USERNAME: &str = "superadmin";
const SEED_ADMIN_PASSWORD: &str = "password";

async fn spawn_app() -> (Router, Arc<AppState>) {
    spawn_app_with(|_| {}).await
}

async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.images_path = std::env::temp_dir()
        .join("bedu-test-images")
        .to_string_lossy()
        .to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    configure(&mut config);

    let state = bedu::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    (bedu::api::router(state.clone()), state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register_user(app: &Router, username: &str, email: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "username": username,
                "full_name": "Test User",
                "email": email,
                "password": "hunter22secret",
                "password_confirm": "hunter22secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn verify_user(app: &Router, state: &Arc<AppState>, username: &str) {
    let user = state
        .store
        .get_user_by_username(username)
        .await
        .unwrap()
        .expect("registered user should exist");
    let code = user.verification_code.expect("code should be set");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/verifyemail/{code}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn login_user(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

async fn login_admin(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn registration_rejects_duplicates_and_mismatches() {
    let (app, _state) = spawn_app().await;

    register_user(&app, "carol", "carol@example.com").await;

    // Same username, different email
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "username": "carol",
                "full_name": "Other Carol",
                "email": "other@example.com",
                "password": "hunter22secret",
                "password_confirm": "hunter22secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Same email (case-insensitive), different username
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "username": "carol2",
                "full_name": "Other Carol",
                "email": "CAROL@example.com",
                "password": "hunter22secret",
                "password_confirm": "hunter22secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Password confirmation mismatch
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "username": "dave",
                "full_name": "Dave",
                "email": "dave@example.com",
                "password": "hunter22secret",
                "password_confirm": "different-password",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_leaves_account_unverified() {
    let (app, state) = spawn_app().await;

    register_user(&app, "erin", "erin@example.com").await;

    let user = state
        .store
        .get_user_by_username("erin")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.verified);
    assert!(user.verification_code.is_some());
}

#[tokio::test]
async fn login_requires_verification() {
    let (app, state) = spawn_app().await;

    register_user(&app, "frank", "frank@example.com").await;

    // Correct password, but unverified
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "username": "frank", "password": "hunter22secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    verify_user(&app, &state, "frank").await;

    // Wrong password after verification
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "username": "frank", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct credentials succeed and the cookie is set
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "username": "frank", "password": "hunter22secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login should set the auth cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("bEDUCookie="));
    assert!(set_cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "User");
    assert!(json["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn verification_code_is_single_use() {
    let (app, state) = spawn_app().await;

    register_user(&app, "grace", "grace@example.com").await;

    let user = state
        .store
        .get_user_by_username("grace")
        .await
        .unwrap()
        .unwrap();
    let code = user.verification_code.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/verifyemail/{code}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Replay fails: the code was cleared on first use
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/verifyemail/{code}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unknown code fails too
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/verifyemail/definitely-not-a-code")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn otp_reset_flow_is_single_use() {
    let (app, state) = spawn_app().await;

    register_user(&app, "heidi", "heidi@example.com").await;
    verify_user(&app, &state, "heidi").await;

    // Unregistered email fails
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/forgot-password",
            serde_json::json!({ "email": "nobody@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/forgot-password",
            serde_json::json!({ "email": "heidi@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = state
        .store
        .get_user_by_username("heidi")
        .await
        .unwrap()
        .unwrap();
    let otp = user.otp.expect("OTP should be stored");
    assert!(user.otp_requested);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/change-password/{otp}"),
            serde_json::json!({
                "password": "brand-new-password",
                "password_confirm": "brand-new-password",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works, new one does
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "username": "heidi", "password": "hunter22secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    login_user(&app, "heidi", "brand-new-password").await;

    // The OTP cannot be consumed again
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/change-password/{otp}"),
            serde_json::json!({
                "password": "yet-another-password",
                "password_confirm": "yet-another-password",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let (app, state) = spawn_app().await;

    register_user(&app, "ivan", "ivan@example.com").await;
    verify_user(&app, &state, "ivan").await;
    let token = login_user(&app, "ivan", "hunter22secret").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/user/change-password",
            &token,
            serde_json::json!({
                "old_password": "wrong-password",
                "new_password": "replacement-pass",
                "confirm_password": "replacement-pass",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/user/change-password",
            &token,
            serde_json::json!({
                "old_password": "hunter22secret",
                "new_password": "replacement-pass",
                "confirm_password": "replacement-pass",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login_user(&app, "ivan", "replacement-pass").await;
}

#[tokio::test]
async fn role_change_guard() {
    let (app, _state) = spawn_app().await;

    let super_token = login_admin(&app, SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD).await;

    // A Super Admin may demote itself to Admin
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/admin",
            &super_token,
            serde_json::json!({ "role": "Admin" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "Admin");

    // Now a plain Admin, any further role change is forbidden. The token
    // still authenticates; the guard checks the stored role.
    let token = login_admin(&app, SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD).await;
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/admin",
            &token,
            serde_json::json!({ "role": "Super Admin" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_rejects_unknown_roles() {
    let (app, _state) = spawn_app().await;

    let token = login_admin(&app, SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/admin",
            &token,
            serde_json::json!({ "role": "Overlord" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_routes_reject_admin_tokens() {
    let (app, _state) = spawn_app().await;

    let admin_token = login_admin(&app, SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user/profile")
                .header("Authorization", format!("Bearer {admin_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // And missing tokens are unauthorized
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cookie_authenticates_without_header() {
    let (app, state) = spawn_app().await;

    register_user(&app, "judy", "judy@example.com").await;
    verify_user(&app, &state, "judy").await;
    let token = login_user(&app, "judy", "hunter22secret").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user/profile")
                .header("Cookie", format!("bEDUCookie={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "judy");
}

async fn delete_account(app: &Router, token: &str) {
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "DELETE",
            "/user",
            token,
            serde_json::json!({ "password": "hunter22secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleted_identity_cannot_be_reclaimed_by_default() {
    let (app, state) = spawn_app().await;

    register_user(&app, "nina", "nina@example.com").await;
    verify_user(&app, &state, "nina").await;
    let token = login_user(&app, "nina", "hunter22secret").await;
    delete_account(&app, &token).await;

    // The username and email stay taken even though the row is soft-deleted
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            serde_json::json!({
                "username": "nina",
                "full_name": "New Nina",
                "email": "nina@example.com",
                "password": "hunter22secret",
                "password_confirm": "hunter22secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleted_identity_reclaim_when_enabled() {
    let (app, state) =
        spawn_app_with(|config| config.auth.allow_reclaim_deleted_identities = true).await;

    register_user(&app, "phoenix", "phoenix@example.com").await;
    verify_user(&app, &state, "phoenix").await;
    let token = login_user(&app, "phoenix", "hunter22secret").await;
    delete_account(&app, &token).await;

    // With the flag on, the identity is free again
    register_user(&app, "phoenix", "phoenix@example.com").await;

    verify_user(&app, &state, "phoenix").await;
    login_user(&app, "phoenix", "hunter22secret").await;
}

#[tokio::test]
async fn email_update_rejects_taken_address() {
    let (app, state) = spawn_app().await;

    register_user(&app, "karen", "karen@example.com").await;
    verify_user(&app, &state, "karen").await;

    register_user(&app, "leo", "leo@example.com").await;
    verify_user(&app, &state, "leo").await;
    let token = login_user(&app, "leo", "hunter22secret").await;

    // Another account's address, even with different casing
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/user",
            &token,
            serde_json::json!({ "email": "KAREN@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-submitting your own address is a no-op, not a conflict
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/user",
            &token,
            serde_json::json!({ "email": "leo@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_account_requires_password_confirmation() {
    let (app, state) = spawn_app().await;

    register_user(&app, "mallory", "mallory@example.com").await;
    verify_user(&app, &state, "mallory").await;
    let token = login_user(&app, "mallory", "hunter22secret").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "DELETE",
            "/user",
            &token,
            serde_json::json!({ "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "DELETE",
            "/user",
            &token,
            serde_json::json!({ "password": "hunter22secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Soft-deleted: no longer visible through active lookups
    let user = state.store.get_user_by_username("mallory").await.unwrap();
    assert!(user.is_none());

    // And login fails
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            serde_json::json!({ "username": "mallory", "password": "hunter22secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
