use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bedu::api::AppState;
use bedu::config::Config;
use bedu::db::NewArticle;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.images_path = std::env::temp_dir()
        .join("bedu-test-images")
        .to_string_lossy()
        .to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();

    let state = bedu::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    (bedu::api::router(state.clone()), state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Inserts `count` articles directly through the store, owned by the
/// seeded Super Admin (id 1).
async fn seed_articles(state: &Arc<AppState>, count: usize) {
    for i in 1..=count {
        state
            .store
            .create_article(NewArticle {
                administrator_id: 1,
                title: format!("Article {i}"),
                summary: format!("Summary {i}"),
                description: format!("Body of article {i}"),
                image: String::new(),
                thumbnail: String::new(),
                label: "general".to_string(),
                slug: format!("article-{i}"),
            })
            .await
            .expect("Failed to seed article");
    }
}

async fn login_admin(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "superadmin", "password": "password" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

async fn register_and_login_user(app: &Router, state: &Arc<AppState>, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": username,
                        "full_name": "Reader",
                        "email": format!("{username}@example.com"),
                        "password": "hunter22secret",
                        "password_confirm": "hunter22secret",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let code = state
        .store
        .get_user_by_username(username)
        .await
        .unwrap()
        .unwrap()
        .verification_code
        .unwrap();
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

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": username, "password": "hunter22secret" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

#[tokio::test]
async fn pagination_returns_pages_and_totals() {
    let (app, state) = spawn_app().await;
    seed_articles(&state, 25).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article?page=1&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["meta"]["page"], 1);
    assert_eq!(json["meta"]["limit"], 10);
    assert_eq!(json["meta"]["total"], 25);
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["title"], "Article 1");
    assert_eq!(items[9]["title"], "Article 10");

    // Last page is short
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article?page=3&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["title"], "Article 21");
    assert_eq!(json["meta"]["total"], 25);
}

#[tokio::test]
async fn pagination_defaults_and_caps() {
    let (app, state) = spawn_app().await;
    seed_articles(&state, 15).await;

    // No parameters: page 1, limit 10
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["meta"]["page"], 1);
    assert_eq!(json["meta"]["limit"], 10);
    assert_eq!(json["data"].as_array().unwrap().len(), 10);

    // Unparsable parameters fall back to the defaults
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article?page=abc&limit=xyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["meta"]["page"], 1);
    assert_eq!(json["meta"]["limit"], 10);

    // An oversized limit is clamped to server.max_page_size (100)
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article?page=1&limit=5000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["meta"]["limit"], 100);
    assert_eq!(json["data"].as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn pagination_survives_huge_page_numbers() {
    let (app, state) = spawn_app().await;
    seed_articles(&state, 3).await;

    // u64::MAX as the page number must not overflow the offset arithmetic
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article?page=18446744073709551615&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["meta"]["total"], 3);
}

#[tokio::test]
async fn article_crud_via_multipart() {
    let (app, state) = spawn_app().await;
    let token = login_admin(&app).await;

    let boundary = "bedu-test-boundary";
    let body = multipart_body(
        boundary,
        &[
            ("title", "Learning Rust 2024"),
            ("abstract", "An introduction"),
            ("description", "Long form body text"),
            ("label", "tutorial"),
        ],
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/article")
                .header("Authorization", format!("Bearer {token}"))
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Learning Rust 2024");
    assert_eq!(json["data"]["abstract"], "An introduction");
    assert_eq!(json["data"]["slug"], "learning-rust-2024");
    let id = json["data"]["id"].as_i64().unwrap();

    // Title change re-derives the slug
    let body = multipart_body(boundary, &[("title", "Learning Rust, Revised!")]);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/admin/article/{id}"))
                .header("Authorization", format!("Bearer {token}"))
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "learning-rust-revised");
    assert_eq!(json["data"]["abstract"], "An introduction");

    // Anyone can read it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/article/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delete, then it is gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/admin/article/{id}"))
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/article/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let id = i32::try_from(id).unwrap();
    let row = state.store.get_article_by_id(id).await.unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn article_creation_requires_admin() {
    let (app, state) = spawn_app().await;
    let user_token = register_and_login_user(&app, &state, "reader1").await;

    let boundary = "bedu-test-boundary";
    let body = multipart_body(boundary, &[("title", "Not Allowed")]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/article")
                .header("Authorization", format!("Bearer {user_token}"))
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn like_toggle_round_trip() {
    let (app, state) = spawn_app().await;
    seed_articles(&state, 2).await;
    let token = register_and_login_user(&app, &state, "reader2").await;

    // First toggle likes
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article/like/1")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Article liked");

    // The liked list reflects it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user/liked")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let liked = json["data"].as_array().unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["title"], "Article 1");

    // Second toggle unlikes
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article/like/1")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["message"], "Article unliked");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user/liked")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // Liking an article that does not exist is a 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/article/like/999")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
