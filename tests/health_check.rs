mod common;

use common::{spawn_app, spawn_app_on};
use serde_json::{json, Value};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/healthz"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn metrics_count_app_visits() {
    let app = spawn_app().await;

    for _ in 0..3 {
        app.client.get(app.url("/app/")).send().await.unwrap();
    }
    // admin and api routes are not counted
    app.client.get(app.url("/api/healthz")).send().await.unwrap();

    let html = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Chirpy has been visited 3 times!"));
}

#[tokio::test]
async fn reset_clears_users_and_hits_on_dev() {
    let app = spawn_app().await;
    app.create_user("a@b.com", "pw123").await;
    app.client.get(app.url("/app/")).send().await.unwrap();

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());

    let html = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("visited 0 times"));

    assert_eq!(401, app.login("a@b.com", "pw123").await.status().as_u16());
    assert_eq!(201, app.create_user("a@b.com", "pw123").await.status().as_u16());
}

#[tokio::test]
async fn reset_is_forbidden_outside_dev() {
    let app = spawn_app_on("prod").await;
    app.create_user("a@b.com", "pw123").await;

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(403, response.status().as_u16());

    assert_eq!(200, app.login("a@b.com", "pw123").await.status().as_u16());
}

#[tokio::test]
async fn validate_chirp_returns_cleaned_body() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/validate_chirp"))
        .json(&json!({ "body": "I had something interesting for breakfast kerfuffle" }))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["cleaned_body"],
        "I had something interesting for breakfast ****"
    );

    let too_long = app
        .client
        .post(app.url("/api/validate_chirp"))
        .json(&json!({ "body": "x".repeat(141) }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, too_long.status().as_u16());
}
