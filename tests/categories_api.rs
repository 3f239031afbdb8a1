//! Integration tests for category listing and per-category questions.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, test_app};
use trivia_api::db::queries::replace_all;

#[tokio::test]
async fn get_categories() {
    let (app, _) = test_app().await;
    let response = get(app, "/categories").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total_categories"], 6);
    assert_eq!(json["categories"]["1"], "Science");
    assert_eq!(json["categories"]["6"], "Sports");
}

#[tokio::test]
async fn no_categories_is_404() {
    let (app, pool) = test_app().await;
    replace_all(&pool, &[], &[]).await.unwrap();

    let response = get(app, "/categories").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn get_questions_by_category() {
    let (app, _) = test_app().await;
    let response = get(app, "/categories/2/questions").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total_questions"], 4);
    assert_eq!(json["current_category"], "Art");
    assert!(json["questions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|q| q["category"] == 2));
}

#[tokio::test]
async fn questions_of_unknown_category_is_404() {
    let (app, _) = test_app().await;
    let response = get(app, "/categories/99/questions").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], 404);
    assert_eq!(json["message"], "category 99 not found");
}

#[tokio::test]
async fn malformed_category_id_is_400() {
    let (app, _) = test_app().await;
    let response = get(app, "/categories/art/questions").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}
