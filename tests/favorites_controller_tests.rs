mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use hotelwatch::{routes, services::favorite_service::FavoriteRepository};
use mongodb::bson::oid::ObjectId;
use tower::ServiceExt;

use common::{MemoryFavorites, MemoryUsers, response_json, test_state};

fn app(users: Arc<MemoryUsers>, favorites: Arc<MemoryFavorites>) -> Router {
    routes::app(test_state("http://127.0.0.1:9", users, favorites))
}

fn post_favorite(user_id: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/v1/favorites/{user_id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn create_favorite_is_visible_to_the_monitor() {
    let users = Arc::new(MemoryUsers::default());
    let favorites = Arc::new(MemoryFavorites::default());
    let user_id = users.add("Ana", "ana@example.com");

    let res = app(users, favorites.clone())
        .oneshot(post_favorite(
            &user_id.to_hex(),
            r#"{"hotel_id":"lp1897","target_price":120.5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = response_json(res).await;
    assert_eq!(body["data"]["favorite"]["hotel_id"], "lp1897");
    assert_eq!(body["data"]["favorite"]["user_id"], user_id.to_hex());
    assert_eq!(body["data"]["favorite"]["target_price"], 120.5);

    let listed = favorites.list_all().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user_id, user_id);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let res = app(Arc::new(MemoryUsers::default()), Arc::new(MemoryFavorites::default()))
        .oneshot(post_favorite(
            &ObjectId::new().to_hex(),
            r#"{"hotel_id":"lp1","target_price":10}"#,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(res).await["error"], "user not found");
}

#[tokio::test]
async fn same_hotel_twice_conflicts() {
    let users = Arc::new(MemoryUsers::default());
    let favorites = Arc::new(MemoryFavorites::default());
    let user_id = users.add("Ana", "ana@example.com").to_hex();
    let app = app(users, favorites);

    let first = app
        .clone()
        .oneshot(post_favorite(&user_id, r#"{"hotel_id":"lp1","target_price":10}"#))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_favorite(&user_id, r#"{"hotel_id":"lp1","target_price":8}"#))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(response_json(second).await["error"], "hotel already in favorites");
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let users = Arc::new(MemoryUsers::default());
    let user_id = users.add("Ana", "ana@example.com").to_hex();

    let cases = [
        ("not-an-id", r#"{"hotel_id":"lp1","target_price":10}"#, "invalid user_id parameter"),
        (user_id.as_str(), "{", "invalid JSON"),
        (user_id.as_str(), r#"{"target_price":10}"#, "hotel_id is required"),
        (
            user_id.as_str(),
            r#"{"hotel_id":"lp1","target_price":0}"#,
            "target_price is required and must be greater than 0",
        ),
        (
            user_id.as_str(),
            r#"{"hotel_id":"lp1"}"#,
            "target_price is required and must be greater than 0",
        ),
    ];

    for (id, payload, message) in cases {
        let res = app(users.clone(), Arc::new(MemoryFavorites::default()))
            .oneshot(post_favorite(id, payload))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(response_json(res).await["error"], message);
    }
}
