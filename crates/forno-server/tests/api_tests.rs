//! End-to-end tests driving the router directly, no socket involved.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use forno_server::services::{MenuService, RestaurantService};
use forno_server::storage::{CacheStore, Database, MemoryCache, ReadThrough};
use forno_server::{router, AppState};

/// Router plus a database handle for direct row inspection.
async fn test_app(with_cache: bool) -> (Router, Arc<Database>) {
    let db = Arc::new(Database::in_memory().await.unwrap());
    db.seed_demo().await.unwrap();

    let cache: Option<Arc<dyn CacheStore>> = if with_cache {
        Some(Arc::new(MemoryCache::new()))
    } else {
        None
    };
    let read_through = ReadThrough::new(cache, Duration::from_secs(60), Duration::from_millis(250));

    let state = AppState {
        restaurants: Arc::new(RestaurantService::new(
            db.clone(),
            read_through.clone(),
            Duration::from_secs(5),
        )),
        menu: Arc::new(MenuService::new(
            db.clone(),
            read_through,
            Duration::from_secs(5),
        )),
    };

    (router(state), db)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(path);

    let request = match body {
        Some(json_body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn list_restaurants_is_a_bare_array() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(&app, "GET", "/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with('['), "expected bare array, got: {body}");

    let restaurants = parse(&body);
    assert_eq!(restaurants.as_array().unwrap().len(), 3);
    assert_eq!(restaurants[0]["name"], "Dough Joe's");
    assert_eq!(restaurants[0]["address"], "1 Main St");
}

#[tokio::test]
async fn get_by_id_matches_list_entry() {
    let (app, _db) = test_app(false).await;

    let (_, body) = send(&app, "GET", "/restaurants", None).await;
    let restaurants = parse(&body);

    for entry in restaurants.as_array().unwrap() {
        let id = entry["id"].as_i64().unwrap();
        let (status, body) = send(&app, "GET", &format!("/restaurants/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&parse(&body), entry);
    }
}

#[tokio::test]
async fn get_unknown_restaurant_is_404() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(&app, "GET", "/restaurants/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({ "error": "Restaurant not found" }));
}

#[tokio::test]
async fn delete_restaurant_then_gone_everywhere() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(&app, "DELETE", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty(), "204 must carry no payload");

    let (status, _) = send(&app, "GET", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/restaurants", None).await;
    let remaining = parse(&body);
    assert!(remaining
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["id"].as_i64() != Some(1)));
}

#[tokio::test]
async fn repeated_delete_is_404_not_a_second_204() {
    let (app, _db) = test_app(false).await;

    let (status, _) = send(&app, "DELETE", "/restaurants/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", "/restaurants/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_to_all_join_rows() {
    let (app, db) = test_app(false).await;

    for price in [5, 10, 15] {
        let (status, _) = send(
            &app,
            "POST",
            "/restaurant_pizzas",
            Some(json!({ "price": price, "pizza_id": 1, "restaurant_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(&app, "DELETE", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (orphans,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas WHERE restaurant_id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn list_pizzas_projects_ingredients_in_order() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(&app, "GET", "/pizzas", None).await;
    assert_eq!(status, StatusCode::OK);

    let pizzas = parse(&body);
    assert_eq!(pizzas[0]["name"], "Margherita");
    assert_eq!(
        pizzas[0]["ingredients"],
        json!(["tomato", "mozzarella", "basil"])
    );
}

#[tokio::test]
async fn create_offer_price_boundaries() {
    let (app, _db) = test_app(false).await;

    for (price, expected) in [
        (0, StatusCode::BAD_REQUEST),
        (31, StatusCode::BAD_REQUEST),
        (1, StatusCode::CREATED),
        (30, StatusCode::CREATED),
    ] {
        let (status, body) = send(
            &app,
            "POST",
            "/restaurant_pizzas",
            Some(json!({ "price": price, "pizza_id": 1, "restaurant_id": 1 })),
        )
        .await;
        assert_eq!(status, expected, "price={price}: {body}");

        if expected == StatusCode::BAD_REQUEST {
            assert_eq!(
                parse(&body),
                json!({ "errors": ["Price must be between 1 and 30"] })
            );
        }
    }
}

#[tokio::test]
async fn create_offer_with_dangling_reference_creates_no_row() {
    let (app, db) = test_app(false).await;

    for body in [
        json!({ "price": 12, "pizza_id": 999, "restaurant_id": 1 }),
        json!({ "price": 12, "pizza_id": 1, "restaurant_id": 999 }),
    ] {
        let (status, response) = send(&app, "POST", "/restaurant_pizzas", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse(&response)["errors"].is_array());
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn create_offer_rejects_missing_fields_before_persistence() {
    let (app, db) = test_app(false).await;

    let (status, body) = send(&app, "POST", "/restaurant_pizzas", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = parse(&body);
    assert_eq!(
        errors["errors"],
        json!([
            "price is required",
            "pizza_id is required",
            "restaurant_id is required"
        ])
    );

    // Non-JSON body is rejected the same way.
    let request = Request::builder()
        .method("POST")
        .uri("/restaurant_pizzas")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn create_offer_returns_full_join_entity() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(
        &app,
        "POST",
        "/restaurant_pizzas",
        Some(json!({ "price": 12, "pizza_id": 1, "restaurant_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let offer = parse(&body);
    assert_eq!(offer["price"], 12);
    assert_eq!(offer["restaurant_id"], 1);
    assert_eq!(offer["pizza_id"], 1);
    assert_eq!(offer["restaurant"]["name"], "Dough Joe's");
    assert_eq!(offer["restaurant"]["address"], "1 Main St");
    assert_eq!(offer["pizza"]["name"], "Margherita");
    assert_eq!(
        offer["pizza"]["ingredients"],
        json!(["tomato", "mozzarella", "basil"])
    );
}

#[tokio::test]
async fn cache_is_authoritative_until_invalidated() {
    let (app, db) = test_app(true).await;

    let (status, first) = send(&app, "GET", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::OK);

    // Mutate the row behind the cache's back.
    sqlx::query("UPDATE restaurants SET name = 'Renamed' WHERE id = 1")
        .execute(db.pool())
        .await
        .unwrap();

    // Within the expiration window the cached payload wins, byte for byte.
    let (status, second) = send(&app, "GET", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    // Deletion invalidates, so the third read sees the truth.
    let (status, _) = send(&app, "DELETE", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_invalidates_the_collection_key_too() {
    let (app, _db) = test_app(true).await;

    // Prime the collection cache.
    let (_, before) = send(&app, "GET", "/restaurants", None).await;
    assert_eq!(parse(&before).as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "DELETE", "/restaurants/3", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = send(&app, "GET", "/restaurants", None).await;
    assert_eq!(parse(&after).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn reads_work_without_any_cache_configured() {
    let (app, _db) = test_app(false).await;

    let (status, _) = send(&app, "GET", "/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/pizzas", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn landing_page_and_fallback() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Code challenge</h1>");

    let (status, body) = send(&app, "GET", "/no-such-route", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "<h1>Code challenge</h1>");
}

#[tokio::test]
async fn health_endpoint() {
    let (app, _db) = test_app(false).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({ "status": "ok" }));
}
