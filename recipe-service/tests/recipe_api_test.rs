//! HTTP tests for the recipe API against an in-memory store.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, memory_app, recipe};
use recipe_service::models::Category;
use recipe_service::services::memory::InjectedFailure;
use std::collections::HashSet;

#[tokio::test]
async fn returns_the_only_breakfast_recipe() {
    let (app, _) = memory_app(vec![recipe(1, Category::Breakfast, "Oatmeal")]);

    let response = get(&app, "/api/recipe?category=breakfast").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");

    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Oatmeal");
    assert_eq!(body["category"], "breakfast");
    assert_eq!(body["ingredients"][0]["name"], "Oats");
    assert_eq!(body["ingredients"][1]["amount"], "200ml");
    assert_eq!(body["kcal"], 350);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn missing_category_is_bad_request() {
    let (app, store) = memory_app(vec![recipe(1, Category::Breakfast, "Oatmeal")]);

    for uri in ["/api/recipe", "/api/recipe?category=", "/api/recipe?other=lunch"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body = body_json(response).await;
        assert!(body["error"].is_string(), "{uri}");
    }

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn malformed_query_string_reports_the_rejection() {
    let (app, store) = memory_app(vec![recipe(1, Category::Lunch, "Soup")]);

    let response = get(&app, "/api/recipe?category=lunch&category=lunch").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("invalid query string"), "{message}");
    assert!(!message.contains("required"), "{message}");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn unknown_category_is_rejected_without_store_access() {
    let (app, store) = memory_app(vec![recipe(1, Category::Breakfast, "Oatmeal")]);

    for uri in [
        "/api/recipe?category=brunch",
        "/api/recipe?category=Breakfast",
        "/api/recipe?category=SNACK",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid category"));
    }

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn empty_category_is_not_found() {
    let (app, store) = memory_app(vec![recipe(1, Category::Breakfast, "Oatmeal")]);

    let response = get(&app, "/api/recipe?category=dinner").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("dinner"));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn exhausted_pool_is_service_unavailable() {
    let (app, store) = memory_app(vec![recipe(1, Category::Lunch, "Soup")]);
    store.fail_with(Some(InjectedFailure::Unavailable));

    let response = get(&app, "/api/recipe?category=lunch").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Service unavailable");
}

#[tokio::test]
async fn storage_failures_do_not_leak_details() {
    let (app, store) = memory_app(vec![recipe(1, Category::Lunch, "Soup")]);

    for failure in [InjectedFailure::Query, InjectedFailure::CorruptIngredients] {
        store.fail_with(Some(failure));

        let response = get(&app, "/api/recipe?category=lunch").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }
}

#[tokio::test]
async fn each_category_only_returns_its_own_recipes() {
    let (app, _) = memory_app(vec![
        recipe(1, Category::Breakfast, "Oatmeal"),
        recipe(2, Category::Lunch, "Soup"),
        recipe(3, Category::Dinner, "Stew"),
        recipe(4, Category::Snack, "Apple"),
        recipe(5, Category::Dinner, "Risotto"),
    ]);

    for category in Category::ALL {
        for _ in 0..10 {
            let response = get(&app, &format!("/api/recipe?category={category}")).await;
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["category"], category.as_str());
        }
    }
}

#[tokio::test]
async fn repeated_requests_return_more_than_one_recipe() {
    let recipes = (1..=4)
        .map(|id| recipe(id, Category::Dinner, &format!("Dinner {id}")))
        .collect();
    let (app, _) = memory_app(recipes);

    let mut ids = HashSet::new();
    for _ in 0..100 {
        let body = body_json(get(&app, "/api/recipe?category=dinner").await).await;
        ids.insert(body["id"].as_i64().unwrap());
    }

    assert!(ids.len() > 1, "always returned {:?}", ids);
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let (app, _) = memory_app(vec![]);

    for uri in ["/api/recipe?category=lunch", "/api/recipe", "/health"] {
        let response = get(&app, uri).await;
        assert!(response.headers().contains_key("x-request-id"), "{uri}");
    }
}

#[tokio::test]
async fn health_reports_service_identity() {
    let (app, _) = memory_app(vec![]);

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "recipe-service-test");
}

#[tokio::test]
async fn health_and_readiness_fail_when_store_is_unreachable() {
    let (app, store) = memory_app(vec![]);
    store.fail_with(Some(InjectedFailure::Unavailable));

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["error"], "database unavailable");

    let response = get(&app, "/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_endpoint_exposes_lookup_counters() {
    let (app, _) = memory_app(vec![recipe(1, Category::Snack, "Apple")]);

    get(&app, "/api/recipe?category=snack").await;
    let response = get(&app, "/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("recipe_lookups_total"));
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn openapi_document_describes_recipe_endpoint() {
    let (app, _) = memory_app(vec![]);

    let response = get(&app, "/.well-known/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/recipe"]["get"].is_object());
    assert!(body["components"]["schemas"]["Recipe"].is_object());
    assert!(body["components"]["schemas"]["Ingredient"].is_object());
    assert!(body["components"]["schemas"]["ErrorResponse"].is_object());
    assert_eq!(
        body["paths"]["/api/recipe"]["get"]["responses"]["400"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/ErrorResponse"
    );
}

#[tokio::test]
async fn swagger_ui_serves_the_openapi_document() {
    let (app, _) = memory_app(vec![]);

    let response = get(&app, "/swagger/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "{content_type}");

    let response = get(&app, "/swagger/swagger-initializer.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let script = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(script.contains("/.well-known/openapi.json"));
}
