// ABOUTME: HTTP integration tests for recipe, favorite, cart and download routes
// ABOUTME: Exercises nested ingredient payloads, filters, permissions and the text report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{
    create_test_ingredient, create_test_recipe, create_test_resources, create_test_user,
    PNG_DATA_URI, TEST_BASE_URL,
};
use foodgram_server::server::build_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_fetch_recipe() {
    let (resources, _dir) = create_test_resources().await.unwrap();
    let db = &resources.database;
    let author = create_test_user(db, "anna").await.unwrap();
    let salt = create_test_ingredient(db, "salt", "g").await.unwrap();
    let beet = create_test_ingredient(db, "beet", "g").await.unwrap();
    let token = resources.auth_manager.generate_token(&author).unwrap();

    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&json!({
            "ingredients": [{"id": beet.id, "amount": 300}, {"id": salt.id, "amount": 5}],
            "image": PNG_DATA_URI,
            "name": "Borscht",
            "text": "Boil beets",
            "cooking_time": 60
        }))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json();
    assert_eq!(created["name"], "Borscht");
    assert_eq!(created["author"]["username"], "anna");
    assert_eq!(created["ingredients"][0]["name"], "beet");
    assert_eq!(created["ingredients"][0]["amount"], 300);
    assert_eq!(created["is_favorited"], false);
    assert!(created["image"]
        .as_str()
        .unwrap()
        .starts_with(&format!("{TEST_BASE_URL}/media/recipes/")));

    let id = created["id"].as_i64().unwrap();
    let response = AxumTestRequest::get(&format!("/api/recipes/{id}/"))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json();
    assert_eq!(fetched["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(fetched["author"]["is_subscribed"], false);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (resources, _dir) = create_test_resources().await.unwrap();
    let db = &resources.database;
    let author = create_test_user(db, "anna").await.unwrap();
    let salt = create_test_ingredient(db, "salt", "g").await.unwrap();
    let token = resources.auth_manager.generate_token(&author).unwrap();

    let cases = [
        json!({"ingredients": [], "image": PNG_DATA_URI, "name": "A", "text": "B", "cooking_time": 1}),
        json!({"ingredients": [{"id": salt.id, "amount": 1}], "name": "A", "text": "B", "cooking_time": 1}),
        json!({"ingredients": [{"id": salt.id, "amount": 1}, {"id": salt.id, "amount": 2}],
               "image": PNG_DATA_URI, "name": "A", "text": "B", "cooking_time": 1}),
        json!({"ingredients": [{"id": salt.id, "amount": 1}],
               "image": "data:image/bmp;base64,Qk0=", "name": "A", "text": "B", "cooking_time": 1}),
    ];
    for payload in &cases {
        let response = AxumTestRequest::post("/api/recipes/")
            .token(&token)
            .json(payload)
            .send(build_router(&resources))
            .await;
        assert_eq!(response.status(), 400, "payload: {payload}");
    }

    let response = AxumTestRequest::post("/api/recipes/")
        .json(&cases[0])
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_only_author_can_patch_or_delete() {
    let (resources, _dir) = create_test_resources().await.unwrap();
    let db = &resources.database;
    let author = create_test_user(db, "anna").await.unwrap();
    let other = create_test_user(db, "boris").await.unwrap();
    let salt = create_test_ingredient(db, "salt", "g").await.unwrap();
    let recipe = create_test_recipe(db, &resources.media, &author, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();
    let author_token = resources.auth_manager.generate_token(&author).unwrap();
    let other_token = resources.auth_manager.generate_token(&other).unwrap();
    let uri = format!("/api/recipes/{}/", recipe.id);

    let patch = json!({"name": "Better soup", "ingredients": [{"id": salt.id, "amount": 7}]});
    let response = AxumTestRequest::patch(&uri)
        .token(&other_token)
        .json(&patch)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 403);

    let response = AxumTestRequest::patch(&uri)
        .token(&author_token)
        .json(&json!({"name": "Better soup"}))
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::patch(&uri)
        .token(&author_token)
        .json(&patch)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["name"], "Better soup");
    assert_eq!(body["text"], recipe.text);
    assert_eq!(body["ingredients"][0]["amount"], 7);

    let response = AxumTestRequest::delete(&uri)
        .token(&other_token)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 403);

    let response = AxumTestRequest::delete(&uri)
        .token(&author_token)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 204);

    let response = AxumTestRequest::get(&uri).send(build_router(&resources)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_favorite_and_cart_toggles() {
    let (resources, _dir) = create_test_resources().await.unwrap();
    let db = &resources.database;
    let author = create_test_user(db, "anna").await.unwrap();
    let salt = create_test_ingredient(db, "salt", "g").await.unwrap();
    let recipe = create_test_recipe(db, &resources.media, &author, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();
    let token = resources.auth_manager.generate_token(&author).unwrap();

    for collection in ["favorite", "shopping_cart"] {
        let uri = format!("/api/recipes/{}/{collection}/", recipe.id);

        let response = AxumTestRequest::post(&uri)
            .token(&token)
            .send(build_router(&resources))
            .await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json();
        assert_eq!(body["id"], recipe.id);
        assert_eq!(body["cooking_time"], 10);

        let response = AxumTestRequest::post(&uri)
            .token(&token)
            .send(build_router(&resources))
            .await;
        assert_eq!(response.status(), 400);

        let response = AxumTestRequest::delete(&uri)
            .token(&token)
            .send(build_router(&resources))
            .await;
        assert_eq!(response.status(), 204);

        let response = AxumTestRequest::delete(&uri)
            .token(&token)
            .send(build_router(&resources))
            .await;
        assert_eq!(response.status(), 400);
    }

    let response = AxumTestRequest::post("/api/recipes/999/favorite/")
        .token(&token)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_list_filters() {
    let (resources, _dir) = create_test_resources().await.unwrap();
    let db = &resources.database;
    let anna = create_test_user(db, "anna").await.unwrap();
    let boris = create_test_user(db, "boris").await.unwrap();
    let salt = create_test_ingredient(db, "salt", "g").await.unwrap();
    let soup = create_test_recipe(db, &resources.media, &anna, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();
    create_test_recipe(db, &resources.media, &boris, "Stew", &[(salt.id, 5)])
        .await
        .unwrap();
    let token = resources.auth_manager.generate_token(&boris).unwrap();

    AxumTestRequest::post(&format!("/api/recipes/{}/favorite/", soup.id))
        .token(&token)
        .send(build_router(&resources))
        .await;

    let response = AxumTestRequest::get("/api/recipes/")
        .send(build_router(&resources))
        .await;
    let page: Value = response.json();
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"][0]["name"], "Stew");

    let response = AxumTestRequest::get(&format!("/api/recipes/?author={}", anna.id))
        .send(build_router(&resources))
        .await;
    let page: Value = response.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Soup");

    let response = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .token(&token)
        .send(build_router(&resources))
        .await;
    let page: Value = response.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["is_favorited"], true);

    let response = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .send(build_router(&resources))
        .await;
    let page: Value = response.json();
    assert_eq!(page["count"], 2);

    let response = AxumTestRequest::get("/api/recipes/?limit=1")
        .send(build_router(&resources))
        .await;
    let page: Value = response.json();
    assert_eq!(
        page["next"],
        format!("{TEST_BASE_URL}/api/recipes/?page=2&limit=1")
    );
}

#[tokio::test]
async fn test_download_shopping_cart() {
    let (resources, _dir) = create_test_resources().await.unwrap();
    let db = &resources.database;
    let anna = create_test_user(db, "anna").await.unwrap();
    let salt = create_test_ingredient(db, "salt", "g").await.unwrap();
    let pepper = create_test_ingredient(db, "pepper", "g").await.unwrap();
    let soup = create_test_recipe(db, &resources.media, &anna, "Soup", &[(salt.id, 10), (pepper.id, 2)])
        .await
        .unwrap();
    let stew = create_test_recipe(db, &resources.media, &anna, "Stew", &[(salt.id, 5)])
        .await
        .unwrap();
    let token = resources.auth_manager.generate_token(&anna).unwrap();

    for recipe in [&soup, &stew] {
        AxumTestRequest::post(&format!("/api/recipes/{}/shopping_cart/", recipe.id))
            .token(&token)
            .send(build_router(&resources))
            .await;
    }

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.header("content-disposition").unwrap(),
        "attachment; filename=\"shopping_list.txt\""
    );
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/plain"));

    let report = response.text();
    assert!(report.contains("1. Pepper (g) — 2\n"));
    assert!(report.contains("2. Salt (g) — 15\n"));
    assert!(report.contains("— Soup (author: Test Cook)\n"));
    assert!(report.ends_with("\n— Stew (author: Test Cook)"));

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .send(build_router(&resources))
        .await;
    assert_eq!(response.status(), 401);
}
