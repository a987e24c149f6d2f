// ABOUTME: Integration tests for recipe creation, update and deletion with ingredient lines
// ABOUTME: Covers validation, authorship checks, line replacement and image cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    create_test_database, create_test_ingredient, create_test_media, create_test_recipe,
    create_test_user, test_image,
};
use foodgram_server::database::RecipeFilter;
use foodgram_server::errors::ErrorCode;
use foodgram_server::models::{IngredientAmount, RecipeDraft, RecipeUpdate};
use foodgram_server::pagination::PageParams;
use foodgram_server::services::recipes::{
    create_recipe, delete_recipe, load_details, update_recipe,
};

fn draft(lines: Vec<IngredientAmount>) -> RecipeDraft {
    RecipeDraft {
        name: "Borscht".into(),
        text: "Boil beets".into(),
        cooking_time: 60,
        image: Some(test_image()),
        ingredients: lines,
    }
}

#[tokio::test]
async fn test_create_stores_lines_in_order() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let beet = create_test_ingredient(&db, "beet", "g").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();

    let recipe = create_test_recipe(&db, &media, &author, "Borscht", &[(salt.id, 5), (beet.id, 300)])
        .await
        .unwrap();

    let lines = db.recipes().lines(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "salt");
    assert_eq!(lines[0].amount, 5);
    assert_eq!(lines[1].name, "beet");
    assert_eq!(lines[1].amount, 300);

    assert!(media.root().join(&recipe.image).exists());
}

#[tokio::test]
async fn test_create_rejects_empty_and_duplicate_lines() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();

    let err = create_recipe(&db, &media, author.id, draft(vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.message.contains("at least one ingredient required"));

    let lines = vec![
        IngredientAmount { id: salt.id, amount: 1 },
        IngredientAmount { id: salt.id, amount: 2 },
    ];
    let err = create_recipe(&db, &media, author.id, draft(lines))
        .await
        .unwrap_err();
    assert!(err.message.contains("duplicate ingredient"));

    let (recipes, count) = db
        .recipes()
        .list(&RecipeFilter::default(), PageParams::default().resolve(6))
        .await
        .unwrap();
    assert!(recipes.is_empty());
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_requires_image() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();

    let mut without_image = draft(vec![IngredientAmount { id: salt.id, amount: 1 }]);
    without_image.image = None;
    let err = create_recipe(&db, &media, author.id, without_image)
        .await
        .unwrap_err();
    assert!(err.message.contains("image is required"));
}

#[tokio::test]
async fn test_unknown_ingredient_leaves_nothing_behind() {
    let db = create_test_database().await.unwrap();
    let (media, dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();

    let err = create_recipe(
        &db,
        &media,
        author.id,
        draft(vec![IngredientAmount { id: 999, amount: 1 }]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert!(db.recipes().by_author(author.id, None).await.unwrap().is_empty());
    let recipes_dir = dir.path().join("recipes");
    let leftovers = std::fs::read_dir(&recipes_dir).map_or(0, Iterator::count);
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_update_replaces_every_line() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let beet = create_test_ingredient(&db, "beet", "g").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();
    let dill = create_test_ingredient(&db, "dill", "bunch").await.unwrap();

    let recipe = create_test_recipe(&db, &media, &author, "Borscht", &[(beet.id, 300), (salt.id, 5)])
        .await
        .unwrap();

    let updated = update_recipe(
        &db,
        &media,
        author.id,
        recipe.id,
        RecipeUpdate {
            name: Some("Green borscht".into()),
            ingredients: Some(vec![IngredientAmount { id: dill.id, amount: 1 }]),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Green borscht");
    assert_eq!(updated.text, recipe.text);
    assert_eq!(updated.image, recipe.image);

    let lines = db.recipes().lines(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, dill.id);
}

#[tokio::test]
async fn test_update_requires_ingredients_and_keeps_state_on_error() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();
    let recipe = create_test_recipe(&db, &media, &author, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();

    let err = update_recipe(
        &db,
        &media,
        author.id,
        recipe.id,
        RecipeUpdate {
            name: Some("Renamed".into()),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let err = update_recipe(
        &db,
        &media,
        author.id,
        recipe.id,
        RecipeUpdate {
            ingredients: Some(vec![IngredientAmount { id: 999, amount: 1 }]),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = update_recipe(
        &db,
        &media,
        author.id,
        recipe.id,
        RecipeUpdate {
            name: Some("Renamed".into()),
            ingredients: Some(vec![]),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.message.contains("at least one ingredient required"));

    let err = update_recipe(
        &db,
        &media,
        author.id,
        recipe.id,
        RecipeUpdate {
            name: Some("Renamed".into()),
            ingredients: Some(vec![
                IngredientAmount { id: salt.id, amount: 1 },
                IngredientAmount { id: salt.id, amount: 2 },
            ]),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.message.contains("duplicate ingredient"));

    let stored = db.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Soup");
    assert_eq!(stored.text, recipe.text);
    assert_eq!(stored.image, recipe.image);
    let lines = db.recipes().lines(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, salt.id);
    assert_eq!(lines[0].amount, 5);
}

#[tokio::test]
async fn test_only_author_may_change_recipe() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let other = create_test_user(&db, "boris").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();
    let recipe = create_test_recipe(&db, &media, &author, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();

    let err = delete_recipe(&db, &media, other.id, recipe.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = delete_recipe(&db, &media, author.id, 12_345).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    delete_recipe(&db, &media, author.id, recipe.id).await.unwrap();
    assert!(db.recipes().get(recipe.id).await.unwrap().is_none());
    assert!(!media.root().join(&recipe.image).exists());
}

#[tokio::test]
async fn test_details_flags_follow_viewer() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let author = create_test_user(&db, "anna").await.unwrap();
    let viewer = create_test_user(&db, "boris").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();
    let recipe = create_test_recipe(&db, &media, &author, "Soup", &[(salt.id, 5)])
        .await
        .unwrap();

    db.subscriptions().create(viewer.id, author.id).await.unwrap();
    db.collections()
        .add(foodgram_server::models::RecipeCollection::Favorites, viewer.id, recipe.id)
        .await
        .unwrap();

    let details = load_details(&db, recipe.clone(), Some(viewer.id)).await.unwrap();
    assert!(details.author_is_subscribed);
    assert!(details.is_favorited);
    assert!(!details.is_in_shopping_cart);

    let anonymous = load_details(&db, recipe, None).await.unwrap();
    assert!(!anonymous.author_is_subscribed);
    assert!(!anonymous.is_favorited);
}

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let anna = create_test_user(&db, "anna").await.unwrap();
    let boris = create_test_user(&db, "boris").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();

    let first = create_test_recipe(&db, &media, &anna, "First", &[(salt.id, 1)]).await.unwrap();
    let second = create_test_recipe(&db, &media, &anna, "Second", &[(salt.id, 1)]).await.unwrap();
    let third = create_test_recipe(&db, &media, &boris, "Third", &[(salt.id, 1)]).await.unwrap();

    let page = PageParams::default().resolve(6);
    let (all, count) = db.recipes().list(&RecipeFilter::default(), page).await.unwrap();
    assert_eq!(count, 3);
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let by_anna = RecipeFilter {
        author_id: Some(anna.id),
        ..RecipeFilter::default()
    };
    let (recipes, count) = db.recipes().list(&by_anna, page).await.unwrap();
    assert_eq!(count, 2);
    assert!(recipes.iter().all(|r| r.author_id == anna.id));

    db.collections()
        .add(foodgram_server::models::RecipeCollection::ShoppingCart, boris.id, first.id)
        .await
        .unwrap();
    let in_cart = RecipeFilter {
        in_cart_of: Some(boris.id),
        ..RecipeFilter::default()
    };
    let (recipes, count) = db.recipes().list(&in_cart, page).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(recipes[0].id, first.id);
}
