// ABOUTME: Integration tests for following authors
// ABOUTME: Self-follow, duplicate follow, unfollow and the followed-author page with previews
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    create_test_database, create_test_ingredient, create_test_media, create_test_recipe,
    create_test_user,
};
use foodgram_server::errors::ErrorCode;
use foodgram_server::pagination::PageParams;
use foodgram_server::services::subscriptions::{follow, subscriptions, unfollow};

#[tokio::test]
async fn test_self_follow_is_rejected_first() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "anna").await.unwrap();

    let err = follow(&db, user.id, user.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SelfSubscription);
    assert_eq!(err.http_status(), 400);
    assert!(!db.subscriptions().exists(user.id, user.id).await.unwrap());
}

#[tokio::test]
async fn test_follow_twice_then_unfollow_twice() {
    let db = create_test_database().await.unwrap();
    let anna = create_test_user(&db, "anna").await.unwrap();
    let boris = create_test_user(&db, "boris").await.unwrap();

    let (subscription, author) = follow(&db, boris.id, anna.id).await.unwrap();
    assert_eq!(subscription.user_id, boris.id);
    assert_eq!(subscription.author_id, anna.id);
    assert_eq!(author.username, "anna");

    let err = follow(&db, boris.id, anna.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyExists);

    unfollow(&db, boris.id, anna.id).await.unwrap();
    let err = unfollow(&db, boris.id, anna.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RelationNotFound);
}

#[tokio::test]
async fn test_unknown_author_is_not_found() {
    let db = create_test_database().await.unwrap();
    let boris = create_test_user(&db, "boris").await.unwrap();

    let err = follow(&db, boris.id, 999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_followed_authors_with_recipe_preview() {
    let db = create_test_database().await.unwrap();
    let (media, _dir) = create_test_media();
    let anna = create_test_user(&db, "anna").await.unwrap();
    let boris = create_test_user(&db, "boris").await.unwrap();
    let viktor = create_test_user(&db, "viktor").await.unwrap();
    let salt = create_test_ingredient(&db, "salt", "g").await.unwrap();

    for name in ["One", "Two", "Three"] {
        create_test_recipe(&db, &media, &anna, name, &[(salt.id, 1)])
            .await
            .unwrap();
    }

    follow(&db, viktor.id, anna.id).await.unwrap();
    follow(&db, viktor.id, boris.id).await.unwrap();

    let page = PageParams::default().resolve(6);
    let (authors, count) = subscriptions(&db, viktor.id, page, Some(2)).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(authors[0].followed.author.id, anna.id);
    assert_eq!(authors[0].followed.recipes_count, 3);
    let names: Vec<&str> = authors[0].recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Three", "Two"]);

    assert_eq!(authors[1].followed.author.id, boris.id);
    assert_eq!(authors[1].followed.recipes_count, 0);

    let (authors, _) = subscriptions(&db, viktor.id, page, None).await.unwrap();
    assert_eq!(authors[0].recipes.len(), 3);
}
