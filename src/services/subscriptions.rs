// ABOUTME: Subscription business logic for following recipe authors
// ABOUTME: Self-follow rejection, author resolution and followed-author pages with recent recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use tracing::info;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{FollowedAuthor, Recipe, Subscription, User};
use crate::pagination::PageRequest;

/// A followed author with a preview of their newest recipes
#[derive(Debug, Clone)]
pub struct AuthorWithRecipes {
    /// Author and total recipe count
    pub followed: FollowedAuthor,
    /// Newest recipes, capped by `recipes_limit`
    pub recipes: Vec<Recipe>,
}

/// Follow an author
///
/// Self-follow is rejected before anything else is checked.
///
/// # Errors
///
/// `SelfSubscription`, `ResourceNotFound` for an unknown author,
/// `AlreadyExists` when already following
pub async fn follow(database: &Database, user_id: i64, author_id: i64) -> AppResult<(Subscription, User)> {
    if user_id == author_id {
        return Err(AppError::self_subscription());
    }
    let author = database
        .users()
        .get(author_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let subscription = database.subscriptions().create(user_id, author_id).await?;
    info!(user.id = user_id, author.id = author_id, "Subscribed to author");
    Ok((subscription, author))
}

/// Stop following an author
///
/// # Errors
///
/// `ResourceNotFound` for an unknown author, `RelationNotFound` when not following
pub async fn unfollow(database: &Database, user_id: i64, author_id: i64) -> AppResult<()> {
    if database.users().get(author_id).await?.is_none() {
        return Err(AppError::not_found("User"));
    }
    database.subscriptions().delete(user_id, author_id).await?;
    info!(user.id = user_id, author.id = author_id, "Unsubscribed from author");
    Ok(())
}

/// One page of followed authors, each with up to `recipes_limit` newest recipes
///
/// # Errors
///
/// Database failures
pub async fn subscriptions(
    database: &Database,
    user_id: i64,
    page: PageRequest,
    recipes_limit: Option<i64>,
) -> AppResult<(Vec<AuthorWithRecipes>, i64)> {
    let (followed, count) = database.subscriptions().list_followed(user_id, page).await?;

    let recipes = database.recipes();
    let mut authors = Vec::with_capacity(followed.len());
    for entry in followed {
        let preview = recipes
            .by_author(entry.author.id, recipes_limit.map(|limit| limit.max(0)))
            .await?;
        authors.push(AuthorWithRecipes {
            followed: entry,
            recipes: preview,
        });
    }
    Ok((authors, count))
}
