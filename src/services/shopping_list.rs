// ABOUTME: Shopping list aggregation and plain-text report rendering
// ABOUTME: Sums cart ingredient amounts per (name, unit) and lists the cart recipes with authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Local, TimeZone};

use crate::constants::shopping_list::{RECIPES_HEADER, TIMESTAMP_FORMAT, TITLE};
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::ShoppingList;

/// Aggregate the user's cart
///
/// # Errors
///
/// Database failures
pub async fn build_shopping_list(database: &Database, user_id: i64) -> AppResult<ShoppingList> {
    let collections = database.collections();
    Ok(ShoppingList {
        items: collections.shopping_list_items(user_id).await?,
        recipes: collections.cart_recipes(user_id).await?,
    })
}

/// Aggregate the user's cart and render it with the current local time
///
/// # Errors
///
/// Database failures
pub async fn build_report(database: &Database, user_id: i64) -> AppResult<String> {
    let list = build_shopping_list(database, user_id).await?;
    Ok(render_report(&list, &Local::now()))
}

/// Render the text report
///
/// Lines are joined with `\n` and the report has no trailing newline. An
/// empty list still renders both headers.
#[must_use]
pub fn render_report<Tz>(list: &ShoppingList, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = vec![
        format!("{TITLE} — {}", generated_at.format(TIMESTAMP_FORMAT)),
        String::new(),
    ];

    lines.extend(list.items.iter().enumerate().map(|(index, item)| {
        format!(
            "{}. {} ({}) — {}",
            index + 1,
            capitalize(&item.name),
            item.measurement_unit,
            item.total_amount
        )
    }));

    lines.extend([String::new(), RECIPES_HEADER.to_owned(), String::new()]);
    lines.extend(
        list.recipes
            .iter()
            .map(|recipe| format!("— {} (author: {})", recipe.name, recipe.author_name)),
    );

    lines.join("\n")
}

/// First character upper-cased, the rest lower-cased
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CartRecipe, ShoppingListItem};
    use chrono::Utc;

    fn item(name: &str, unit: &str, total: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.into(),
            measurement_unit: unit.into(),
            total_amount: total,
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("salt"), "Salt");
        assert_eq!(capitalize("SEA SALT"), "Sea salt");
        assert_eq!(capitalize("сахар"), "Сахар");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_render_report() {
        let list = ShoppingList {
            items: vec![item("pepper", "g", 2), item("salt", "g", 15)],
            recipes: vec![
                CartRecipe {
                    recipe_id: 1,
                    name: "Soup".into(),
                    author_name: "Anna Petrova".into(),
                },
                CartRecipe {
                    recipe_id: 2,
                    name: "Stew".into(),
                    author_name: "chef".into(),
                },
            ],
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap();

        let report = render_report(&list, &at);
        let expected = "Shopping list — 05.03.2024 09:07\n\
                        \n\
                        1. Pepper (g) — 2\n\
                        2. Salt (g) — 15\n\
                        \n\
                        Recipes in cart:\n\
                        \n\
                        — Soup (author: Anna Petrova)\n\
                        — Stew (author: chef)";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_render_empty_report() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let report = render_report(&ShoppingList::default(), &at);
        assert_eq!(
            report,
            "Shopping list — 01.01.2024 00:00\n\n\nRecipes in cart:\n"
        );
    }
}
