use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::database::Table;

pub const RECIPE_INGREDIENTS: Table = Table::new(
    "recipe_ingredients",
    r#"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
        quantity_unit TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
);

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecipeIngredientRecord {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity_unit: String,
    pub notes: Option<String>,
    pub created_at: String,
}
