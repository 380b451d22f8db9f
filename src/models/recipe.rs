use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::database::Table;

pub const RECIPES: Table = Table::new(
    "recipes",
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        instructions TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
);

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: i64,
    pub name: String,
    pub instructions: Option<String>,
    pub created_at: String,
}
