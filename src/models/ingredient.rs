use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::database::Table;

pub const INGREDIENTS: Table = Table::new(
    "ingredients",
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
);

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{TestSession, db_session};
    use rstest::*;

    #[rstest]
    #[tokio::test]
    async fn test_ingredient_model_compatibility(#[future] db_session: TestSession) {
        let mut db = db_session.await;
        let conn = db.connection().unwrap();

        sqlx::query("INSERT INTO ingredients (name) VALUES (?)")
            .bind("Test Ingredient")
            .execute(&mut *conn)
            .await
            .expect("Failed to insert ingredient");

        let ingredient = sqlx::query_as::<_, IngredientRecord>(
            "SELECT id, name, created_at FROM ingredients WHERE name = ?",
        )
        .bind("Test Ingredient")
        .fetch_one(&mut *conn)
        .await
        .expect("Failed to fetch ingredient");

        assert_eq!(ingredient.name, "Test Ingredient");
        assert!(ingredient.id > 0);
        assert!(!ingredient.created_at.is_empty());

        db.teardown().await.expect("Failed to tear down");
    }
}
