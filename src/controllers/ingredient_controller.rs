use sqlx::SqliteConnection;

use crate::error::{FasterApiError, Result};
use crate::models::IngredientRecord;

/// Create a new ingredient and return its ID.
/// Fails on a duplicate name (UNIQUE constraint).
pub async fn create_ingredient(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    let ingredient_id = sqlx::query("INSERT INTO ingredients (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    Ok(ingredient_id)
}

pub async fn get_ingredient(conn: &mut SqliteConnection, id: i64) -> Result<IngredientRecord> {
    sqlx::query_as::<_, IngredientRecord>(
        "SELECT id, name, created_at FROM ingredients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(FasterApiError::IngredientNotFound(id))
}

/// All ingredients ordered by name
pub async fn get_all_ingredients(conn: &mut SqliteConnection) -> Result<Vec<IngredientRecord>> {
    let ingredients = sqlx::query_as::<_, IngredientRecord>(
        "SELECT id, name, created_at FROM ingredients ORDER BY name",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(ingredients)
}
