use axum::extract::{FromRequestParts, Path};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::controllers;
use crate::database::{DbProvider, Engine, Session, SessionFactory};
use crate::error::{FasterApiError, Result};
use crate::models::{IngredientRecord, NewIngredient};

/// Shared application state: the production session provider plus an optional override.
#[derive(Debug, Clone)]
pub struct AppState {
    get_db: DbProvider,
    db_override: Option<DbProvider>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self::with_provider(DbProvider::from_factory(SessionFactory::new(engine)))
    }

    pub fn with_provider(get_db: DbProvider) -> Self {
        Self {
            get_db,
            db_override: None,
        }
    }

    /// Substitute `provider` for the production session provider.
    pub fn override_db(&mut self, provider: DbProvider) {
        tracing::debug!("Installed database provider override");
        self.db_override = Some(provider);
    }

    pub fn clear_db_override(&mut self) {
        self.db_override = None;
    }

    pub fn has_db_override(&self) -> bool {
        self.db_override.is_some()
    }

    /// The provider requests resolve sessions from.
    pub fn db(&self) -> &DbProvider {
        self.db_override.as_ref().unwrap_or(&self.get_db)
    }
}

/// Extracts a fresh session for the request. Closed when the handler drops it.
pub struct Db(pub Session);

impl FromRequestParts<AppState> for Db {
    type Rejection = FasterApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        state.db().get().await.map(Db)
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health/db", get(db_health))
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/ingredients/{id}", get(get_ingredient))
        .with_state(state)
}

async fn db_health(Db(mut session): Db) -> Result<Json<Value>> {
    let _: i64 = sqlx::query_scalar("SELECT 1")
        .fetch_one(session.connection()?)
        .await?;

    Ok(Json(json!({ "status": "ok", "session_id": session.id() })))
}

async fn list_ingredients(Db(mut session): Db) -> Result<Json<Vec<IngredientRecord>>> {
    let ingredients = controllers::get_all_ingredients(session.connection()?).await?;
    Ok(Json(ingredients))
}

async fn create_ingredient(
    Db(mut session): Db,
    Json(new): Json<NewIngredient>,
) -> Result<(StatusCode, Json<IngredientRecord>)> {
    let conn = session.connection()?;
    let id = controllers::create_ingredient(conn, &new.name).await?;
    let ingredient = controllers::get_ingredient(conn, id).await?;
    tracing::info!(ingredient_id = id, name = %ingredient.name, "Created ingredient");

    Ok((StatusCode::CREATED, Json(ingredient)))
}

async fn get_ingredient(
    Db(mut session): Db,
    Path(id): Path<i64>,
) -> Result<Json<IngredientRecord>> {
    let ingredient = controllers::get_ingredient(session.connection()?, id).await?;
    Ok(Json(ingredient))
}
