//! Test support: an in-memory database provider override, an in-process HTTP
//! client, and per-test database fixtures.
//!
//! ```ignore
//! let mut state = AppState::new(engine);
//! state.override_db(override_get_db().await?);
//! let client = TestClient::new(create_app(state));
//! ```

pub mod fixtures;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::database::{DbProvider, EngineOptions, SessionFactory, create_engine};
use crate::error::Result;

/// Private in-memory database.
pub const DEFAULT_TEST_DATABASE_URL: &str = "sqlite::memory:";

/// Provider override backed by a fresh in-memory database.
pub async fn override_get_db() -> Result<DbProvider> {
    override_get_db_url(DEFAULT_TEST_DATABASE_URL).await
}

/// Provider override backed by `test_db_url`. The engine is created once, here;
/// each provider call then opens and hands out its own session.
pub async fn override_get_db_url(test_db_url: &str) -> Result<DbProvider> {
    let engine = create_engine(test_db_url, EngineOptions::for_url(test_db_url).echo(false)).await?;
    Ok(DbProvider::from_factory(SessionFactory::new(engine)))
}

/// Drives a router in-process, one request per call.
#[derive(Debug, Clone)]
pub struct TestClient {
    app: Router,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .map_err(axum::Error::new)?;
        self.send(request).await
    }

    pub async fn post_json<T: Serialize>(&self, uri: &str, payload: &T) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(payload)?))
            .map_err(axum::Error::new)?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = match self.app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();
        Ok(TestResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FasterApiError;

    #[tokio::test]
    async fn test_override_provider_yields_working_session() {
        let provider = override_get_db().await.expect("Failed to build override");

        let (probe, one) = provider
            .scope(|session| {
                Box::pin(async move {
                    let one: i64 = sqlx::query_scalar("SELECT 1")
                        .fetch_one(session.connection()?)
                        .await?;
                    Ok::<_, FasterApiError>((session.probe(), one))
                })
            })
            .await
            .expect("Scoped session failed");

        assert_eq!(one, 1);
        assert!(probe.is_closed());
    }

    #[tokio::test]
    async fn test_override_sessions_are_not_reused() {
        let provider = override_get_db().await.expect("Failed to build override");

        let first = provider.get().await.expect("First session failed").probe();
        let second = provider.get().await.expect("Second session failed").probe();

        assert_ne!(first.session_id(), second.session_id());
        assert!(first.is_closed());
        assert!(second.is_closed());
    }

    #[tokio::test]
    async fn test_override_shares_in_memory_database_across_sessions() {
        let provider = override_get_db().await.expect("Failed to build override");

        provider
            .scope(|session| {
                Box::pin(async move {
                    sqlx::query("CREATE TABLE kv (k TEXT PRIMARY KEY)")
                        .execute(session.connection()?)
                        .await?;
                    Ok::<_, FasterApiError>(())
                })
            })
            .await
            .expect("Failed to create table");

        let count: i64 = provider
            .scope(|session| {
                Box::pin(async move {
                    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv")
                        .fetch_one(session.connection()?)
                        .await?;
                    Ok::<_, FasterApiError>(count)
                })
            })
            .await
            .expect("Table should be visible to the next session");

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_override_with_unreachable_url_fails() {
        let result = override_get_db_url("sqlite:///nonexistent-dir/nested/test.db").await;
        assert!(matches!(result, Err(FasterApiError::Database(_))));
    }
}
