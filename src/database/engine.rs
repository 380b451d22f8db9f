use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::error::Result;

/// Pool settings used when building an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// Keep a single connection alive for the life of the engine.
    /// Required for in-memory databases, where each connection is its own database.
    pub static_pool: bool,
    /// Log every executed statement.
    pub echo: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
            static_pool: false,
            echo: false,
        }
    }
}

impl EngineOptions {
    pub fn static_pool() -> Self {
        Self {
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            static_pool: true,
            echo: false,
        }
    }

    /// Static pool for in-memory URLs, the default pool otherwise.
    pub fn for_url(url: &str) -> Self {
        if is_in_memory(url) {
            Self::static_pool()
        } else {
            Self::default()
        }
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Pooled handle to a SQLite database. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct Engine {
    pool: SqlitePool,
    url: Arc<str>,
    disposed: Arc<AtomicBool>,
}

pub async fn create_engine(url: &str, options: EngineOptions) -> Result<Engine> {
    let mut connect_options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    if !options.echo {
        connect_options = connect_options.disable_statement_logging();
    }

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .min_connections(options.min_connections)
        .acquire_timeout(options.acquire_timeout);
    if options.static_pool {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(connect_options).await?;
    tracing::info!(url, static_pool = options.static_pool, "Created database engine");

    Ok(Engine {
        pool,
        url: Arc::from(url),
        disposed: Arc::new(AtomicBool::new(false)),
    })
}

impl Engine {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start a transaction on a pooled connection.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Number of connections currently held by the pool, idle or in use.
    pub fn open_connections(&self) -> u32 {
        self.pool.size()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Close every pooled connection. Waits for checked-out connections to be returned.
    pub async fn dispose(&self) {
        self.pool.close().await;
        self.disposed.store(true, Ordering::Release);
        tracing::info!(url = %self.url, "Disposed database engine");
    }

    /// Mark the pool closed without waiting. Idle connections are released
    /// once the last engine handle drops; returned connections are closed.
    pub fn close_now(&self) {
        // The pool is marked closed before the returned future is first polled
        drop(self.pool.close());
        self.disposed.store(true, Ordering::Release);
        tracing::info!(url = %self.url, "Closed database engine without waiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_urls_get_static_pool() {
        let options = EngineOptions::for_url("sqlite::memory:");
        assert!(options.static_pool);
        assert_eq!(options.max_connections, 1);

        let options = EngineOptions::for_url("sqlite://file:shared?mode=memory&cache=shared");
        assert!(options.static_pool);
    }

    #[test]
    fn test_file_urls_get_default_pool() {
        let options = EngineOptions::for_url("sqlite://fasterapi.db");
        assert!(!options.static_pool);
        assert_eq!(options.max_connections, 5);
    }

    #[tokio::test]
    async fn test_static_engine_keeps_one_connection() {
        let engine = create_engine("sqlite::memory:", EngineOptions::static_pool())
            .await
            .expect("Failed to create engine");

        assert_eq!(engine.open_connections(), 1);
        assert!(!engine.is_disposed());

        let one: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(engine.pool())
            .await
            .expect("Failed to run query");
        assert_eq!(one, 1);

        engine.dispose().await;
        assert!(engine.is_disposed());
        assert_eq!(engine.open_connections(), 0);
    }

    #[tokio::test]
    async fn test_close_now_refuses_new_connections() {
        let engine = create_engine("sqlite::memory:", EngineOptions::static_pool())
            .await
            .expect("Failed to create engine");

        engine.close_now();

        assert!(engine.is_disposed());
        assert!(engine.pool().is_closed());
        assert!(matches!(
            engine.pool().acquire().await,
            Err(sqlx::Error::PoolClosed)
        ));
    }

    #[tokio::test]
    async fn test_static_engine_shares_state_between_transactions() {
        let engine = create_engine("sqlite::memory:", EngineOptions::static_pool())
            .await
            .expect("Failed to create engine");

        let mut tx = engine.begin().await.expect("Failed to begin");
        sqlx::query("CREATE TABLE probe (id INTEGER PRIMARY KEY)")
            .execute(&mut *tx)
            .await
            .expect("Failed to create table");
        tx.commit().await.expect("Failed to commit");

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE name = 'probe'")
                .fetch_one(engine.pool())
                .await
                .expect("Failed to query sqlite_master");
        assert_eq!(count, 1);

        engine.dispose().await;
    }

    #[tokio::test]
    async fn test_invalid_url_propagates_error() {
        let result = create_engine(
            "sqlite:///nonexistent-dir/nested/app.db",
            EngineOptions::default(),
        )
        .await;
        assert!(result.is_err());
    }
}
