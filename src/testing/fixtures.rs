//! Per-test database fixtures.
//!
//! `db_engine` builds a single-connection in-memory engine; `db_session`
//! depends on it, creates every declared table, and hands out one session.
//! Fixtures have no teardown hook, so tests finish with
//! [`TestSession::teardown`], or use [`with_db_session`], which tears down
//! even when the test body panics. A `TestSession` dropped without teardown
//! discards its connection and closes the engine; for an in-memory database
//! that connection is the database, so the schema goes with it.

use std::ops::{Deref, DerefMut};
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rstest::*;

use super::DEFAULT_TEST_DATABASE_URL;
use crate::database::{Engine, EngineOptions, Metadata, Session, SessionFactory, create_engine};
use crate::error::Result;
use crate::models;

#[fixture]
pub async fn db_engine() -> Engine {
    create_engine(DEFAULT_TEST_DATABASE_URL, EngineOptions::static_pool())
        .await
        .expect("Failed to create in-memory database")
}

#[fixture]
pub fn metadata() -> Metadata {
    models::metadata()
}

#[fixture]
pub async fn db_session(#[future] db_engine: Engine, metadata: Metadata) -> TestSession {
    TestSession::setup(db_engine.await, metadata)
        .await
        .expect("Failed to set up test session")
}

/// A session over a freshly created schema, together with the engine it came from.
#[derive(Debug)]
pub struct TestSession {
    engine: Engine,
    metadata: Metadata,
    session: Session,
    torn_down: bool,
}

impl TestSession {
    /// Create all tables, then open the session.
    pub async fn setup(engine: Engine, metadata: Metadata) -> Result<Self> {
        let mut tx = engine.begin().await?;
        metadata.create_all(&mut tx).await?;
        tx.commit().await?;

        let session = SessionFactory::new(engine.clone()).session().await?;
        Ok(Self {
            engine,
            metadata,
            session,
            torn_down: false,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Close the session and drop every declared table. The engine stays usable.
    pub async fn drop_schema(&mut self) -> Result<()> {
        self.session.close();

        let mut tx = self.engine.begin().await?;
        self.metadata.drop_all(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Drop the schema, then dispose the engine.
    pub async fn teardown(mut self) -> Result<()> {
        let dropped = self.drop_schema().await;
        self.engine.dispose().await;
        self.torn_down = true;
        dropped
    }
}

impl Drop for TestSession {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }
        tracing::warn!(url = self.engine.url(), "Test session dropped before teardown");
        self.engine.close_now();
        self.session.discard();
    }
}

impl Deref for TestSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.session
    }
}

impl DerefMut for TestSession {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

/// Run `body` against a fresh in-memory database holding `metadata`'s tables.
///
/// Teardown runs after `body` returns or panics; a panic is resumed afterwards.
pub async fn with_db_session<T, F>(metadata: Metadata, body: F) -> Result<T>
where
    F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, T>,
{
    let engine = create_engine(DEFAULT_TEST_DATABASE_URL, EngineOptions::static_pool()).await?;
    with_engine_session(engine, metadata, body).await
}

/// Like [`with_db_session`], on a caller-supplied engine. The engine is disposed on exit.
pub async fn with_engine_session<T, F>(engine: Engine, metadata: Metadata, body: F) -> Result<T>
where
    F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, T>,
{
    let mut test = TestSession::setup(engine, metadata).await?;

    let outcome = AssertUnwindSafe(body(&mut test.session))
        .catch_unwind()
        .await;

    match outcome {
        Ok(value) => {
            test.teardown().await?;
            Ok(value)
        }
        Err(panic) => {
            if let Err(e) = test.teardown().await {
                tracing::warn!(error = %e, "Teardown failed after test body panicked");
            }
            std::panic::resume_unwind(panic)
        }
    }
}
