use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use sqlx::pool::PoolConnection;
use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};

use super::engine::Engine;
use crate::error::{FasterApiError, Result};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out sessions bound to one engine.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    engine: Engine,
}

impl SessionFactory {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Check a connection out of the engine's pool and wrap it in a new session.
    pub async fn session(&self) -> Result<Session> {
        let conn = self.engine.pool().acquire().await?;
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(session_id = id, "Opened session");
        Ok(Session {
            id,
            conn: Some(conn),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }
}

/// A unit of work holding one pooled connection until closed or dropped.
#[derive(Debug)]
pub struct Session {
    id: u64,
    conn: Option<PoolConnection<Sqlite>>,
    closed: Arc<AtomicBool>,
}

impl Session {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The underlying connection, usable as an `sqlx` executor.
    pub fn connection(&mut self) -> Result<&mut SqliteConnection> {
        match self.conn.as_mut() {
            Some(conn) => Ok(&mut **conn),
            None => Err(FasterApiError::SessionClosed(self.id)),
        }
    }

    pub async fn begin(&mut self) -> Result<Transaction<'_, Sqlite>> {
        Ok(self.connection()?.begin().await?)
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    pub fn probe(&self) -> SessionProbe {
        SessionProbe {
            id: self.id,
            closed: Arc::clone(&self.closed),
        }
    }

    /// Return the connection to the pool. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.release();
    }

    /// Close without returning the connection to the pool; the pool forgets it at once.
    pub(crate) fn discard(&mut self) {
        if let Some(conn) = self.conn.take() {
            drop(conn.detach());
            self.closed.store(true, Ordering::Release);
            tracing::debug!(session_id = self.id, "Discarded session");
        }
    }

    fn release(&mut self) {
        if let Some(conn) = self.conn.take() {
            drop(conn);
            self.closed.store(true, Ordering::Release);
            tracing::debug!(session_id = self.id, "Closed session");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

/// Observes whether a session has been closed, outliving the session itself.
#[derive(Debug, Clone)]
pub struct SessionProbe {
    id: u64,
    closed: Arc<AtomicBool>,
}

impl SessionProbe {
    pub fn session_id(&self) -> u64 {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
