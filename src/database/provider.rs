use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::session::{Session, SessionFactory};
use crate::error::Result;

type ProvideFn = dyn Fn() -> BoxFuture<'static, Result<Session>> + Send + Sync;

/// The injectable "get database session" dependency.
///
/// Every call to [`DbProvider::get`] opens a fresh session. Construction
/// failures are returned as-is.
#[derive(Clone)]
pub struct DbProvider {
    provide: Arc<ProvideFn>,
}

impl fmt::Debug for DbProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbProvider").finish_non_exhaustive()
    }
}

impl DbProvider {
    pub fn new<F, Fut>(provide: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Session>> + Send + 'static,
    {
        Self {
            provide: Arc::new(move || -> BoxFuture<'static, Result<Session>> {
                Box::pin(provide())
            }),
        }
    }

    pub fn from_factory(factory: SessionFactory) -> Self {
        Self::new(move || {
            let factory = factory.clone();
            async move { factory.session().await }
        })
    }

    pub async fn get(&self) -> Result<Session> {
        (self.provide)().await
    }

    /// Run `f` with a fresh session and close it afterwards, whatever `f` returns.
    pub async fn scope<T, F>(&self, f: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T>>,
    {
        let mut session = self.get().await?;
        let outcome = f(&mut session).await;
        session.close();
        outcome
    }
}
