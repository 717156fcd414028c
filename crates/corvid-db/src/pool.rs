use corvid_error::{Error, Result};
use diesel_async::{
    pooled_connection::deadpool::{Object, Pool},
    scoped_futures::ScopedBoxFuture,
    AsyncConnection, AsyncPgConnection,
};
use std::future::Future;

#[derive(Clone)]
pub struct PgPool {
    inner: Pool<AsyncPgConnection>,
}

impl PgPool {
    /// Run the code inside a context with a database connection
    pub async fn with_connection<F, Fut, T, E>(&self, func: F) -> Result<T>
    where
        // Yes, this is *technically* leaky since a user could just move the object out of the closure
        // Just don't. kthx.
        F: FnOnce(Object<AsyncPgConnection>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Error>,
    {
        let conn = self.inner.get().await?;
        func(conn).await.map_err(Into::into)
    }

    /// Run the code inside a context with a database transaction
    pub async fn with_transaction<'a, R, F>(&self, func: F) -> Result<R>
    where
        F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, Result<R>>
            + Send
            + 'a,
        R: Send + 'a,
    {
        let mut conn = self.inner.get().await?;
        let conn: &mut AsyncPgConnection = &mut conn;
        conn.transaction(func).await
    }
}

impl From<Pool<AsyncPgConnection>> for PgPool {
    fn from(value: Pool<AsyncPgConnection>) -> Self {
        Self { inner: value }
    }
}
