#[macro_use]
extern crate tracing;

use corvid_config::database::Configuration as DatabaseConfig;
use corvid_error::{Error, Result};
use diesel::Connection;
use diesel_async::{
    async_connection_wrapper::AsyncConnectionWrapper,
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use self::{
    directory::PgAccountDirectory,
    pagination::Pagination,
    pool::PgPool,
    post_source::PgPostSource,
    store::{InMemoryRelationshipStore, PgRelationshipStore, RelationshipStore},
};

#[doc(hidden)]
pub use diesel_async;

mod directory;
mod error;
mod pagination;
mod pool;
mod post_source;

pub mod model;
#[allow(clippy::wildcard_imports)]
pub mod schema;
pub mod store;
pub mod types;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Connect to the database and run any pending migrations
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let conn_str = config.url.clone();
    let applied = tokio::task::spawn_blocking(move || {
        let mut migration_conn =
            AsyncConnectionWrapper::<AsyncPgConnection>::establish(conn_str.as_str())?;

        let applied = migration_conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(Error::msg)?
            .len();

        Ok::<_, Error>(applied)
    })
    .await??;

    debug!(applied, "ran pending migrations");

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());
    let pool = Pool::builder(manager)
        .max_size(config.max_connections as usize)
        .build()?;

    Ok(pool.into())
}
