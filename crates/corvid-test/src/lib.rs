use corvid_config::database::Configuration as DatabaseConfig;
use corvid_db::{diesel_async::RunQueryDsl, PgPool};
use futures_util::FutureExt;
use iso8601_timestamp::Timestamp;
use std::{
    env,
    future::Future,
    panic::{self, AssertUnwindSafe},
};
use time::{Duration, OffsetDateTime};

pub use self::{directory::InMemoryDirectory, post_source::InMemoryPostSource};

mod directory;
mod post_source;

/// Deterministic timestamp `seconds` after the unix epoch
#[must_use]
pub fn timestamp(seconds: i64) -> Timestamp {
    Timestamp::from(OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds))
}

/// Run the future against a freshly migrated database and wipe the schema afterwards
///
/// Expects `DATABASE_URL` to point at a PostgreSQL instance that may be clobbered
pub async fn database_test<F, Fut>(func: F) -> Fut::Output
where
    F: FnOnce(PgPool) -> Fut,
    Fut: Future,
{
    let db_url = env::var("DATABASE_URL").expect("Missing database URL");
    let pool = corvid_db::connect(&DatabaseConfig {
        url: db_url.into(),
        max_connections: 10,
    })
    .await
    .expect("Failed to connect to database");

    let out = AssertUnwindSafe(func(pool.clone())).catch_unwind().await;

    pool.with_connection(|mut db_conn| async move {
        diesel::sql_query("DROP SCHEMA public CASCADE")
            .execute(&mut *db_conn)
            .await?;

        diesel::sql_query("CREATE SCHEMA public")
            .execute(&mut *db_conn)
            .await?;

        Ok::<_, diesel::result::Error>(())
    })
    .await
    .expect("Failed to reset schema");

    match out {
        Ok(out) => out,
        Err(err) => panic::resume_unwind(err),
    }
}
