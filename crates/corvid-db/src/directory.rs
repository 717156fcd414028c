use crate::{model::account::Account as DbAccount, schema::accounts, PgPool};
use corvid_core::traits::{Account, AccountDirectory};
use corvid_error::Result;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

/// Account lookups against the shared `accounts` table
#[derive(Clone)]
pub struct PgAccountDirectory {
    db_pool: PgPool,
}

impl PgAccountDirectory {
    #[must_use]
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

impl AccountDirectory for PgAccountDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let account = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                accounts::table
                    .find(id)
                    .select(DbAccount::as_select())
                    .get_result(&mut *db_conn)
                    .await
                    .optional()
            })
            .await?;

        Ok(account.map(Account::from))
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>> {
        let handle = handle.to_owned();
        let account = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                accounts::table
                    .filter(accounts::handle.eq(handle))
                    .select(DbAccount::as_select())
                    .get_result(&mut *db_conn)
                    .await
                    .optional()
            })
            .await?;

        Ok(account.map(Account::from))
    }
}
