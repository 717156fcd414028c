use crate::schema::accounts;
use corvid_core::traits::Account as DirectoryAccount;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = accounts)]
pub struct Account {
    pub id: Uuid,
    pub handle: String,
    pub created_at: Timestamp,
}

#[derive(Clone, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount<'a> {
    pub id: Uuid,
    pub handle: &'a str,
}

impl From<Account> for DirectoryAccount {
    fn from(value: Account) -> Self {
        Self {
            id: value.id,
            handle: value.handle.into(),
        }
    }
}
