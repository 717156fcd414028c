use corvid_error::Result;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::future::Future;
use uuid::Uuid;

/// Identity of an account as far as the relationship graph is concerned
///
/// Profile data (display names, avatars, ...) lives with the directory and is never touched here
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub handle: SmolStr,
}

/// Lookup of accounts owned by an external component
pub trait AccountDirectory: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<Account>>> + Send;

    fn find_by_handle(&self, handle: &str)
        -> impl Future<Output = Result<Option<Account>>> + Send;
}
