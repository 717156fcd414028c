use corvid_core::traits::{Account, AccountDirectory};
use corvid_error::Result;
use dashmap::DashMap;
use triomphe::Arc;
use uuid::Uuid;

/// Account directory living entirely in memory
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    accounts: Arc<DashMap<Uuid, Account>>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account with a fresh ID
    pub fn register(&self, handle: &str) -> Account {
        let account = Account {
            id: Uuid::now_v7(),
            handle: handle.into(),
        };
        self.accounts.insert(account.id, account.clone());
        account
    }
}

impl AccountDirectory for InMemoryDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| entry.value().clone()))
    }
}
