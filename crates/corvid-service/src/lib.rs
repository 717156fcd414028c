#[macro_use]
extern crate tracing;

use corvid_config::feed::{Configuration as FeedConfiguration, DEFAULT_MAX_PAGE_SIZE};
use corvid_core::traits::{Account, AccountDirectory};
use corvid_db::Pagination;
use corvid_error::{bail, corvid_error, ErrorType, Result};
use serde::Serialize;
use uuid::Uuid;

pub mod feed;
pub mod permission;
pub mod relationship;
pub mod stats;

/// Upper bound for page sizes, checked by the request validators
#[derive(Clone, Copy, Debug)]
pub struct LimitContext {
    limit: usize,
}

impl Default for LimitContext {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl From<&FeedConfiguration> for LimitContext {
    fn from(value: &FeedConfiguration) -> Self {
        Self {
            limit: value.max_page_size,
        }
    }
}

/// One page of an ordered result set
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    /// Number of items across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Cut the requested page out of the complete, already ordered result set
    fn from_ordered(items: Vec<T>, pagination: Pagination) -> Self {
        let total = items.len() as u64;

        Self {
            items: pagination.slice(items),
            page: pagination.page,
            size: pagination.size,
            total,
        }
    }

    fn empty(pagination: Pagination) -> Self {
        Self {
            items: Vec::new(),
            page: pagination.page,
            size: pagination.size,
            total: 0,
        }
    }
}

/// Refuse to act on behalf of an absent identity
fn ensure_actor(actor_id: Uuid) -> Result<()> {
    if actor_id.is_nil() {
        bail!(type = ErrorType::Unauthorized, "missing caller identity");
    }

    Ok(())
}

async fn resolve_account<D>(directory: &D, account_id: Uuid) -> Result<Account>
where
    D: AccountDirectory,
{
    directory.find_by_id(account_id).await?.ok_or_else(|| {
        corvid_error!(
            type = ErrorType::NotFound,
            format!("account {account_id} not found")
        )
    })
}
