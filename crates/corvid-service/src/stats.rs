use crate::{ensure_actor, permission::Permissions, resolve_account, LimitContext, Page};
use corvid_core::traits::AccountDirectory;
use corvid_db::{
    model::relationship::Relationship,
    types::{NotificationPreference, RelationshipState},
    Pagination, RelationshipStore,
};
use corvid_error::{ErrorType, Result, ResultExt};
use futures_util::future;
use garde::Validate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStats {
    pub followers_count: u64,
    pub following_count: u64,
    /// Whether the viewer follows the account
    pub is_following: bool,
}

/// Relationship status as presented to clients
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    NotFollowing,
    Pending,
    Accepted,
    Blocked,
}

impl From<RelationshipState> for RelationshipStatus {
    fn from(value: RelationshipState) -> Self {
        match value {
            RelationshipState::Pending => Self::Pending,
            RelationshipState::Accepted => Self::Accepted,
            RelationshipState::Blocked => Self::Blocked,
        }
    }
}

/// The viewer's edge towards an account, flattened for clients
///
/// `is_blocked` only exists here. Storage knows nothing but the state
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStatus {
    pub status: RelationshipStatus,
    pub is_muted: bool,
    pub is_blocked: bool,
    pub is_close: bool,
    pub notification_preference: NotificationPreference,
    pub following: bool,
    /// Whether the account follows the viewer
    pub is_followed_back: bool,
}

impl DetailedStatus {
    fn new(relationship: Option<&Relationship>, is_followed_back: bool) -> Self {
        match relationship {
            Some(relationship) => Self {
                status: relationship.state.into(),
                is_muted: relationship.muted,
                is_blocked: relationship.is_blocked(),
                is_close: relationship.close_friend,
                notification_preference: relationship.notification_preference.clone(),
                following: relationship.is_following(),
                is_followed_back,
            },
            None => Self {
                status: RelationshipStatus::NotFollowing,
                is_muted: false,
                is_blocked: false,
                is_close: false,
                notification_preference: NotificationPreference::None,
                following: false,
                is_followed_back,
            },
        }
    }
}

/// Entry of a follower/following listing
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    /// Whether the viewer follows this account
    pub is_following: bool,
}

#[derive(Clone, Debug, TypedBuilder, Validate)]
#[garde(context(LimitContext as ctx))]
pub struct GetFollows {
    /// ID of the account whose followers or followings are listed
    #[garde(skip)]
    account_id: Uuid,

    /// ID of the account looking at the listing
    #[builder(default)]
    #[garde(skip)]
    viewer_id: Option<Uuid>,

    /// Zero-based page index
    #[builder(default)]
    #[garde(skip)]
    page: usize,

    #[garde(range(min = 1, max = ctx.limit))]
    size: usize,
}

/// Whether `follower_id` follows `following_id`
///
/// Block-only edges don't count
pub(crate) async fn is_following<S>(
    store: &S,
    follower_id: Uuid,
    following_id: Uuid,
) -> Result<bool>
where
    S: RelationshipStore,
{
    if follower_id == following_id {
        return Ok(false);
    }

    Ok(store
        .find(follower_id, following_id)
        .await?
        .is_some_and(|relationship| relationship.is_following()))
}

pub(crate) async fn collect_stats<S>(
    store: &S,
    account_id: Uuid,
    viewer_id: Option<Uuid>,
) -> Result<RelationshipStats>
where
    S: RelationshipStore,
{
    let is_following = async {
        match viewer_id {
            Some(viewer_id) => is_following(store, viewer_id, account_id).await,
            None => Ok(false),
        }
    };

    let (followers_count, following_count, is_following) = tokio::try_join!(
        store.count_by_following(account_id),
        store.count_by_follower(account_id),
        is_following,
    )?;

    Ok(RelationshipStats {
        followers_count,
        following_count,
        is_following,
    })
}

/// Read-only queries over the relationship graph
#[derive(Clone, TypedBuilder)]
pub struct StatsService<S, D> {
    store: S,
    directory: D,
    #[builder(default)]
    limit_context: LimitContext,
}

impl<S, D> StatsService<S, D>
where
    S: RelationshipStore,
    D: AccountDirectory,
{
    async fn resolve_viewer(&self, viewer_id: Option<Uuid>) -> Result<()> {
        if let Some(viewer_id) = viewer_id {
            ensure_actor(viewer_id)?;
            resolve_account(&self.directory, viewer_id).await?;
        }

        Ok(())
    }

    /// Follower and following counts of an account, and whether the viewer follows it
    #[instrument(skip(self))]
    pub async fn get_relationship_stats(
        &self,
        account_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> Result<RelationshipStats> {
        resolve_account(&self.directory, account_id).await?;
        self.resolve_viewer(viewer_id).await?;

        collect_stats(&self.store, account_id, viewer_id).await
    }

    /// Everything the viewer's edge towards the account says, plus whether it's mutual
    #[instrument(skip(self))]
    pub async fn get_detailed_status(
        &self,
        account_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<DetailedStatus> {
        ensure_actor(viewer_id)?;
        resolve_account(&self.directory, account_id).await?;
        resolve_account(&self.directory, viewer_id).await?;

        let (relationship, is_followed_back) = tokio::try_join!(
            self.store.find(viewer_id, account_id),
            is_following(&self.store, account_id, viewer_id),
        )?;

        Ok(DetailedStatus::new(relationship.as_ref(), is_followed_back))
    }

    /// Permissions granted by the edge `follower_id -> following_id`
    #[instrument(skip(self))]
    pub async fn get_permissions(&self, follower_id: Uuid, following_id: Uuid) -> Result<Permissions> {
        resolve_account(&self.directory, follower_id).await?;
        resolve_account(&self.directory, following_id).await?;

        let relationship = self.store.find(follower_id, following_id).await?;
        Ok(Permissions::evaluate(relationship.as_ref()))
    }

    /// Page through the accounts following the account
    #[instrument(skip(self))]
    pub async fn get_followers(&self, get_follows: GetFollows) -> Result<Page<AccountSummary>> {
        self.list(get_follows, |relationship| relationship.follower_id, true)
            .await
    }

    /// Page through the accounts the account follows
    #[instrument(skip(self))]
    pub async fn get_following(&self, get_follows: GetFollows) -> Result<Page<AccountSummary>> {
        self.list(get_follows, |relationship| relationship.following_id, false)
            .await
    }

    async fn list<F>(
        &self,
        get_follows: GetFollows,
        other_side: F,
        followers: bool,
    ) -> Result<Page<AccountSummary>>
    where
        F: Fn(&Relationship) -> Uuid,
    {
        get_follows
            .validate_with(&self.limit_context)
            .with_error_type(ErrorType::InvalidOperation(None))?;

        resolve_account(&self.directory, get_follows.account_id).await?;
        self.resolve_viewer(get_follows.viewer_id).await?;

        let pagination = Pagination::new(get_follows.page, get_follows.size);
        let (relationships, total) = if followers {
            tokio::try_join!(
                self.store
                    .list_by_following(get_follows.account_id, pagination),
                self.store.count_by_following(get_follows.account_id),
            )?
        } else {
            tokio::try_join!(
                self.store.list_by_follower(get_follows.account_id, pagination),
                self.store.count_by_follower(get_follows.account_id),
            )?
        };

        let viewer_id = get_follows.viewer_id;
        let items = future::try_join_all(relationships.iter().map(|relationship| {
            let id = other_side(relationship);

            async move {
                let is_following = match viewer_id {
                    Some(viewer_id) => is_following(&self.store, viewer_id, id).await?,
                    None => false,
                };

                Ok::<_, corvid_error::Error>(AccountSummary { id, is_following })
            }
        }))
        .await?;

        Ok(Page {
            items,
            page: pagination.page,
            size: pagination.size,
            total,
        })
    }
}
