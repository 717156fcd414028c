use crate::{ensure_actor, permission, resolve_account, LimitContext, Page};
use corvid_config::feed::BlockVisibility;
use corvid_core::traits::{AccountDirectory, Post, PostSource};
use corvid_db::{Pagination, RelationshipStore};
use corvid_error::{ErrorType, Result, ResultExt};
use futures_util::{stream, StreamExt, TryStreamExt};
use garde::Validate;
use serde::{Deserialize, Serialize};
use std::{cmp::Reverse, collections::HashSet};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Upper bound on concurrent post source requests of a single feed assembly
const MAX_CONCURRENT_FETCHES: usize = 8;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedOrder {
    /// Newest first
    #[default]
    Recent,

    /// Most liked first, newest first among equally liked posts
    ByLikes,
}

#[derive(Clone, Debug, TypedBuilder, Validate)]
#[garde(context(LimitContext as ctx))]
pub struct GetFeed {
    #[garde(skip)]
    viewer_id: Uuid,

    /// Zero-based page index
    #[builder(default)]
    #[garde(skip)]
    page: usize,

    #[garde(range(min = 1, max = ctx.limit))]
    size: usize,

    #[builder(default)]
    #[garde(skip)]
    order: FeedOrder,
}

#[derive(Clone, Debug, TypedBuilder, Validate)]
#[garde(context(LimitContext as ctx))]
pub struct GetAccountPosts {
    /// ID of the account whose posts are listed
    #[garde(skip)]
    author_id: Uuid,

    #[builder(default)]
    #[garde(skip)]
    viewer_id: Option<Uuid>,

    #[builder(default)]
    #[garde(skip)]
    page: usize,

    #[garde(range(min = 1, max = ctx.limit))]
    size: usize,

    #[builder(default)]
    #[garde(skip)]
    order: FeedOrder,
}

/// Assembles timelines out of the relationship graph and the post source
///
/// Every call works on a fresh snapshot of the graph, pages aren't consistent with each other
#[derive(Clone, TypedBuilder)]
pub struct FeedService<S, D, P> {
    store: S,
    directory: D,
    post_source: P,
    #[builder(default)]
    block_visibility: BlockVisibility,
    #[builder(default)]
    limit_context: LimitContext,
}

impl<S, D, P> FeedService<S, D, P>
where
    S: RelationshipStore,
    D: AccountDirectory,
    P: PostSource,
{
    /// Accounts whose posts show up in the viewer's feed, the viewer included
    async fn visible_authors(&self, viewer_id: Uuid) -> Result<HashSet<Uuid>> {
        let mut authors: HashSet<Uuid> = self
            .store
            .outgoing(viewer_id)
            .await?
            .into_iter()
            .filter(|relationship| permission::is_active(Some(relationship)))
            .map(|relationship| relationship.following_id)
            .collect();

        if self.block_visibility == BlockVisibility::Bidirectional {
            for relationship in self.store.incoming(viewer_id).await? {
                if relationship.is_blocked() {
                    authors.remove(&relationship.follower_id);
                }
            }
        }

        authors.insert(viewer_id);
        Ok(authors)
    }

    /// Whether a block between the two accounts hides the author's posts from the viewer
    async fn is_hidden(&self, author_id: Uuid, viewer_id: Uuid) -> Result<bool> {
        if author_id == viewer_id {
            return Ok(false);
        }

        let viewer_blocked = self
            .store
            .find(viewer_id, author_id)
            .await?
            .is_some_and(|relationship| relationship.is_blocked());
        if viewer_blocked {
            return Ok(true);
        }

        if self.block_visibility == BlockVisibility::Directional {
            return Ok(false);
        }

        Ok(self
            .store
            .find(author_id, viewer_id)
            .await?
            .is_some_and(|relationship| relationship.is_blocked()))
    }

    async fn sort(&self, mut posts: Vec<Post>, order: FeedOrder) -> Result<Vec<Post>> {
        match order {
            FeedOrder::Recent => {
                posts.sort_by_key(|post| Reverse((post.created_at, post.id)));
            }
            FeedOrder::ByLikes => {
                let post_ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();
                let like_counts = self.post_source.like_counts_of(&post_ids).await?;

                posts.sort_by_key(|post| {
                    let likes = like_counts.get(&post.id).copied().unwrap_or(0);
                    Reverse((likes, post.created_at, post.id))
                });
            }
        }

        Ok(posts)
    }

    /// Posts of the viewer and everyone they actively follow
    #[instrument(skip(self))]
    pub async fn get_feed(&self, get_feed: GetFeed) -> Result<Page<Post>> {
        get_feed
            .validate_with(&self.limit_context)
            .with_error_type(ErrorType::InvalidOperation(None))?;

        ensure_actor(get_feed.viewer_id)?;
        resolve_account(&self.directory, get_feed.viewer_id).await?;

        let authors = self.visible_authors(get_feed.viewer_id).await?;
        debug!(authors = authors.len(), "assembling feed");

        let posts: Vec<Post> = stream::iter(authors)
            .map(|author_id| self.post_source.posts_by_author(author_id))
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .try_concat()
            .await?;

        let posts = self.sort(posts, get_feed.order).await?;
        Ok(Page::from_ordered(
            posts,
            Pagination::new(get_feed.page, get_feed.size),
        ))
    }

    /// Posts of a single account as seen by the viewer
    ///
    /// Empty if a block stands between the two
    #[instrument(skip(self))]
    pub async fn get_account_posts(&self, get_account_posts: GetAccountPosts) -> Result<Page<Post>> {
        get_account_posts
            .validate_with(&self.limit_context)
            .with_error_type(ErrorType::InvalidOperation(None))?;

        resolve_account(&self.directory, get_account_posts.author_id).await?;

        let pagination = Pagination::new(get_account_posts.page, get_account_posts.size);
        if let Some(viewer_id) = get_account_posts.viewer_id {
            ensure_actor(viewer_id)?;
            resolve_account(&self.directory, viewer_id).await?;

            if self
                .is_hidden(get_account_posts.author_id, viewer_id)
                .await?
            {
                debug!("author hidden by block");
                return Ok(Page::empty(pagination));
            }
        }

        let posts = self
            .post_source
            .posts_by_author(get_account_posts.author_id)
            .await?;
        let posts = self.sort(posts, get_account_posts.order).await?;

        Ok(Page::from_ordered(posts, pagination))
    }
}
