use clap::{Args, Subcommand, ValueEnum};
use color_eyre::eyre::{self, eyre};
use corvid_config::Configuration;
use corvid_core::traits::AccountDirectory;
use corvid_db::{PgAccountDirectory, PgPool, PgPostSource, PgRelationshipStore};
use corvid_error::Error;
use corvid_service::{
    feed::{FeedOrder, FeedService, GetAccountPosts, GetFeed},
    relationship::RelationshipService,
    stats::{GetFollows, StatsService},
    LimitContext,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Args)]
pub struct Pair {
    /// Handle of the account performing the action
    actor: String,

    /// Handle of the account the action is aimed at
    target: String,
}

#[derive(Args)]
pub struct Paging {
    /// Zero-based page index
    #[clap(long, default_value_t = 0)]
    page: usize,

    #[clap(long, default_value_t = 20)]
    size: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Order {
    Recent,
    ByLikes,
}

impl From<Order> for FeedOrder {
    fn from(value: Order) -> Self {
        match value {
            Order::Recent => Self::Recent,
            Order::ByLikes => Self::ByLikes,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Follow an account, or unfollow it if already following
    Follow(Pair),

    /// Block an account, or unblock it if already blocked
    Block(Pair),

    /// Mute or unmute a followed account
    Mute(Pair),

    /// Add or remove a followed account from the close friends
    CloseFriend(Pair),

    /// Set which notifications to receive from a followed account
    Notify {
        #[clap(flatten)]
        pair: Pair,

        /// `ALL`, `NONE` or any custom value
        preference: String,
    },

    /// Follower and following counts of an account
    Stats {
        account: String,

        #[clap(long)]
        viewer: Option<String>,
    },

    /// Detailed relationship of the viewer towards an account
    Status { account: String, viewer: String },

    /// List the followers of an account
    Followers {
        account: String,

        #[clap(long)]
        viewer: Option<String>,

        #[clap(flatten)]
        paging: Paging,
    },

    /// List the accounts an account follows
    Following {
        account: String,

        #[clap(long)]
        viewer: Option<String>,

        #[clap(flatten)]
        paging: Paging,
    },

    /// Show the home feed of an account
    Feed {
        viewer: String,

        #[clap(long, value_enum, default_value_t = Order::Recent)]
        order: Order,

        #[clap(flatten)]
        paging: Paging,
    },

    /// Show the posts of an account
    Posts {
        author: String,

        #[clap(long)]
        viewer: Option<String>,

        #[clap(long, value_enum, default_value_t = Order::Recent)]
        order: Order,

        #[clap(flatten)]
        paging: Paging,
    },
}

struct Context {
    directory: PgAccountDirectory,
    relationship: RelationshipService<PgRelationshipStore, PgAccountDirectory>,
    stats: StatsService<PgRelationshipStore, PgAccountDirectory>,
    feed: FeedService<PgRelationshipStore, PgAccountDirectory, PgPostSource>,
}

impl Context {
    fn new(config: &Configuration, db_pool: PgPool) -> Self {
        let directory = PgAccountDirectory::new(db_pool.clone());
        let store = PgRelationshipStore::new(db_pool.clone());
        let limit_context = LimitContext::from(&config.feed);

        Self {
            relationship: RelationshipService::builder()
                .store(store.clone())
                .directory(directory.clone())
                .build(),
            stats: StatsService::builder()
                .store(store.clone())
                .directory(directory.clone())
                .limit_context(limit_context)
                .build(),
            feed: FeedService::builder()
                .store(store)
                .directory(directory.clone())
                .post_source(PgPostSource::new(db_pool))
                .block_visibility(config.feed.block_visibility)
                .limit_context(limit_context)
                .build(),
            directory,
        }
    }

    async fn resolve(&self, handle: &str) -> eyre::Result<Uuid> {
        self.directory
            .find_by_handle(handle)
            .await
            .map_err(Error::into_error)?
            .map(|account| account.id)
            .ok_or_else(|| eyre!("account \"{handle}\" not found"))
    }

    async fn resolve_optional(&self, handle: Option<&str>) -> eyre::Result<Option<Uuid>> {
        match handle {
            Some(handle) => self.resolve(handle).await.map(Some),
            None => Ok(None),
        }
    }

    async fn resolve_pair(&self, pair: &Pair) -> eyre::Result<(Uuid, Uuid)> {
        Ok((self.resolve(&pair.actor).await?, self.resolve(&pair.target).await?))
    }
}

fn print<T>(value: &T) -> eyre::Result<()>
where
    T: Serialize,
{
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn handle(command: Command, config: &Configuration, db_pool: PgPool) -> eyre::Result<()> {
    let ctx = Context::new(config, db_pool);

    match command {
        Command::Follow(pair) => {
            let (actor, target) = ctx.resolve_pair(&pair).await?;
            let stats = ctx
                .relationship
                .toggle_follow(actor, target)
                .await
                .map_err(Error::into_error)?;
            print(&stats)?;
        }
        Command::Block(pair) => {
            let (actor, target) = ctx.resolve_pair(&pair).await?;
            ctx.relationship
                .toggle_block(actor, target)
                .await
                .map_err(Error::into_error)?;
        }
        Command::Mute(pair) => {
            let (actor, target) = ctx.resolve_pair(&pair).await?;
            ctx.relationship
                .toggle_mute(actor, target)
                .await
                .map_err(Error::into_error)?;
        }
        Command::CloseFriend(pair) => {
            let (actor, target) = ctx.resolve_pair(&pair).await?;
            ctx.relationship
                .toggle_close_friend(actor, target)
                .await
                .map_err(Error::into_error)?;
        }
        Command::Notify { pair, preference } => {
            let (actor, target) = ctx.resolve_pair(&pair).await?;
            ctx.relationship
                .set_notification_preference(actor, target, preference.as_str().into())
                .await
                .map_err(Error::into_error)?;
        }
        Command::Stats { account, viewer } => {
            let account = ctx.resolve(&account).await?;
            let viewer = ctx.resolve_optional(viewer.as_deref()).await?;
            let stats = ctx
                .stats
                .get_relationship_stats(account, viewer)
                .await
                .map_err(Error::into_error)?;
            print(&stats)?;
        }
        Command::Status { account, viewer } => {
            let account = ctx.resolve(&account).await?;
            let viewer = ctx.resolve(&viewer).await?;
            let status = ctx
                .stats
                .get_detailed_status(account, viewer)
                .await
                .map_err(Error::into_error)?;
            print(&status)?;
        }
        Command::Followers {
            account,
            viewer,
            paging,
        } => {
            let get_follows = GetFollows::builder()
                .account_id(ctx.resolve(&account).await?)
                .viewer_id(ctx.resolve_optional(viewer.as_deref()).await?)
                .page(paging.page)
                .size(paging.size)
                .build();
            let page = ctx
                .stats
                .get_followers(get_follows)
                .await
                .map_err(Error::into_error)?;
            print(&page)?;
        }
        Command::Following {
            account,
            viewer,
            paging,
        } => {
            let get_follows = GetFollows::builder()
                .account_id(ctx.resolve(&account).await?)
                .viewer_id(ctx.resolve_optional(viewer.as_deref()).await?)
                .page(paging.page)
                .size(paging.size)
                .build();
            let page = ctx
                .stats
                .get_following(get_follows)
                .await
                .map_err(Error::into_error)?;
            print(&page)?;
        }
        Command::Feed {
            viewer,
            order,
            paging,
        } => {
            let get_feed = GetFeed::builder()
                .viewer_id(ctx.resolve(&viewer).await?)
                .page(paging.page)
                .size(paging.size)
                .order(order.into())
                .build();
            let page = ctx
                .feed
                .get_feed(get_feed)
                .await
                .map_err(Error::into_error)?;
            print(&page)?;
        }
        Command::Posts {
            author,
            viewer,
            order,
            paging,
        } => {
            let get_account_posts = GetAccountPosts::builder()
                .author_id(ctx.resolve(&author).await?)
                .viewer_id(ctx.resolve_optional(viewer.as_deref()).await?)
                .page(paging.page)
                .size(paging.size)
                .order(order.into())
                .build();
            let page = ctx
                .feed
                .get_account_posts(get_account_posts)
                .await
                .map_err(Error::into_error)?;
            print(&page)?;
        }
    }

    Ok(())
}
