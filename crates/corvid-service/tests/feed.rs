use self::common::{is_invalid_operation, Fixture};
use corvid_config::feed::BlockVisibility;
use corvid_core::traits::{Post, PostSource};
use corvid_error::{ErrorType, Result};
use corvid_service::feed::{FeedOrder, FeedService, GetAccountPosts, GetFeed};
use corvid_test::{timestamp, InMemoryPostSource};
use pretty_assertions::assert_eq;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use uuid::Uuid;

mod common;

fn ids(posts: &[Post]) -> Vec<Uuid> {
    posts.iter().map(|post| post.id).collect()
}

fn feed_of(viewer_id: Uuid, order: FeedOrder) -> GetFeed {
    GetFeed::builder()
        .viewer_id(viewer_id)
        .size(20)
        .order(order)
        .build()
}

#[tokio::test]
async fn feed_contains_own_and_followed_posts() {
    let fixture = Fixture::new();
    let [viewer, a, b, c] = fixture.accounts(["viewer", "a", "b", "c"]);
    let relationships = fixture.relationships();
    relationships.toggle_follow(viewer.id, a.id).await.unwrap();
    relationships.toggle_follow(viewer.id, b.id).await.unwrap();

    let post_a = fixture.post_source.publish(a.id, timestamp(10));
    let post_b = fixture.post_source.publish(b.id, timestamp(20));
    let post_v = fixture.post_source.publish(viewer.id, timestamp(30));
    fixture.post_source.publish(c.id, timestamp(40));

    let feed = fixture
        .feed(BlockVisibility::Directional)
        .get_feed(feed_of(viewer.id, FeedOrder::Recent))
        .await
        .unwrap();

    assert_eq!(feed.total, 3);
    assert_eq!(ids(&feed.items), [post_v.id, post_b.id, post_a.id]);
}

#[tokio::test]
async fn blocking_hides_posts() {
    let fixture = Fixture::new();
    let [viewer, a, b] = fixture.accounts(["viewer", "a", "b"]);
    let relationships = fixture.relationships();
    relationships.toggle_follow(viewer.id, a.id).await.unwrap();
    relationships.toggle_follow(viewer.id, b.id).await.unwrap();

    fixture.post_source.publish(a.id, timestamp(10));
    let post_b = fixture.post_source.publish(b.id, timestamp(20));

    relationships.toggle_block(viewer.id, a.id).await.unwrap();

    let feed = fixture
        .feed(BlockVisibility::Directional)
        .get_feed(feed_of(viewer.id, FeedOrder::Recent))
        .await
        .unwrap();
    assert_eq!(ids(&feed.items), [post_b.id]);
}

#[tokio::test]
async fn muted_accounts_stay_visible() {
    let fixture = Fixture::new();
    let [viewer, a] = fixture.accounts(["viewer", "a"]);
    let relationships = fixture.relationships();
    relationships.toggle_follow(viewer.id, a.id).await.unwrap();
    relationships.toggle_mute(viewer.id, a.id).await.unwrap();

    let post = fixture.post_source.publish(a.id, timestamp(10));

    let feed = fixture
        .feed(BlockVisibility::Directional)
        .get_feed(feed_of(viewer.id, FeedOrder::Recent))
        .await
        .unwrap();
    assert_eq!(ids(&feed.items), [post.id]);
}

#[tokio::test]
async fn author_blocks_depend_on_visibility_mode() {
    let fixture = Fixture::new();
    let [viewer, a] = fixture.accounts(["viewer", "a"]);
    let relationships = fixture.relationships();
    relationships.toggle_follow(viewer.id, a.id).await.unwrap();
    relationships.toggle_block(a.id, viewer.id).await.unwrap();

    let post = fixture.post_source.publish(a.id, timestamp(10));

    let directional = fixture
        .feed(BlockVisibility::Directional)
        .get_feed(feed_of(viewer.id, FeedOrder::Recent))
        .await
        .unwrap();
    assert_eq!(ids(&directional.items), [post.id]);

    let bidirectional = fixture
        .feed(BlockVisibility::Bidirectional)
        .get_feed(feed_of(viewer.id, FeedOrder::Recent))
        .await
        .unwrap();
    assert!(bidirectional.items.is_empty());
}

#[tokio::test]
async fn order_by_likes() {
    let fixture = Fixture::new();
    let [viewer, a] = fixture.accounts(["viewer", "a"]);
    fixture
        .relationships()
        .toggle_follow(viewer.id, a.id)
        .await
        .unwrap();

    let popular = fixture.post_source.publish(a.id, timestamp(10));
    let older_tie = fixture.post_source.publish(viewer.id, timestamp(20));
    let newer_tie = fixture.post_source.publish(a.id, timestamp(30));
    let unliked = fixture.post_source.publish(viewer.id, timestamp(40));
    fixture.post_source.like(popular.id, 5);
    fixture.post_source.like(older_tie.id, 2);
    fixture.post_source.like(newer_tie.id, 2);

    let feed = fixture
        .feed(BlockVisibility::Directional)
        .get_feed(feed_of(viewer.id, FeedOrder::ByLikes))
        .await
        .unwrap();
    assert_eq!(
        ids(&feed.items),
        [popular.id, newer_tie.id, older_tie.id, unliked.id]
    );
}

#[tokio::test]
async fn feed_pages() {
    let fixture = Fixture::new();
    let [viewer] = fixture.accounts(["viewer"]);
    let posts: Vec<Post> = (0..5)
        .map(|seconds| fixture.post_source.publish(viewer.id, timestamp(seconds)))
        .collect();

    let feed_service = fixture.feed(BlockVisibility::Directional);
    let page = feed_service
        .get_feed(GetFeed::builder().viewer_id(viewer.id).page(1).size(2).build())
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(ids(&page.items), [posts[2].id, posts[1].id]);

    let past_the_end = feed_service
        .get_feed(GetFeed::builder().viewer_id(viewer.id).page(3).size(2).build())
        .await
        .unwrap();
    assert!(past_the_end.items.is_empty());

    let err = feed_service
        .get_feed(GetFeed::builder().viewer_id(viewer.id).size(0).build())
        .await
        .unwrap_err();
    assert!(is_invalid_operation(err.error_type()));
}

#[tokio::test]
async fn feed_needs_known_viewer() {
    let fixture = Fixture::new();
    let feed_service = fixture.feed(BlockVisibility::Directional);

    let err = feed_service
        .get_feed(feed_of(Uuid::nil(), FeedOrder::Recent))
        .await
        .unwrap_err();
    assert_eq!(*err.error_type(), ErrorType::Unauthorized);

    let err = feed_service
        .get_feed(feed_of(Uuid::now_v7(), FeedOrder::Recent))
        .await
        .unwrap_err();
    assert_eq!(*err.error_type(), ErrorType::NotFound);
}

#[tokio::test]
async fn account_posts_respect_blocks() {
    let fixture = Fixture::new();
    let [viewer, author, stranger] = fixture.accounts(["viewer", "author", "stranger"]);
    let relationships = fixture.relationships();

    let older = fixture.post_source.publish(author.id, timestamp(10));
    let newer = fixture.post_source.publish(author.id, timestamp(20));

    let request = |viewer_id: Option<Uuid>| {
        GetAccountPosts::builder()
            .author_id(author.id)
            .viewer_id(viewer_id)
            .size(10)
            .build()
    };

    let directional = fixture.feed(BlockVisibility::Directional);
    let bidirectional = fixture.feed(BlockVisibility::Bidirectional);

    let anonymous = directional.get_account_posts(request(None)).await.unwrap();
    assert_eq!(ids(&anonymous.items), [newer.id, older.id]);

    relationships
        .toggle_block(author.id, stranger.id)
        .await
        .unwrap();
    let blocked_by_author = directional
        .get_account_posts(request(Some(stranger.id)))
        .await
        .unwrap();
    assert_eq!(blocked_by_author.total, 2);
    let blocked_by_author = bidirectional
        .get_account_posts(request(Some(stranger.id)))
        .await
        .unwrap();
    assert!(blocked_by_author.items.is_empty());

    relationships.toggle_block(viewer.id, author.id).await.unwrap();
    let blocking_viewer = directional
        .get_account_posts(request(Some(viewer.id)))
        .await
        .unwrap();
    assert!(blocking_viewer.items.is_empty());
    assert_eq!(blocking_viewer.total, 0);
}

/// Post source that counts how often the like counters are consulted
#[derive(Clone)]
struct CountingPostSource {
    inner: InMemoryPostSource,
    single_lookups: Arc<AtomicUsize>,
    batch_lookups: Arc<AtomicUsize>,
}

impl PostSource for CountingPostSource {
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        self.inner.posts_by_author(author_id).await
    }

    async fn like_count_of(&self, post_id: Uuid) -> Result<u64> {
        self.single_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.like_count_of(post_id).await
    }

    async fn like_counts_of(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        self.batch_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.like_counts_of(post_ids).await
    }
}

#[tokio::test]
async fn likes_are_fetched_in_one_batch() {
    let fixture = Fixture::new();
    let [viewer, a, b] = fixture.accounts(["viewer", "a", "b"]);
    let relationships = fixture.relationships();
    relationships.toggle_follow(viewer.id, a.id).await.unwrap();
    relationships.toggle_follow(viewer.id, b.id).await.unwrap();

    let authors = [viewer.id, a.id, b.id];
    for (seconds, likes) in (0..30).zip((0..4).cycle()) {
        let author_id = authors[usize::try_from(seconds).unwrap() % authors.len()];
        let post = fixture.post_source.publish(author_id, timestamp(seconds));
        fixture.post_source.like(post.id, likes);
    }

    let post_source = CountingPostSource {
        inner: fixture.post_source.clone(),
        single_lookups: Arc::new(AtomicUsize::new(0)),
        batch_lookups: Arc::new(AtomicUsize::new(0)),
    };
    let feed_service = FeedService::builder()
        .store(fixture.store.clone())
        .directory(fixture.directory.clone())
        .post_source(post_source.clone())
        .build();

    let feed = feed_service
        .get_feed(feed_of(viewer.id, FeedOrder::ByLikes))
        .await
        .unwrap();
    assert_eq!(feed.items.len(), 20);
    assert_eq!(post_source.batch_lookups.load(Ordering::SeqCst), 1);
    assert_eq!(post_source.single_lookups.load(Ordering::SeqCst), 0);
}
