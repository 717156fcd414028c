use corvid_core::traits::{Post, PostSource};
use corvid_error::Result;
use dashmap::DashMap;
use iso8601_timestamp::Timestamp;
use std::{cmp::Reverse, collections::HashMap};
use triomphe::Arc;
use uuid::Uuid;

/// Post source living entirely in memory
#[derive(Clone, Default)]
pub struct InMemoryPostSource {
    posts: Arc<DashMap<Uuid, Post>>,
    likes: Arc<DashMap<Uuid, u64>>,
}

impl InMemoryPostSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, author_id: Uuid, created_at: Timestamp) -> Post {
        let post = Post {
            id: Uuid::now_v7(),
            author_id,
            caption: None,
            created_at,
        };
        self.posts.insert(post.id, post.clone());
        post
    }

    pub fn like(&self, post_id: Uuid, times: u64) {
        *self.likes.entry(post_id).or_default() += times;
    }
}

impl PostSource for InMemoryPostSource {
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| entry.author_id == author_id)
            .map(|entry| entry.value().clone())
            .collect();
        posts.sort_by_key(|post| Reverse((post.created_at, post.id)));

        Ok(posts)
    }

    async fn like_count_of(&self, post_id: Uuid) -> Result<u64> {
        Ok(self.likes.get(&post_id).map_or(0, |entry| *entry.value()))
    }

    async fn like_counts_of(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        Ok(post_ids
            .iter()
            .filter_map(|post_id| {
                self.likes
                    .get(post_id)
                    .map(|entry| (*post_id, *entry.value()))
            })
            .collect())
    }
}
