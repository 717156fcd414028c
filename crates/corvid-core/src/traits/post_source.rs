use corvid_error::Result;
use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, future::Future};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub caption: Option<String>,
    pub created_at: Timestamp,
}

/// Read access to posts and their like counters
///
/// Posts are never mutated through this trait
pub trait PostSource: Send + Sync + 'static {
    /// Posts written by the author, newest first
    fn posts_by_author(&self, author_id: Uuid) -> impl Future<Output = Result<Vec<Post>>> + Send;

    fn like_count_of(&self, post_id: Uuid) -> impl Future<Output = Result<u64>> + Send;

    /// Like counters of many posts in one round trip
    ///
    /// Posts without likes may be missing from the map
    fn like_counts_of(
        &self,
        post_ids: &[Uuid],
    ) -> impl Future<Output = Result<HashMap<Uuid, u64>>> + Send;
}
