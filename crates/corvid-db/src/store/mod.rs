use crate::{
    model::relationship::{NewRelationship, Relationship},
    Pagination,
};
use corvid_error::Result;
use std::future::Future;
use uuid::Uuid;

pub use self::in_memory::InMemory as InMemoryRelationshipStore;
pub use self::postgres::Postgres as PgRelationshipStore;

mod in_memory;
mod postgres;

/// Durable storage of relationship edges
///
/// Implementations guarantee that at most one edge exists per ordered pair and that no edge points
/// back at its own follower, no matter how many callers race on the same pair
pub trait RelationshipStore: Send + Sync + 'static {
    /// Look up the edge `follower_id -> following_id`
    fn find(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> impl Future<Output = Result<Option<Relationship>>> + Send;

    /// Whether any edge exists between the two accounts, blocked or not
    fn exists(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Persist a new edge
    ///
    /// # Errors
    ///
    /// - `Conflict` if the pair already has an edge
    /// - `InvalidOperation` if the edge would point at its own follower
    fn save(
        &self,
        relationship: NewRelationship,
    ) -> impl Future<Output = Result<Relationship>> + Send;

    /// Atomically mutate an existing edge
    ///
    /// Returns `None` without calling `func` if the pair has no edge
    fn modify<F>(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
        func: F,
    ) -> impl Future<Output = Result<Option<Relationship>>> + Send
    where
        F: FnOnce(&mut Relationship) + Send + 'static;

    /// Remove the edge, returns whether there was one
    fn delete(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Remove the edge unless it is a block, atomically with the state check
    ///
    /// Returns the removed edge, `None` if there was no edge or it is blocked
    fn delete_unless_blocked(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> impl Future<Output = Result<Option<Relationship>>> + Send;

    /// Number of accounts the account follows (block-only edges excluded)
    fn count_by_follower(&self, account_id: Uuid) -> impl Future<Output = Result<u64>> + Send;

    /// Number of accounts following the account (block-only edges excluded)
    fn count_by_following(&self, account_id: Uuid) -> impl Future<Output = Result<u64>> + Send;

    /// Follow edges going out of the account, newest first
    fn list_by_follower(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = Result<Vec<Relationship>>> + Send;

    /// Follow edges pointing at the account, newest first
    fn list_by_following(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = Result<Vec<Relationship>>> + Send;

    /// Every edge going out of the account, including blocks
    fn outgoing(&self, account_id: Uuid) -> impl Future<Output = Result<Vec<Relationship>>> + Send;

    /// Every edge pointing at the account, including blocks
    fn incoming(&self, account_id: Uuid) -> impl Future<Output = Result<Vec<Relationship>>> + Send;
}
