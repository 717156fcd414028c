#![allow(dead_code)]

use corvid_config::feed::BlockVisibility;
use corvid_core::traits::Account;
use corvid_db::{
    model::relationship::{NewRelationship, Relationship},
    InMemoryRelationshipStore, Pagination, RelationshipStore,
};
use corvid_error::{ErrorType, Result};
use corvid_service::{
    feed::FeedService, relationship::RelationshipService, stats::StatsService,
};
use corvid_test::{InMemoryDirectory, InMemoryPostSource};
use std::{future::Future, sync::Arc};
use uuid::Uuid;

pub struct Fixture {
    pub directory: InMemoryDirectory,
    pub store: InMemoryRelationshipStore,
    pub post_source: InMemoryPostSource,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            directory: InMemoryDirectory::new(),
            store: InMemoryRelationshipStore::new(),
            post_source: InMemoryPostSource::new(),
        }
    }

    pub fn accounts<const N: usize>(&self, handles: [&str; N]) -> [Account; N] {
        handles.map(|handle| self.directory.register(handle))
    }

    pub fn relationships(
        &self,
    ) -> RelationshipService<InMemoryRelationshipStore, InMemoryDirectory> {
        RelationshipService::builder()
            .store(self.store.clone())
            .directory(self.directory.clone())
            .build()
    }

    pub fn stats(&self) -> StatsService<InMemoryRelationshipStore, InMemoryDirectory> {
        StatsService::builder()
            .store(self.store.clone())
            .directory(self.directory.clone())
            .build()
    }

    pub fn feed(
        &self,
        block_visibility: BlockVisibility,
    ) -> FeedService<InMemoryRelationshipStore, InMemoryDirectory, InMemoryPostSource> {
        FeedService::builder()
            .store(self.store.clone())
            .directory(self.directory.clone())
            .post_source(self.post_source.clone())
            .block_visibility(block_visibility)
            .build()
    }
}

pub fn hooked_relationships<H>(
    fixture: &Fixture,
    hook: Arc<H>,
) -> RelationshipService<HookedStore<H>, InMemoryDirectory>
where
    H: StoreHook,
{
    RelationshipService::builder()
        .store(HookedStore::new(fixture.store.clone(), hook))
        .directory(fixture.directory.clone())
        .build()
}

pub fn is_invalid_operation(ty: &ErrorType) -> bool {
    matches!(ty, ErrorType::InvalidOperation(..))
}

/// Interception points of a [`HookedStore`], every hook runs before the call reaches the store
pub trait StoreHook: Send + Sync + 'static {
    fn before_find(&self) -> impl Future<Output = ()> + Send {
        async {}
    }

    fn before_save(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    fn before_delete(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// In-memory store that lets a test pause or fail single calls to stage interleavings
pub struct HookedStore<H> {
    pub inner: InMemoryRelationshipStore,
    pub hook: Arc<H>,
}

impl<H> HookedStore<H> {
    pub fn new(inner: InMemoryRelationshipStore, hook: Arc<H>) -> Self {
        Self { inner, hook }
    }
}

impl<H> Clone for HookedStore<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<H> RelationshipStore for HookedStore<H>
where
    H: StoreHook,
{
    async fn find(&self, follower_id: Uuid, following_id: Uuid) -> Result<Option<Relationship>> {
        self.hook.before_find().await;
        self.inner.find(follower_id, following_id).await
    }

    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        self.inner.exists(follower_id, following_id).await
    }

    async fn save(&self, relationship: NewRelationship) -> Result<Relationship> {
        self.hook.before_save().await?;
        self.inner.save(relationship).await
    }

    async fn modify<F>(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
        func: F,
    ) -> Result<Option<Relationship>>
    where
        F: FnOnce(&mut Relationship) + Send + 'static,
    {
        self.inner.modify(follower_id, following_id, func).await
    }

    async fn delete(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        self.hook.before_delete().await;
        self.inner.delete(follower_id, following_id).await
    }

    async fn delete_unless_blocked(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<Option<Relationship>> {
        self.hook.before_delete().await;
        self.inner.delete_unless_blocked(follower_id, following_id).await
    }

    async fn count_by_follower(&self, account_id: Uuid) -> Result<u64> {
        self.inner.count_by_follower(account_id).await
    }

    async fn count_by_following(&self, account_id: Uuid) -> Result<u64> {
        self.inner.count_by_following(account_id).await
    }

    async fn list_by_follower(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Relationship>> {
        self.inner.list_by_follower(account_id, pagination).await
    }

    async fn list_by_following(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Relationship>> {
        self.inner.list_by_following(account_id, pagination).await
    }

    async fn outgoing(&self, account_id: Uuid) -> Result<Vec<Relationship>> {
        self.inner.outgoing(account_id).await
    }

    async fn incoming(&self, account_id: Uuid) -> Result<Vec<Relationship>> {
        self.inner.incoming(account_id).await
    }
}
