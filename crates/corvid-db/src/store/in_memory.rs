use super::RelationshipStore;
use crate::{
    model::relationship::{NewRelationship, Relationship},
    Pagination,
};
use corvid_error::{bail, ErrorType, Result};
use dashmap::{mapref::entry::Entry, DashMap};
use iso8601_timestamp::Timestamp;
use std::cmp::Reverse;
use triomphe::Arc;
use uuid::Uuid;

/// Edges keyed by `(follower_id, following_id)`
///
/// The key is the pair, so the map itself enforces uniqueness. Each key is guarded by its shard lock
/// which makes `save` and `modify` atomic per pair while different pairs proceed in parallel
#[derive(Clone, Default)]
pub struct InMemory {
    inner: Arc<DashMap<(Uuid, Uuid), Relationship>>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<P>(&self, predicate: P) -> Vec<Relationship>
    where
        P: Fn(&Relationship) -> bool,
    {
        let mut relationships: Vec<Relationship> = self
            .inner
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        relationships.sort_by_key(|relationship| {
            Reverse((relationship.created_at, relationship.id))
        });

        relationships
    }

    fn count<P>(&self, predicate: P) -> u64
    where
        P: Fn(&Relationship) -> bool,
    {
        self.inner
            .iter()
            .filter(|entry| predicate(entry.value()))
            .count() as u64
    }
}

impl RelationshipStore for InMemory {
    async fn find(&self, follower_id: Uuid, following_id: Uuid) -> Result<Option<Relationship>> {
        Ok(self
            .inner
            .get(&(follower_id, following_id))
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        Ok(self.inner.contains_key(&(follower_id, following_id)))
    }

    async fn save(&self, relationship: NewRelationship) -> Result<Relationship> {
        if relationship.follower_id == relationship.following_id {
            bail!(
                type = ErrorType::InvalidOperation(None),
                "relationship would point at its own follower"
            );
        }

        match self
            .inner
            .entry((relationship.follower_id, relationship.following_id))
        {
            Entry::Occupied(..) => {
                bail!(type = ErrorType::Conflict, "relationship already exists")
            }
            Entry::Vacant(entry) => Ok(entry.insert(relationship.into()).value().clone()),
        }
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
        let Some(mut entry) = self.inner.get_mut(&(follower_id, following_id)) else {
            return Ok(None);
        };

        let relationship = entry.value_mut();
        func(relationship);
        relationship.updated_at = Timestamp::now_utc();

        Ok(Some(relationship.clone()))
    }

    async fn delete(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        Ok(self.inner.remove(&(follower_id, following_id)).is_some())
    }

    async fn delete_unless_blocked(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<Option<Relationship>> {
        Ok(self
            .inner
            .remove_if(&(follower_id, following_id), |_, relationship| {
                !relationship.is_blocked()
            })
            .map(|(_, relationship)| relationship))
    }

    async fn count_by_follower(&self, account_id: Uuid) -> Result<u64> {
        Ok(self.count(|relationship| {
            relationship.follower_id == account_id && relationship.is_following()
        }))
    }

    async fn count_by_following(&self, account_id: Uuid) -> Result<u64> {
        Ok(self.count(|relationship| {
            relationship.following_id == account_id && relationship.is_following()
        }))
    }

    async fn list_by_follower(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Relationship>> {
        let relationships = self.collect(|relationship| {
            relationship.follower_id == account_id && relationship.is_following()
        });

        Ok(pagination.slice(relationships))
    }

    async fn list_by_following(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Relationship>> {
        let relationships = self.collect(|relationship| {
            relationship.following_id == account_id && relationship.is_following()
        });

        Ok(pagination.slice(relationships))
    }

    async fn outgoing(&self, account_id: Uuid) -> Result<Vec<Relationship>> {
        Ok(self.collect(|relationship| relationship.follower_id == account_id))
    }

    async fn incoming(&self, account_id: Uuid) -> Result<Vec<Relationship>> {
        Ok(self.collect(|relationship| relationship.following_id == account_id))
    }
}
