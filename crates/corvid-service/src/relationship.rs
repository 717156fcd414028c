use crate::{
    ensure_actor, resolve_account,
    stats::{collect_stats, RelationshipStats},
};
use corvid_core::traits::AccountDirectory;
use corvid_db::{
    model::relationship::{NewRelationship, Relationship},
    types::{NotificationPreference, RelationshipState},
    RelationshipStore,
};
use corvid_error::{bail, corvid_error, ErrorType, Result};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Mutations of the relationship graph
///
/// Every toggle is its own inverse: calling it twice with the same arguments leaves the graph as it was
#[derive(Clone, TypedBuilder)]
pub struct RelationshipService<S, D> {
    store: S,
    directory: D,
}

impl<S, D> RelationshipService<S, D>
where
    S: RelationshipStore,
    D: AccountDirectory,
{
    async fn prepare(&self, actor_id: Uuid, target_id: Uuid) -> Result<()> {
        ensure_actor(actor_id)?;

        if actor_id == target_id {
            bail!(
                type = ErrorType::InvalidOperation(None),
                "accounts cannot target themselves"
            );
        }

        tokio::try_join!(
            resolve_account(&self.directory, actor_id),
            resolve_account(&self.directory, target_id),
        )?;

        Ok(())
    }

    /// Apply `func` to the existing edge, failing with `message` if there is none
    async fn modify_existing<F>(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        message: &'static str,
        func: F,
    ) -> Result<Relationship>
    where
        F: FnOnce(&mut Relationship) + Send + 'static,
    {
        self.store
            .modify(actor_id, target_id, func)
            .await?
            .ok_or_else(|| {
                corvid_error!(
                    type = ErrorType::InvalidOperation(Some(message.into())),
                    message
                )
            })
    }

    async fn ensure_not_blocked(&self, actor_id: Uuid, target_id: Uuid) -> Result<()> {
        let blocked = self
            .store
            .find(actor_id, target_id)
            .await?
            .is_some_and(|relationship| relationship.is_blocked());

        if blocked {
            bail!(
                type = ErrorType::InvalidOperation(Some("target is blocked".into())),
                "target was blocked concurrently"
            );
        }

        Ok(())
    }

    /// Follow the target, or unfollow if already following
    ///
    /// Returns the target's stats from the actor's point of view
    #[instrument(skip(self))]
    pub async fn toggle_follow(&self, actor_id: Uuid, target_id: Uuid) -> Result<RelationshipStats> {
        self.prepare(actor_id, target_id).await?;

        match self.store.find(actor_id, target_id).await? {
            Some(relationship) if relationship.is_blocked() => {
                bail!(
                    type = ErrorType::InvalidOperation(Some("target is blocked".into())),
                    "blocked accounts have to be unblocked before following"
                );
            }
            Some(_) => {
                if self
                    .store
                    .delete_unless_blocked(actor_id, target_id)
                    .await?
                    .is_some()
                {
                    debug!("unfollowed");
                } else {
                    // The edge changed after the lookup. A block stands, a vanished edge means
                    // a concurrent unfollow already did the work
                    self.ensure_not_blocked(actor_id, target_id).await?;
                    debug!("unfollow raced with a concurrent unfollow");
                }
            }
            None => match self.store.save(NewRelationship::follow(actor_id, target_id)).await {
                Ok(relationship) => debug!(relationship_id = %relationship.id, "followed"),
                Err(err) if err.is_conflict() => {
                    // Someone else created the edge in between. Their follow stands, a block wins
                    self.ensure_not_blocked(actor_id, target_id).await?;
                    debug!("follow raced with a concurrent writer");
                }
                Err(err) => return Err(err),
            },
        }

        collect_stats(&self.store, target_id, Some(actor_id)).await
    }

    /// Block the target, or unblock if already blocking
    ///
    /// An existing edge is flipped in place, otherwise a block-only edge is created
    #[instrument(skip(self))]
    pub async fn toggle_block(&self, actor_id: Uuid, target_id: Uuid) -> Result<()> {
        self.prepare(actor_id, target_id).await?;

        if let Some(relationship) = self
            .store
            .modify(actor_id, target_id, Relationship::toggle_block)
            .await?
        {
            debug!(state = ?relationship.state, "toggled block");
            return Ok(());
        }

        match self.store.save(NewRelationship::block(actor_id, target_id)).await {
            Ok(relationship) => debug!(relationship_id = %relationship.id, "blocked"),
            Err(err) if err.is_conflict() => {
                warn!("block raced with a concurrent writer, forcing blocked state");

                let forced = self
                    .store
                    .modify(actor_id, target_id, |relationship| {
                        relationship.state = RelationshipState::Blocked;
                    })
                    .await?;

                if forced.is_none() {
                    // The concurrent edge was deleted again before it could be blocked.
                    // A second conflict is reported instead of claiming the block was stored
                    let relationship = self
                        .store
                        .save(NewRelationship::block(actor_id, target_id))
                        .await?;
                    debug!(relationship_id = %relationship.id, "blocked on retry");
                }
            }
            Err(err) => return Err(err),
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn toggle_mute(&self, actor_id: Uuid, target_id: Uuid) -> Result<()> {
        self.prepare(actor_id, target_id).await?;

        let relationship = self
            .modify_existing(actor_id, target_id, "must be following to mute", |relationship| {
                relationship.muted = !relationship.muted;
            })
            .await?;
        debug!(muted = relationship.muted, "toggled mute");

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn toggle_close_friend(&self, actor_id: Uuid, target_id: Uuid) -> Result<()> {
        self.prepare(actor_id, target_id).await?;

        let relationship = self
            .modify_existing(
                actor_id,
                target_id,
                "must be following to add as close friend",
                |relationship| relationship.close_friend = !relationship.close_friend,
            )
            .await?;
        debug!(close_friend = relationship.close_friend, "toggled close friend");

        Ok(())
    }

    /// Overwrite the notification preference stored on the edge
    #[instrument(skip(self))]
    pub async fn set_notification_preference(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        preference: NotificationPreference,
    ) -> Result<()> {
        self.prepare(actor_id, target_id).await?;

        let relationship = self
            .modify_existing(
                actor_id,
                target_id,
                "must be following to change notifications",
                move |relationship| relationship.notification_preference = preference,
            )
            .await?;
        debug!(
            preference = relationship.notification_preference.as_str(),
            "updated notification preference"
        );

        Ok(())
    }
}
