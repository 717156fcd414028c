use crate::{
    schema::relationships,
    types::{NotificationPreference, RelationshipState},
};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge from `follower_id` to `following_id`
#[derive(
    Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Identifiable, Selectable, Queryable,
)]
#[diesel(table_name = relationships)]
pub struct Relationship {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub state: RelationshipState,
    pub muted: bool,
    pub close_friend: bool,
    pub notification_preference: NotificationPreference,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Relationship {
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.state == RelationshipState::Blocked
    }

    /// Whether the edge carries follow semantics
    ///
    /// Block-only edges don't count as following
    #[must_use]
    pub fn is_following(&self) -> bool {
        !self.is_blocked()
    }

    /// Flip between blocked and accepted
    ///
    /// Pending follows become blocked
    pub fn toggle_block(&mut self) {
        self.state = if self.is_blocked() {
            RelationshipState::Accepted
        } else {
            RelationshipState::Blocked
        };
    }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = relationships)]
pub struct NewRelationship {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub state: RelationshipState,
    pub muted: bool,
    pub close_friend: bool,
    pub notification_preference: NotificationPreference,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewRelationship {
    fn with_state(follower_id: Uuid, following_id: Uuid, state: RelationshipState) -> Self {
        let now = Timestamp::now_utc();

        Self {
            id: Uuid::now_v7(),
            follower_id,
            following_id,
            state,
            muted: false,
            close_friend: false,
            notification_preference: NotificationPreference::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Accepted follow with every flag unset
    #[must_use]
    pub fn follow(follower_id: Uuid, following_id: Uuid) -> Self {
        Self::with_state(follower_id, following_id, RelationshipState::Accepted)
    }

    /// Block-only edge
    #[must_use]
    pub fn block(follower_id: Uuid, following_id: Uuid) -> Self {
        Self::with_state(follower_id, following_id, RelationshipState::Blocked)
    }
}

impl From<NewRelationship> for Relationship {
    fn from(value: NewRelationship) -> Self {
        Self {
            id: value.id,
            follower_id: value.follower_id,
            following_id: value.following_id,
            state: value.state,
            muted: value.muted,
            close_friend: value.close_friend,
            notification_preference: value.notification_preference,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Mutable columns of a relationship
#[derive(AsChangeset)]
#[diesel(table_name = relationships)]
pub struct RelationshipChangeset<'a> {
    pub state: RelationshipState,
    pub muted: bool,
    pub close_friend: bool,
    pub notification_preference: &'a NotificationPreference,
    pub updated_at: Timestamp,
}

impl<'a> From<&'a Relationship> for RelationshipChangeset<'a> {
    fn from(value: &'a Relationship) -> Self {
        Self {
            state: value.state,
            muted: value.muted,
            close_friend: value.close_friend,
            notification_preference: &value.notification_preference,
            updated_at: value.updated_at,
        }
    }
}
