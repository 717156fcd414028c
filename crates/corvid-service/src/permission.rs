//! Permissions derived from a relationship edge
//!
//! These are computed on every read from the stored state and flags and never persisted.
//! A missing edge grants nothing.

use corvid_db::{
    model::relationship::Relationship,
    types::{NotificationPreference, RelationshipState},
};
use serde::Serialize;

/// The edge is an accepted follow
#[must_use]
pub fn is_active(relationship: Option<&Relationship>) -> bool {
    relationship.is_some_and(|relationship| relationship.state == RelationshipState::Accepted)
}

#[must_use]
pub fn can_interact(relationship: Option<&Relationship>) -> bool {
    is_active(relationship) && relationship.is_some_and(|relationship| !relationship.muted)
}

#[must_use]
pub fn can_receive_notifications(relationship: Option<&Relationship>) -> bool {
    can_interact(relationship)
        && relationship.is_some_and(|relationship| {
            relationship.notification_preference != NotificationPreference::None
        })
}

/// Snapshot of every derived permission of one edge
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub is_active: bool,
    pub can_interact: bool,
    pub can_receive_notifications: bool,
}

impl Permissions {
    #[must_use]
    pub fn evaluate(relationship: Option<&Relationship>) -> Self {
        Self {
            is_active: is_active(relationship),
            can_interact: can_interact(relationship),
            can_receive_notifications: can_receive_notifications(relationship),
        }
    }
}
