mod notification_preference;
mod relationship_state;

pub use self::notification_preference::NotificationPreference;
pub use self::relationship_state::RelationshipState;
