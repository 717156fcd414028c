use corvid_core::consts::{NOTIFY_ALL, NOTIFY_NONE};
use diesel::{
    deserialize::{self, FromSql},
    pg::{Pg, PgValue},
    serialize::{self, Output, ToSql},
    sql_types::Text,
    AsExpression, FromSqlRow,
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Which notifications the follower wants to receive from the account they follow
///
/// Stored as free-form text. `ALL` and `NONE` are understood by the engine, every other value is
/// passed through for the notification component to interpret
#[derive(
    AsExpression, Clone, Debug, Default, Deserialize, Eq, FromSqlRow, Hash, PartialEq, Serialize,
)]
#[diesel(sql_type = Text)]
#[serde(from = "SmolStr", into = "SmolStr")]
pub enum NotificationPreference {
    #[default]
    All,
    None,
    Custom(SmolStr),
}

impl NotificationPreference {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => NOTIFY_ALL,
            Self::None => NOTIFY_NONE,
            Self::Custom(value) => value.as_str(),
        }
    }
}

impl From<SmolStr> for NotificationPreference {
    fn from(value: SmolStr) -> Self {
        if value.eq_ignore_ascii_case(NOTIFY_ALL) {
            Self::All
        } else if value.eq_ignore_ascii_case(NOTIFY_NONE) {
            Self::None
        } else {
            Self::Custom(value)
        }
    }
}

impl From<&str> for NotificationPreference {
    fn from(value: &str) -> Self {
        Self::from(SmolStr::from(value))
    }
}

impl From<NotificationPreference> for SmolStr {
    fn from(value: NotificationPreference) -> Self {
        match value {
            NotificationPreference::Custom(value) => value,
            other => SmolStr::new(other.as_str()),
        }
    }
}

impl FromSql<Text, Pg> for NotificationPreference {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        Ok(Self::from(value.as_str()))
    }
}

impl ToSql<Text, Pg> for NotificationPreference {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <str as ToSql<Text, Pg>>::to_sql(self.as_str(), out)
    }
}
