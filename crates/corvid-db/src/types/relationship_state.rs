use crate::error::EnumConversionError;
use diesel::{
    backend::Backend,
    deserialize::{self, FromSql},
    pg::Pg,
    serialize::{self, Output, ToSql},
    sql_types::Integer,
    AsExpression, FromSqlRow,
};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

#[derive(
    AsExpression,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    FromPrimitive,
    FromSqlRow,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[diesel(sql_type = diesel::sql_types::Integer)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// State of a directed relationship
///
/// This is the single source of truth for blocking. Whether an edge is blocked is derived from it
pub enum RelationshipState {
    /// Follow awaiting approval
    Pending = 0,
    /// Regular follow
    ///
    /// This is the default
    #[default]
    Accepted = 1,
    /// The follower side blocked the following side
    Blocked = 2,
}

impl<Db> FromSql<Integer, Db> for RelationshipState
where
    i32: FromSql<Integer, Db>,
    Db: Backend,
{
    fn from_sql(bytes: <Db as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = i32::from_sql(bytes)?;
        Ok(Self::from_i32(value).ok_or(EnumConversionError(value))?)
    }
}

impl ToSql<Integer, Pg> for RelationshipState {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <i32 as ToSql<Integer, Pg>>::to_sql(&(*self as i32), &mut out.reborrow())
    }
}
