use super::RelationshipStore;
use crate::{
    model::relationship::{NewRelationship, Relationship, RelationshipChangeset},
    schema::relationships,
    types::RelationshipState,
    Pagination, PgPool,
};
use corvid_error::{corvid_error, Error, ErrorType, Result};
use diesel::{
    result::{DatabaseErrorKind, Error as DieselError},
    BoolExpressionMethods, ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper,
};
use diesel_async::{scoped_futures::ScopedFutureExt, RunQueryDsl};
use iso8601_timestamp::Timestamp;
use uuid::Uuid;

/// Relationship storage backed by the `relationships` table
///
/// Uniqueness and the self-edge rule are enforced by table constraints, so concurrent writers in
/// other processes are covered too
#[derive(Clone)]
pub struct Postgres {
    db_pool: PgPool,
}

impl Postgres {
    #[must_use]
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

fn map_insert_error(error: DieselError) -> Error {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(constraint = ?info.constraint_name(), "relationship insert hit unique constraint");
            corvid_error!(type = ErrorType::Conflict, "relationship already exists")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, ..) => corvid_error!(
            type = ErrorType::InvalidOperation(None),
            "relationship would point at its own follower"
        ),
        other => other.into(),
    }
}

/// Offsets past `i64::MAX` can't match any row anyway
fn to_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RelationshipStore for Postgres {
    async fn find(&self, follower_id: Uuid, following_id: Uuid) -> Result<Option<Relationship>> {
        self.db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(
                        relationships::follower_id
                            .eq(follower_id)
                            .and(relationships::following_id.eq(following_id)),
                    )
                    .select(Relationship::as_select())
                    .get_result(&mut *db_conn)
                    .await
                    .optional()
            })
            .await
    }

    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        self.db_pool
            .with_connection(|mut db_conn| async move {
                diesel::select(diesel::dsl::exists(
                    relationships::table.filter(
                        relationships::follower_id
                            .eq(follower_id)
                            .and(relationships::following_id.eq(following_id)),
                    ),
                ))
                .get_result::<bool>(&mut *db_conn)
                .await
            })
            .await
    }

    async fn save(&self, relationship: NewRelationship) -> Result<Relationship> {
        self.db_pool
            .with_connection(|mut db_conn| async move {
                diesel::insert_into(relationships::table)
                    .values(&relationship)
                    .returning(Relationship::as_returning())
                    .get_result(&mut *db_conn)
                    .await
                    .map_err(map_insert_error)
            })
            .await
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
        self.db_pool
            .with_transaction(move |tx| {
                async move {
                    let relationship = relationships::table
                        .filter(
                            relationships::follower_id
                                .eq(follower_id)
                                .and(relationships::following_id.eq(following_id)),
                        )
                        .select(Relationship::as_select())
                        .for_update()
                        .get_result(&mut *tx)
                        .await
                        .optional()?;

                    let Some(mut relationship) = relationship else {
                        return Ok(None);
                    };

                    func(&mut relationship);
                    relationship.updated_at = Timestamp::now_utc();

                    let updated = diesel::update(relationships::table.find(relationship.id))
                        .set(RelationshipChangeset::from(&relationship))
                        .returning(Relationship::as_returning())
                        .get_result(&mut *tx)
                        .await?;

                    Ok::<_, Error>(Some(updated))
                }
                .scope_boxed()
            })
            .await
    }

    async fn delete(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool> {
        let deleted = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                diesel::delete(
                    relationships::table.filter(
                        relationships::follower_id
                            .eq(follower_id)
                            .and(relationships::following_id.eq(following_id)),
                    ),
                )
                .execute(&mut *db_conn)
                .await
            })
            .await?;

        Ok(deleted > 0)
    }

    async fn delete_unless_blocked(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<Option<Relationship>> {
        self.db_pool
            .with_connection(|mut db_conn| async move {
                diesel::delete(
                    relationships::table
                        .filter(
                            relationships::follower_id
                                .eq(follower_id)
                                .and(relationships::following_id.eq(following_id)),
                        )
                        .filter(relationships::state.ne(RelationshipState::Blocked)),
                )
                .returning(Relationship::as_returning())
                .get_result(&mut *db_conn)
                .await
                .optional()
            })
            .await
    }

    async fn count_by_follower(&self, account_id: Uuid) -> Result<u64> {
        let count: i64 = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(relationships::follower_id.eq(account_id))
                    .filter(relationships::state.ne(RelationshipState::Blocked))
                    .count()
                    .get_result(&mut *db_conn)
                    .await
            })
            .await?;

        u64::try_from(count).map_err(Error::from)
    }

    async fn count_by_following(&self, account_id: Uuid) -> Result<u64> {
        let count: i64 = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(relationships::following_id.eq(account_id))
                    .filter(relationships::state.ne(RelationshipState::Blocked))
                    .count()
                    .get_result(&mut *db_conn)
                    .await
            })
            .await?;

        u64::try_from(count).map_err(Error::from)
    }

    async fn list_by_follower(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Relationship>> {
        let limit = to_limit(pagination.size);
        let offset = to_limit(pagination.offset());

        self.db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(relationships::follower_id.eq(account_id))
                    .filter(relationships::state.ne(RelationshipState::Blocked))
                    .order((relationships::created_at.desc(), relationships::id.desc()))
                    .limit(limit)
                    .offset(offset)
                    .select(Relationship::as_select())
                    .load(&mut *db_conn)
                    .await
            })
            .await
    }

    async fn list_by_following(
        &self,
        account_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<Relationship>> {
        let limit = to_limit(pagination.size);
        let offset = to_limit(pagination.offset());

        self.db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(relationships::following_id.eq(account_id))
                    .filter(relationships::state.ne(RelationshipState::Blocked))
                    .order((relationships::created_at.desc(), relationships::id.desc()))
                    .limit(limit)
                    .offset(offset)
                    .select(Relationship::as_select())
                    .load(&mut *db_conn)
                    .await
            })
            .await
    }

    async fn outgoing(&self, account_id: Uuid) -> Result<Vec<Relationship>> {
        self.db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(relationships::follower_id.eq(account_id))
                    .order((relationships::created_at.desc(), relationships::id.desc()))
                    .select(Relationship::as_select())
                    .load(&mut *db_conn)
                    .await
            })
            .await
    }

    async fn incoming(&self, account_id: Uuid) -> Result<Vec<Relationship>> {
        self.db_pool
            .with_connection(|mut db_conn| async move {
                relationships::table
                    .filter(relationships::following_id.eq(account_id))
                    .order((relationships::created_at.desc(), relationships::id.desc()))
                    .select(Relationship::as_select())
                    .load(&mut *db_conn)
                    .await
            })
            .await
    }
}
