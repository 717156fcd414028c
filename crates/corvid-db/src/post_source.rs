use crate::{
    model::post::Post as DbPost,
    schema::{posts, posts_likes},
    PgPool,
};
use corvid_core::traits::{Post, PostSource};
use corvid_error::{Error, Result};
use diesel::{dsl::count_star, ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use std::collections::HashMap;
use uuid::Uuid;

/// Read-only view over the `posts` and `posts_likes` tables
#[derive(Clone)]
pub struct PgPostSource {
    db_pool: PgPool,
}

impl PgPostSource {
    #[must_use]
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

impl PostSource for PgPostSource {
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        let posts: Vec<DbPost> = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                posts::table
                    .filter(posts::account_id.eq(author_id))
                    .order((posts::created_at.desc(), posts::id.desc()))
                    .select(DbPost::as_select())
                    .load(&mut *db_conn)
                    .await
            })
            .await?;

        Ok(posts.into_iter().map(Post::from).collect())
    }

    async fn like_count_of(&self, post_id: Uuid) -> Result<u64> {
        let count: i64 = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                posts_likes::table
                    .filter(posts_likes::post_id.eq(post_id))
                    .count()
                    .get_result(&mut *db_conn)
                    .await
            })
            .await?;

        u64::try_from(count).map_err(Error::from)
    }

    async fn like_counts_of(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let post_ids = post_ids.to_vec();
        let counts: Vec<(Uuid, i64)> = self
            .db_pool
            .with_connection(|mut db_conn| async move {
                posts_likes::table
                    .filter(posts_likes::post_id.eq_any(post_ids))
                    .group_by(posts_likes::post_id)
                    .select((posts_likes::post_id, count_star()))
                    .load(&mut *db_conn)
                    .await
            })
            .await?;

        counts
            .into_iter()
            .map(|(post_id, count)| Ok::<_, Error>((post_id, u64::try_from(count)?)))
            .collect()
    }
}
