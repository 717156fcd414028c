use crate::schema::{posts, posts_likes};
use corvid_core::traits::Post as SourcePost;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use iso8601_timestamp::Timestamp;
use uuid::Uuid;

#[derive(Clone, Debug, Identifiable, Selectable, Queryable)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: Uuid,
    pub account_id: Uuid,
    pub caption: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Clone, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    pub id: Uuid,
    pub account_id: Uuid,
    pub caption: Option<&'a str>,
    pub created_at: Timestamp,
}

#[derive(Clone, Insertable)]
#[diesel(table_name = posts_likes)]
pub struct NewLike {
    pub post_id: Uuid,
    pub account_id: Uuid,
}

impl From<Post> for SourcePost {
    fn from(value: Post) -> Self {
        Self {
            id: value.id,
            author_id: value.account_id,
            caption: value.caption,
            created_at: value.created_at,
        }
    }
}
