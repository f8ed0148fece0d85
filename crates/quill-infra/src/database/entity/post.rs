//! Post entity for SeaORM.
//!
//! Posts keep their author id after the author is deleted, so there is no
//! foreign key to `users`.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{MediaRef, Post};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub category: String,
    pub cover_local: Option<String>,
    pub cover_url: Option<String>,
    pub cover_public_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_like::Entity")]
    PostLike,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostLike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post, without likes or comments.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            body: model.body,
            category: model.category.parse().unwrap_or_default(),
            cover: MediaRef {
                local_file: model.cover_local,
                url: model.cover_url,
                public_id: model.cover_public_id,
            },
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel. Engagement rows are not part of it.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            body: Set(post.body),
            category: Set(post.category.as_str().to_string()),
            cover_local: Set(post.cover.local_file),
            cover_url: Set(post.cover.url),
            cover_public_id: Set(post.cover.public_id),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
