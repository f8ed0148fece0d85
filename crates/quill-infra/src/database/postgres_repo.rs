//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbConn, EntityTrait, QueryFilter, QueryOrder,
    QueryTrait, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Comment, LikeToggle, Post, PostFilter, User, mask_email};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as PostLikeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
///
/// Comments and likes live in their own tables and are loaded alongside the
/// post rows in two batch queries.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Attach likes and comments to post rows, preserving row order.
async fn hydrate<C>(db: &C, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let comments = CommentEntity::find()
        .filter(comment::Column::PostId.is_in(ids.clone()))
        .order_by_asc(comment::Column::CreatedAt)
        .all(db)
        .await
        .map_err(query_error)?;

    let likes = PostLikeEntity::find()
        .filter(post_like::Column::PostId.is_in(ids))
        .order_by_asc(post_like::Column::CreatedAt)
        .all(db)
        .await
        .map_err(query_error)?;

    let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for row in comments {
        comments_by_post
            .entry(row.post_id)
            .or_default()
            .push(row.into());
    }

    let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in likes {
        likes_by_post.entry(row.post_id).or_default().push(row.user_id);
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut post: Post = model.into();
            post.comments = comments_by_post.remove(&id).unwrap_or_default();
            post.likes = likes_by_post.remove(&id).unwrap_or_default();
            post
        })
        .collect())
}

/// Escape LIKE wildcards so user input only matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn ensure_post_exists<C>(db: &C, post_id: Uuid) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    PostEntity::find_by_id(post_id)
        .one(db)
        .await
        .map_err(query_error)?
        .map(|_| ())
        .ok_or(RepoError::NotFound)
}

async fn bump_updated_at<C>(db: &C, post_id: Uuid) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    let now: DateTimeWithTimeZone = Utc::now().into();
    PostEntity::update_many()
        .col_expr(post::Column::UpdatedAt, Expr::value(now))
        .filter(post::Column::Id.eq(post_id))
        .exec(db)
        .await
        .map_err(query_error)?;
    Ok(())
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        let Some(model) = model else {
            return Ok(None);
        };
        Ok(hydrate(&self.db, vec![model]).await?.into_iter().next())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = entity.clone().into();
        PostEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Body,
                        post::Column::Category,
                        post::Column::CoverLocal,
                        post::Column::CoverUrl,
                        post::Column::CoverPublicId,
                        post::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        PostLikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_error)?;
        CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_error)?;
        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_error)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .apply_if(filter.category, |query, category| {
                query.filter(post::Column::Category.eq(category.as_str()))
            })
            .apply_if(filter.author, |query, author| {
                query.filter(post::Column::AuthorId.eq(author))
            })
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        hydrate(&self.db, models).await
    }

    async fn search(&self, needle: &str) -> Result<Vec<Post>, RepoError> {
        let pattern = like_pattern(needle);
        let lower = |col: post::Column| Expr::expr(Func::lower(Expr::col(col)));

        let models = PostEntity::find()
            .filter(
                Condition::any()
                    .add(lower(post::Column::Title).like(LikeExpr::new(pattern.clone()).escape('\\')))
                    .add(lower(post::Column::Body).like(LikeExpr::new(pattern).escape('\\'))),
            )
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        hydrate(&self.db, models).await
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;
        ensure_post_exists(&txn, post_id).await?;

        // Insert wins when absent; a conflict means the like exists and is removed
        let inserted = PostLikeEntity::insert(post_like::ActiveModel {
            post_id: sea_orm::Set(post_id),
            user_id: sea_orm::Set(user_id),
            created_at: sea_orm::Set(Utc::now().into()),
        })
        .on_conflict(
            OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(query_error)?;

        let outcome = if inserted > 0 {
            LikeToggle::Liked
        } else {
            PostLikeEntity::delete_by_id((post_id, user_id))
                .exec(&txn)
                .await
                .map_err(query_error)?;
            LikeToggle::Unliked
        };

        bump_updated_at(&txn, post_id).await?;
        txn.commit().await.map_err(query_error)?;

        tracing::debug!(%post_id, %user_id, ?outcome, "Like toggled");
        Ok(outcome)
    }

    async fn push_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;
        ensure_post_exists(&txn, post_id).await?;

        CommentEntity::insert(comment::ActiveModel::for_post(post_id, comment))
            .exec_without_returning(&txn)
            .await
            .map_err(write_error)?;

        bump_updated_at(&txn, post_id).await?;
        txn.commit().await.map_err(query_error)
    }
}
