use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, LikeToggle, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user holding either the username or the email.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError>;

    /// Batch lookup used to resolve author references. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
///
/// `save` persists the content fields (title, body, category, cover). The
/// liker set and comments only change through `toggle_like` and `push_comment`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching the filter, newest first.
    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Case-insensitive substring match on title or body.
    async fn search(&self, needle: &str) -> Result<Vec<Post>, RepoError>;

    /// Flip the user's membership in the liker set as a single store operation.
    /// Returns `RepoError::NotFound` when the post does not exist.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle, RepoError>;

    /// Append a comment. Returns `RepoError::NotFound` when the post does not exist.
    async fn push_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError>;
}
