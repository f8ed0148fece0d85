//! Post lifecycle and social interactions.

use std::sync::Arc;

use uuid::Uuid;

use super::media::{Attachments, Upload};
use super::{Authors, resolve_authors};
use crate::domain::{Category, Comment, LikeToggle, Post, required};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, UserRepository};

/// Submitted post fields. On create every field is required; on update
/// missing or blank fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
}

/// A post together with everyone it references.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub authors: Authors,
}

/// Posts plus their resolved authors, for list pages.
#[derive(Debug, Clone, Default)]
pub struct PostList {
    pub posts: Vec<Post>,
    pub authors: Authors,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    attachments: Arc<Attachments>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        attachments: Arc<Attachments>,
    ) -> Self {
        Self {
            posts,
            users,
            attachments,
        }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        input: PostInput,
        cover: Option<Upload>,
    ) -> Result<Post, DomainError> {
        let title = required("title", input.title.as_deref().unwrap_or_default())?;
        let body = input.body.unwrap_or_default();
        let category: Category = required("category", input.category.as_deref().unwrap_or_default())?
            .parse()?;

        let mut post = Post::new(author_id, &title, &body, category)?;
        if let Some(upload) = cover {
            post.cover = self.attachments.attach(upload).await?;
        }

        let cover = post.cover.clone();
        match self.posts.save(post).await {
            Ok(saved) => {
                tracing::info!(post_id = %saved.id, author_id = %author_id, "Post created");
                Ok(saved)
            }
            Err(e) => {
                self.attachments.discard(&cover).await;
                Err(e.into())
            }
        }
    }

    /// Fetch a post and resolve its author and commenters.
    pub async fn show(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find(post_id).await?;
        let mut ids = vec![post.author_id];
        ids.extend(post.comments.iter().map(|c| c.author_id));
        let authors = resolve_authors(self.users.as_ref(), &ids).await?;

        Ok(PostDetail { post, authors })
    }

    /// Load a post for editing; only its author may.
    pub async fn editable(&self, post_id: Uuid, caller: Uuid) -> Result<Post, DomainError> {
        let post = self.find(post_id).await?;
        if !post.is_author(caller) {
            tracing::warn!(post_id = %post_id, caller = %caller, "Edit refused: not the author");
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    pub async fn update(
        &self,
        post_id: Uuid,
        caller: Uuid,
        input: PostInput,
        cover: Option<Upload>,
    ) -> Result<Post, DomainError> {
        let mut post = self.editable(post_id, caller).await?;

        if let Some(title) = provided(input.title) {
            post.title = title.trim().to_string();
        }
        if let Some(body) = provided(input.body) {
            post.body = body;
        }
        if let Some(category) = provided(input.category) {
            post.category = category.parse()?;
        }

        if let Some(upload) = cover {
            self.attachments.discard(&post.cover).await;
            post.cover = self.attachments.attach(upload).await?;
        }

        post.touch();
        let saved = self.posts.save(post).await?;
        tracing::info!(post_id = %post_id, "Post updated");
        Ok(saved)
    }

    /// Delete a post. Media cleanup is attempted first; the document goes last.
    pub async fn delete(&self, post_id: Uuid, caller: Uuid) -> Result<(), DomainError> {
        let post = self.editable(post_id, caller).await?;

        self.attachments.discard(&post.cover).await;
        self.posts.delete(post_id).await.map_err(|e| missing_post(e, post_id))?;

        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    pub async fn toggle_like(&self, post_id: Uuid, caller: Uuid) -> Result<LikeToggle, DomainError> {
        let outcome = self
            .posts
            .toggle_like(post_id, caller)
            .await
            .map_err(|e| missing_post(e, post_id))?;

        tracing::debug!(post_id = %post_id, user_id = %caller, ?outcome, "Like toggled");
        Ok(outcome)
    }

    /// Append a comment. Blank bodies are ignored and yield `None`.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        caller: Uuid,
        body: &str,
    ) -> Result<Option<Comment>, DomainError> {
        let comment = match Comment::new(caller, body) {
            Ok(comment) => comment,
            Err(_) => {
                tracing::debug!(post_id = %post_id, "Empty comment ignored");
                return Ok(None);
            }
        };

        self.posts
            .push_comment(post_id, comment.clone())
            .await
            .map_err(|e| missing_post(e, post_id))?;
        Ok(Some(comment))
    }

    /// Substring search over titles and bodies. A blank query finds nothing.
    pub async fn search(&self, query: &str) -> Result<PostList, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(PostList::default());
        }

        let posts = self.posts.search(query).await?;
        let ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        let authors = resolve_authors(self.users.as_ref(), &ids).await?;
        Ok(PostList { posts, authors })
    }

    async fn find(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }
}

fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_post(err: RepoError, post_id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("post", post_id),
        other => other.into(),
    }
}
