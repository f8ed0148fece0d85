//! Listing pages: blog home, category, author and the writer's own posts.

use std::sync::Arc;

use uuid::Uuid;

use super::{Authors, resolve_authors};
use crate::domain::{Feed, FeedScope, Post, PostFilter, UserSummary};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

/// A listing page with every referenced user resolved.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub feed: Feed,
    pub authors: Authors,
    /// Author of the newest post.
    pub spotlight: Option<UserSummary>,
    /// Set on author pages.
    pub owner: Option<UserSummary>,
}

pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn page(&self, scope: FeedScope) -> Result<FeedPage, DomainError> {
        let owner = match scope {
            FeedScope::Author(author_id) => Some(
                self.users
                    .find_by_id(author_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("author", author_id))?
                    .summary(),
            ),
            _ => None,
        };

        let posts = self.posts.list(scope.filter()).await?;
        let feed = Feed::assemble(scope, posts);

        let mut ids: Vec<Uuid> = feed.posts.iter().map(|p| p.author_id).collect();
        ids.extend(feed.recent_comments.iter().map(|c| c.author_id));
        let authors = resolve_authors(self.users.as_ref(), &ids).await?;
        let spotlight = feed
            .spotlight_author()
            .and_then(|id| authors.get(id))
            .cloned();

        tracing::debug!(
            ?scope,
            posts = feed.posts.len(),
            comments = feed.recent_comments.len(),
            "Feed assembled"
        );

        Ok(FeedPage {
            feed,
            authors,
            spotlight,
            owner,
        })
    }

    /// The caller's own posts, newest first.
    pub async fn writer_posts(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter {
            author: Some(author_id),
            category: None,
        };
        Ok(self.posts.list(filter).await?)
    }
}
