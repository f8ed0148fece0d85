//! Listing views: featured, popular and recent-comment aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::{Category, Post};

pub const POPULAR_LIMIT: usize = 5;
pub const RECENT_COMMENTS_LIMIT: usize = 5;

/// Repository-level listing filter. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category: Option<Category>,
    pub author: Option<Uuid>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        self.category.is_none_or(|c| post.category == c)
            && self.author.is_none_or(|a| post.author_id == a)
    }
}

/// Which listing page is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FeedScope {
    All,
    Category(Category),
    Author(Uuid),
}

impl FeedScope {
    pub fn filter(&self) -> PostFilter {
        match *self {
            FeedScope::All => PostFilter::default(),
            FeedScope::Category(category) => PostFilter {
                category: Some(category),
                author: None,
            },
            FeedScope::Author(author) => PostFilter {
                category: None,
                author: Some(author),
            },
        }
    }

    /// Category pages show a shorter carousel.
    pub fn featured_limit(&self) -> usize {
        match self {
            FeedScope::Category(_) => 3,
            _ => 5,
        }
    }
}

/// A comment lifted out of its post for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentComment {
    pub post_id: Uuid,
    pub post_title: String,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// The data behind one listing page.
#[derive(Debug, Clone)]
pub struct Feed {
    pub scope: FeedScope,
    pub posts: Vec<Post>,
    pub featured: Vec<Post>,
    pub popular: Vec<Post>,
    pub recent_comments: Vec<RecentComment>,
}

impl Feed {
    /// Build every view of the page from the matching posts.
    pub fn assemble(scope: FeedScope, mut posts: Vec<Post>) -> Self {
        sort_newest_first(&mut posts);
        let featured = posts.iter().take(scope.featured_limit()).cloned().collect();
        let popular = most_liked(&posts, POPULAR_LIMIT);
        let recent_comments = recent_comments(&posts, RECENT_COMMENTS_LIMIT);

        Self {
            scope,
            posts,
            featured,
            popular,
            recent_comments,
        }
    }

    /// Author of the newest post, if any.
    pub fn spotlight_author(&self) -> Option<Uuid> {
        self.posts.first().map(|p| p.author_id)
    }
}

pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Posts by liker count, descending. The sort is stable, so ties keep the
/// input order.
pub fn most_liked(posts: &[Post], limit: usize) -> Vec<Post> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by(|a, b| b.like_count().cmp(&a.like_count()));
    ranked.into_iter().take(limit).cloned().collect()
}

/// Flatten every post's comments, newest first. O(total comments).
pub fn recent_comments(posts: &[Post], limit: usize) -> Vec<RecentComment> {
    let mut flattened: Vec<RecentComment> = posts
        .iter()
        .flat_map(|post| {
            post.comments.iter().map(move |c| RecentComment {
                post_id: post.id,
                post_title: post.title.clone(),
                author_id: c.author_id,
                body: c.body.clone(),
                created_at: c.created_at,
            })
        })
        .collect();

    flattened.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    flattened.truncate(limit);
    flattened
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::Comment;

    fn post_at(minutes_ago: i64, category: Category, likes: usize) -> Post {
        let mut post = Post::new(Uuid::new_v4(), "title", "body", category).unwrap();
        post.created_at = Utc::now() - Duration::minutes(minutes_ago);
        post.likes = (0..likes).map(|_| Uuid::new_v4()).collect();
        post
    }

    #[test]
    fn assemble_orders_newest_first_and_caps_featured() {
        let posts = (0..7).map(|i| post_at(i * 10, Category::Tech, 0)).collect();
        let feed = Feed::assemble(FeedScope::All, posts);

        assert_eq!(feed.posts.len(), 7);
        assert_eq!(feed.featured.len(), 5);
        assert!(
            feed.posts
                .windows(2)
                .all(|w| w[0].created_at >= w[1].created_at)
        );
    }

    #[test]
    fn category_scope_features_three() {
        let posts = (0..6).map(|i| post_at(i, Category::Travel, 0)).collect();
        let feed = Feed::assemble(FeedScope::Category(Category::Travel), posts);
        assert_eq!(feed.featured.len(), 3);
    }

    #[test]
    fn popular_ranks_by_likes_and_breaks_ties_by_recency() {
        let newer = post_at(1, Category::Tech, 2);
        let older = post_at(5, Category::Tech, 2);
        let top = post_at(9, Category::Tech, 4);
        let ids = (top.id, newer.id, older.id);

        let feed = Feed::assemble(FeedScope::All, vec![older, top, newer]);
        let popular: Vec<Uuid> = feed.popular.iter().map(|p| p.id).collect();
        assert_eq!(popular, vec![ids.0, ids.1, ids.2]);
    }

    #[test]
    fn recent_comments_are_flattened_sorted_and_truncated() {
        let mut a = post_at(0, Category::Tech, 0);
        let mut b = post_at(0, Category::Tech, 0);
        for i in 0..4 {
            let mut c = Comment::new(Uuid::new_v4(), &format!("a{i}")).unwrap();
            c.created_at = Utc::now() - Duration::minutes(i * 2);
            a.comments.push(c);
            let mut c = Comment::new(Uuid::new_v4(), &format!("b{i}")).unwrap();
            c.created_at = Utc::now() - Duration::minutes(i * 2 + 1);
            b.comments.push(c);
        }

        let recent = recent_comments(&[a, b], RECENT_COMMENTS_LIMIT);
        let bodies: Vec<&str> = recent.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["a0", "b0", "a1", "b1", "a2"]);
    }

    #[test]
    fn filter_matches_category_and_author() {
        let post = post_at(0, Category::Lifestyle, 0);
        assert!(PostFilter::default().matches(&post));
        assert!(FeedScope::Author(post.author_id).filter().matches(&post));
        assert!(!FeedScope::Category(Category::Travel).filter().matches(&post));
    }
}
