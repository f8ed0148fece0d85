//! Domain values to view models.

use uuid::Uuid;

use quill_core::domain::{Category, FeedScope, Post, RecentComment, User, UserSummary};
use quill_core::services::{ANONYMOUS, Authors, FeedPage, PostDetail, PostList};
use quill_shared::dto::{
    AuthorView, CommentView, FeedView, PostCard, PostFormView, PostView, ProfileView,
    RecentCommentView, SearchView, ViewerView, WriterView,
};

const EXCERPT_CHARS: usize = 160;

pub fn viewer(user: &User) -> ViewerView {
    ViewerView {
        id: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.to_string(),
        avatar_url: user.avatar.display_url(),
    }
}

pub fn author(summary: &UserSummary) -> AuthorView {
    AuthorView {
        id: summary.id.to_string(),
        username: summary.username.clone(),
        avatar_url: summary.avatar_url.clone(),
        bio: summary.bio.clone(),
    }
}

fn excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

pub fn card(post: &Post, authors: &Authors) -> PostCard {
    PostCard {
        id: post.id.to_string(),
        title: post.title.clone(),
        excerpt: excerpt(&post.body),
        category: post.category.to_string(),
        cover_url: post.cover.display_url(),
        author_id: post.author_id.to_string(),
        author_name: authors.username(post.author_id).to_string(),
        like_count: post.like_count(),
        comment_count: post.comments.len(),
        created_at: post.created_at,
    }
}

fn cards(posts: &[Post], authors: &Authors) -> Vec<PostCard> {
    posts.iter().map(|p| card(p, authors)).collect()
}

pub fn post(detail: &PostDetail, viewer_id: Option<Uuid>) -> PostView {
    let PostDetail { post, authors } = detail;
    PostView {
        id: post.id.to_string(),
        title: post.title.clone(),
        body: post.body.clone(),
        category: post.category.to_string(),
        cover_url: post.cover.display_url(),
        author: authors.get(post.author_id).map(author),
        author_name: authors.username(post.author_id).to_string(),
        like_count: post.like_count(),
        liked_by_viewer: viewer_id.is_some_and(|id| post.is_liked_by(id)),
        is_author: viewer_id.is_some_and(|id| post.is_author(id)),
        comments: post
            .comments
            .iter()
            .map(|c| CommentView {
                id: c.id.to_string(),
                author_id: c.author_id.to_string(),
                author_name: authors.username(c.author_id).to_string(),
                body: c.body.clone(),
                created_at: c.created_at,
            })
            .collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn recent_comment(comment: &RecentComment, authors: &Authors) -> RecentCommentView {
    RecentCommentView {
        post_id: comment.post_id.to_string(),
        post_title: comment.post_title.clone(),
        username: authors.username(comment.author_id).to_string(),
        body: comment.body.clone(),
        created_at: comment.created_at,
    }
}

pub fn feed(page: &FeedPage) -> FeedView {
    let FeedPage {
        feed,
        authors,
        spotlight,
        owner,
    } = page;

    let (heading, category) = match feed.scope {
        FeedScope::All => ("Latest posts".to_string(), None),
        FeedScope::Category(category) => (
            format!("{} posts", capitalized(category)),
            Some(category.to_string()),
        ),
        FeedScope::Author(_) => (
            format!(
                "Posts by {}",
                owner.as_ref().map_or(ANONYMOUS, |o| o.username.as_str())
            ),
            None,
        ),
    };

    FeedView {
        heading,
        category,
        author: owner.as_ref().map(author),
        featured_author: spotlight.as_ref().map(author),
        posts: cards(&feed.posts, authors),
        featured_posts: cards(&feed.featured, authors),
        popular_posts: cards(&feed.popular, authors),
        recent_comments: feed
            .recent_comments
            .iter()
            .map(|c| recent_comment(c, authors))
            .collect(),
    }
}

fn capitalized(category: Category) -> String {
    let name = category.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn search(query: &str, list: &PostList) -> SearchView {
    SearchView {
        query: query.to_string(),
        posts: cards(&list.posts, &list.authors),
    }
}

/// The writer's own posts; the writer is the only author involved.
pub fn writer(user: &User, posts: &[Post]) -> WriterView {
    let authors = Authors::from_users([user]);
    WriterView {
        posts: cards(posts, &authors),
    }
}

pub fn post_form(existing: Option<PostView>) -> PostFormView {
    PostFormView {
        categories: Category::ALL.iter().map(|c| c.to_string()).collect(),
        post: existing,
    }
}

pub fn profile(user: &User) -> ProfileView {
    ProfileView {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        full_name: user.full_name.clone(),
        mobile: user.mobile.clone(),
        address: user.address.clone(),
        birthdate: user.birthdate,
        gender: user.gender.as_str().to_string(),
        bio: user.bio.clone(),
        avatar_url: user.avatar.display_url(),
        created_at: user.created_at,
    }
}
