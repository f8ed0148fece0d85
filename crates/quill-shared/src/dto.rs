//! Data Transfer Objects - submitted forms and the view models handed to templates.
//!
//! Forms accept both the snake_case names and the camelCase names used by
//! the HTML forms.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// `POST /signup`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// `POST /login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /posts/{id}/comments`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub body: String,
}

/// `GET /posts/search?q=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `POST /profile/edit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// `POST /password`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordForm {
    #[serde(default, alias = "oldPassword")]
    pub old_password: String,
    #[serde(default, alias = "newPassword")]
    pub new_password: String,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: String,
}

/// Public face of a user next to their content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: String,
}

/// The logged-in user as shown in page chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerView {
    pub id: String,
    pub username: String,
    pub role: String,
    pub avatar_url: Option<String>,
}

/// A post in a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub cover_url: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub like_count: usize,
    pub comment_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /posts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub cover_url: Option<String>,
    pub author: Option<AuthorView>,
    pub author_name: String,
    pub like_count: usize,
    pub liked_by_viewer: bool,
    pub is_author: bool,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCommentView {
    pub post_id: String,
    pub post_title: String,
    pub username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /blog`, `GET /category/{category}`, `GET /author/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedView {
    pub heading: String,
    pub category: Option<String>,
    pub author: Option<AuthorView>,
    pub featured_author: Option<AuthorView>,
    pub posts: Vec<PostCard>,
    pub featured_posts: Vec<PostCard>,
    pub popular_posts: Vec<PostCard>,
    pub recent_comments: Vec<RecentCommentView>,
}

/// `GET /posts/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchView {
    pub query: String,
    pub posts: Vec<PostCard>,
}

/// `GET /profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub gender: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `GET /write`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterView {
    pub posts: Vec<PostCard>,
}

/// Create and edit forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostFormView {
    pub categories: Vec<String>,
    pub post: Option<PostView>,
}
