use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::MediaRef;
use crate::error::DomainError;

/// Post category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Tech,
    Lifestyle,
    Travel,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Tech, Category::Lifestyle, Category::Travel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Lifestyle => "lifestyle",
            Category::Travel => "travel",
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tech" => Ok(Category::Tech),
            "lifestyle" => Ok(Category::Lifestyle),
            "travel" => Ok(Category::Travel),
            other => Err(DomainError::Validation(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of flipping a user's membership in a post's liker set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeToggle {
    Liked,
    Unliked,
}

/// Comment embedded in a post. Lives and dies with its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a comment; the body is trimmed and must not end up empty.
    pub fn new(author_id: Uuid, body: &str) -> Result<Self, DomainError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::Validation("Comment cannot be empty".into()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            body: body.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Post entity - a blog entry owned by exactly one author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub category: Category,
    pub cover: MediaRef,
    /// Liker set; each user appears at most once.
    pub likes: Vec<Uuid>,
    /// Append-only, oldest first.
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. Title and body are required; the title is trimmed.
    pub fn new(
        author_id: Uuid,
        title: &str,
        body: &str,
        category: Category,
    ) -> Result<Self, DomainError> {
        let title = required("title", title)?;
        if body.trim().is_empty() {
            return Err(DomainError::Validation("body is required".into()));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body: body.to_string(),
            category,
            cover: MediaRef::default(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_author(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Remove the user from the liker set if present, add otherwise.
    pub fn toggle_like(&mut self, user_id: Uuid) -> LikeToggle {
        match self.likes.iter().position(|id| *id == user_id) {
            Some(index) => {
                self.likes.remove(index);
                LikeToggle::Unliked
            }
            None => {
                self.likes.push(user_id);
                LikeToggle::Liked
            }
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Trim a required text field, rejecting blank input.
pub(crate) fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
