//! Application services - one per group of request handlers.

mod auth;
mod feed;
mod media;
mod posts;
mod profile;

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{User, UserSummary};
use crate::error::DomainError;
use crate::ports::UserRepository;

pub use auth::{AuthService, SessionGrant, SignupInput};
pub use feed::{FeedPage, FeedService};
pub use media::{Attachments, Upload};
pub use posts::{PostDetail, PostInput, PostList, PostService};
pub use profile::{ProfileInput, ProfileService};

/// Display name for references to deleted accounts.
pub const ANONYMOUS: &str = "Anonymous";

/// Resolved user references, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Authors(HashMap<Uuid, UserSummary>);

impl Authors {
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        Self(users.into_iter().map(|u| (u.id, u.summary())).collect())
    }

    pub fn get(&self, id: Uuid) -> Option<&UserSummary> {
        self.0.get(&id)
    }

    pub fn username(&self, id: Uuid) -> &str {
        self.get(id).map_or(ANONYMOUS, |u| u.username.as_str())
    }
}

pub(crate) async fn resolve_authors(
    users: &dyn UserRepository,
    ids: &[Uuid],
) -> Result<Authors, DomainError> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.is_empty() {
        return Ok(Authors::default());
    }

    let found = users.find_many(&unique).await?;
    Ok(Authors(
        found.into_iter().map(|u| (u.id, u.summary())).collect(),
    ))
}
