//! Domain entities - the core business objects.

mod feed;
mod post;
mod user;

pub use feed::{
    Feed, FeedScope, POPULAR_LIMIT, PostFilter, RECENT_COMMENTS_LIMIT, RecentComment, most_liked,
    recent_comments, sort_newest_first,
};
pub use post::{Category, Comment, LikeToggle, Post};
pub use user::{DEFAULT_BIO, Gender, MediaRef, Role, User, UserSummary, mask_email};

pub(crate) use post::required;
