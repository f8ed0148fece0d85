//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod media;
mod repository;
mod session;

pub use auth::{AuthError, PasswordService, SessionSigner};
pub use media::{FileStore, HostedMedia, MediaError, MediaHost, StorageError, StoredFile};
pub use repository::{BaseRepository, PostRepository, UserRepository};
pub use session::{Session, SessionError, SessionStore};
