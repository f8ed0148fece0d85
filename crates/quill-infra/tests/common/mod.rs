#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use quill_core::domain::User;
use quill_core::ports::{FileStore, MediaHost, PostRepository, SessionStore, UserRepository};
use quill_core::services::{
    Attachments, AuthService, FeedService, PostInput, PostService, ProfileService, SignupInput,
    Upload,
};
use quill_infra::{
    Argon2PasswordHasher, InMemoryMediaHost, InMemoryPostRepository, InMemorySessionStore,
    InMemoryUserRepository, JwtSessionSigner, LocalFileStore, SessionTokenConfig,
};

pub const PASSWORD: &str = "correct horse";

/// Every service wired to in-memory adapters and a scratch upload directory.
pub struct Harness {
    pub auth: AuthService,
    pub posts: PostService,
    pub feeds: FeedService,
    pub profiles: ProfileService,
    pub host: Arc<InMemoryMediaHost>,
    pub upload_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let host = Arc::new(InMemoryMediaHost::new());
        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(upload_dir.path()));
        let attachments = Arc::new(Attachments::new(
            host.clone() as Arc<dyn MediaHost>,
            files,
        ));

        Self {
            auth: AuthService::new(
                users.clone(),
                Arc::new(Argon2PasswordHasher::new()),
                Arc::new(JwtSessionSigner::new(SessionTokenConfig::default())),
                sessions,
            ),
            posts: PostService::new(posts.clone(), users.clone(), attachments.clone()),
            feeds: FeedService::new(posts, users.clone()),
            profiles: ProfileService::new(users, attachments),
            host,
            upload_dir,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.auth
            .signup(SignupInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
                role: None,
            })
            .await
            .unwrap()
    }

    /// Files currently in the upload directory.
    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub fn input(title: &str, body: &str, category: &str) -> PostInput {
    PostInput {
        title: Some(title.to_string()),
        body: Some(body.to_string()),
        category: Some(category.to_string()),
    }
}

pub fn png(name: &str) -> Upload {
    Upload {
        filename: name.to_string(),
        bytes: b"\x89PNG\r\n\x1a\n fake image".to_vec(),
    }
}
