//! In-memory repositories - used when `DATABASE_URL` is not set and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, LikeToggle, Post, PostFilter, User, sort_newest_first};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Users keyed by id. Username and email are unique.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|u| {
            u.id != entity.id && (u.username == entity.username || u.email == entity.email)
        });
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

/// Posts keyed by id, including their likes and comments.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let posts = self.posts.read().await;
        let mut matching: Vec<Post> = posts.values().filter(|p| keep(p)).cloned().collect();
        sort_newest_first(&mut matching);
        matching
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let mut stored = entity.clone();

        // Engagement is owned by toggle_like and push_comment
        if let Some(existing) = posts.get(&entity.id) {
            stored.likes = existing.likes.clone();
            stored.comments = existing.comments.clone();
        }

        posts.insert(stored.id, stored);
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, filter: PostFilter) -> Result<Vec<Post>, RepoError> {
        Ok(self.collect(|p| filter.matches(p)).await)
    }

    async fn search(&self, needle: &str) -> Result<Vec<Post>, RepoError> {
        let needle = needle.to_lowercase();
        Ok(self
            .collect(|p| {
                p.title.to_lowercase().contains(&needle) || p.body.to_lowercase().contains(&needle)
            })
            .await)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        let outcome = post.toggle_like(user_id);
        post.touch();
        Ok(outcome)
    }

    async fn push_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        post.comments.push(comment);
        post.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quill_core::domain::{Category, Role};

    use super::*;

    fn user(name: &str) -> User {
        User::new(
            name.to_string(),
            format!("{name}@example.com"),
            "hash".to_string(),
            Role::User,
        )
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_a_constraint_error() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("ada")).await.unwrap();

        let mut clash = user("grace");
        clash.email = "ada@example.com".to_string();
        assert!(matches!(
            repo.save(clash).await,
            Err(RepoError::Constraint(_))
        ));

        let found = repo
            .find_by_username_or_email("ada", "nobody@example.com")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn save_keeps_existing_engagement() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let post = Post::new(author, "Title", "Body", Category::Tech).unwrap();
        let id = post.id;
        repo.save(post.clone()).await.unwrap();

        repo.toggle_like(id, reader).await.unwrap();

        let mut edited = post;
        edited.title = "Edited".to_string();
        repo.save(edited).await.unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Edited");
        assert_eq!(stored.likes, vec![reader]);
    }

    #[tokio::test]
    async fn concurrent_toggles_by_distinct_users_all_land() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let post = Post::new(Uuid::new_v4(), "Title", "Body", Category::Travel).unwrap();
        let id = post.id;
        repo.save(post).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.toggle_like(id, Uuid::new_v4()).await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), LikeToggle::Liked);
        }

        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().like_count(), 16);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        repo.save(Post::new(author, "Learning RUST", "x", Category::Tech).unwrap())
            .await
            .unwrap();
        repo.save(Post::new(author, "Hiking", "mountains", Category::Travel).unwrap())
            .await
            .unwrap();

        let hits = repo.search("rust").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(repo.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let err = repo
            .toggle_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
