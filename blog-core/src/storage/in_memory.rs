use super::traits::Storage;
use crate::common::error::{BlogError, Result};
use crate::domain::*;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    next_user_id: i32,
    next_post_id: i32,
}

/// In-memory storage implementation for development/testing
#[derive(Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| BlogError::Database {
            message: "in-memory tables poisoned by a panicked writer".to_string(),
        })
    }
}

/// Advance an id sequence, failing like the database does once ids leave i32
fn next_id(counter: &mut i32) -> Result<i32> {
    let id = counter.checked_add(1).ok_or_else(|| BlogError::Database {
        message: "Row id does not fit a GraphQL Int".to_string(),
    })?;
    *counter = id;
    Ok(id)
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: &mut User) -> Result<()> {
        let mut tables = self.tables()?;
        let id = next_id(&mut tables.next_user_id)?;
        user.id = Some(id);
        tables.users.insert(id, user.clone());

        debug!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn create_post(&self, post: &mut Post) -> Result<()> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&post.author_id) {
            return Err(BlogError::IntegrityViolation {
                message: "FOREIGN KEY constraint failed".to_string(),
            });
        }

        let id = next_id(&mut tables.next_post_id)?;
        post.id = Some(id);
        tables.posts.insert(id, post.clone());

        debug!("Created post: {} with id {}", post.title, id);
        Ok(())
    }

    async fn get_user_with_posts(&self, user_id: i32) -> Result<Option<UserWithPosts>> {
        let tables = self.tables()?;
        let Some(user) = tables.users.get(&user_id).cloned() else {
            return Ok(None);
        };

        let posts = tables
            .posts
            .values()
            .filter(|p| p.author_id == user_id)
            .cloned()
            .collect();

        Ok(Some(UserWithPosts { user, posts }))
    }

    async fn get_post_by_id(&self, post_id: i32) -> Result<Option<Post>> {
        let tables = self.tables()?;
        Ok(tables.posts.get(&post_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_assigned_sequentially_from_one() {
        let storage = InMemoryStorage::new();
        let mut ada = User::new("Ada", "ada@example.com");
        let mut grace = User::new("Grace", "grace@example.com");

        storage.create_user(&mut ada).await.unwrap();
        storage.create_user(&mut grace).await.unwrap();

        assert_eq!(ada.id, Some(1));
        assert_eq!(grace.id, Some(2));
    }

    #[tokio::test]
    async fn user_lookup_includes_only_own_posts() {
        let storage = InMemoryStorage::new();
        let mut ada = User::new("Ada", "ada@example.com");
        let mut grace = User::new("Grace", "grace@example.com");
        storage.create_user(&mut ada).await.unwrap();
        storage.create_user(&mut grace).await.unwrap();

        let mut first = Post::new("Hi", "Hello world", 1);
        let mut other = Post::new("Compilers", "On COBOL", 2);
        let mut second = Post::new("Engines", "Analytical", 1);
        storage.create_post(&mut first).await.unwrap();
        storage.create_post(&mut other).await.unwrap();
        storage.create_post(&mut second).await.unwrap();

        let loaded = storage.get_user_with_posts(1).await.unwrap().unwrap();
        assert_eq!(loaded.user, ada);
        assert_eq!(loaded.posts, vec![first, second]);
    }

    #[tokio::test]
    async fn post_for_missing_author_is_rejected() {
        let storage = InMemoryStorage::new();
        let mut post = Post::new("Orphan", "No author", 42);

        let err = storage.create_post(&mut post).await.unwrap_err();

        assert!(matches!(err, BlogError::IntegrityViolation { .. }));
        assert_eq!(post.id, None);
        assert!(storage.get_post_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exhausted_id_space_is_an_error() {
        let storage = InMemoryStorage::new();
        storage.tables.lock().unwrap().next_user_id = i32::MAX;

        let mut user = User::new("Ada", "ada@example.com");
        let err = storage.create_user(&mut user).await.unwrap_err();

        assert!(matches!(err, BlogError::Database { .. }));
        assert_eq!(user.id, None);
        assert!(storage.tables.lock().unwrap().users.is_empty());
    }

    #[tokio::test]
    async fn missing_rows_are_none() {
        let storage = InMemoryStorage::new();
        assert!(storage.get_user_with_posts(7).await.unwrap().is_none());
        assert!(storage.get_post_by_id(7).await.unwrap().is_none());
    }
}
