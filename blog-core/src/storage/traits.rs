use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;

/// Storage trait for persisting users and their posts.
///
/// Every method runs in its own scoped session: the session is opened when
/// the call starts and released before it returns, on success and on error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a user and write the store-assigned id back into `user`
    async fn create_user(&self, user: &mut User) -> Result<()>;

    /// Insert a post and write the store-assigned id back into `post`.
    ///
    /// Fails with `IntegrityViolation` when `post.author_id` names no user.
    async fn create_post(&self, post: &mut Post) -> Result<()>;

    /// Look up a user and eagerly load every post it authored
    async fn get_user_with_posts(&self, user_id: i32) -> Result<Option<UserWithPosts>>;

    async fn get_post_by_id(&self, post_id: i32) -> Result<Option<Post>>;
}
