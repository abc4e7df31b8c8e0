use super::traits::Storage;
use crate::common::error::{BlogError, Result};
use crate::database::DatabaseManager;
use crate::domain::*;
use async_trait::async_trait;
use libsql::params::IntoParams;
use libsql::Row;
use std::sync::Arc;
use tracing::debug;

/// Database storage implementation using libSQL with `user` and `post` tables
pub struct DatabaseStorage {
    db: Arc<DatabaseManager>,
}

impl DatabaseStorage {
    /// Wrap a manager whose schema has already been ensured
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Map a failed statement, keeping constraint failures distinguishable
    fn statement_error(context: &str, e: libsql::Error) -> BlogError {
        let message = e.to_string();
        if message.contains("constraint failed") {
            BlogError::IntegrityViolation { message }
        } else {
            BlogError::Database {
                message: format!("{context}: {message}"),
            }
        }
    }

    fn read_error(e: libsql::Error) -> BlogError {
        BlogError::Database {
            message: format!("Failed to read row: {e}"),
        }
    }

    fn narrow_id(raw: i64) -> Result<i32> {
        i32::try_from(raw).map_err(|_| BlogError::Database {
            message: format!("Row id {raw} does not fit a GraphQL Int"),
        })
    }

    /// Run one INSERT and return the new row's id.
    ///
    /// The insert is committed only once its rowid is known to fit an i32,
    /// so a failure of either kind leaves no row behind.
    async fn insert_row(
        &self,
        context: &str,
        sql: &str,
        params: impl IntoParams + Send,
    ) -> Result<i32> {
        let conn = self.db.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| Self::statement_error("Failed to begin transaction", e))?;

        let inserted = match tx.execute(sql, params).await {
            Ok(_) => Self::narrow_id(tx.last_insert_rowid()),
            Err(e) => Err(Self::statement_error(context, e)),
        };

        match inserted {
            Ok(id) => {
                tx.commit()
                    .await
                    .map_err(|e| Self::statement_error("Failed to commit insert", e))?;
                Ok(id)
            }
            Err(err) => {
                if let Err(e) = tx.rollback().await {
                    debug!("Rollback after failed insert also failed: {}", e);
                }
                Err(err)
            }
        }
    }

    fn row_to_user(row: &Row) -> Result<User> {
        let id: i64 = row.get(0).map_err(Self::read_error)?;
        let name: String = row.get(1).map_err(Self::read_error)?;
        let email: String = row.get(2).map_err(Self::read_error)?;

        Ok(User {
            id: Some(Self::narrow_id(id)?),
            name,
            email,
        })
    }

    fn row_to_post(row: &Row) -> Result<Post> {
        let id: i64 = row.get(0).map_err(Self::read_error)?;
        let title: String = row.get(1).map_err(Self::read_error)?;
        let content: String = row.get(2).map_err(Self::read_error)?;
        let author_id: i64 = row.get(3).map_err(Self::read_error)?;

        Ok(Post {
            id: Some(Self::narrow_id(id)?),
            title,
            content,
            author_id: Self::narrow_id(author_id)?,
        })
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = self
            .insert_row(
                "Failed to insert user",
                r#"INSERT INTO "user" (name, email) VALUES (?1, ?2)"#,
                libsql::params![user.name.as_str(), user.email.as_str()],
            )
            .await?;
        user.id = Some(id);

        debug!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn create_post(&self, post: &mut Post) -> Result<()> {
        let id = self
            .insert_row(
                "Failed to insert post",
                "INSERT INTO post (title, content, author_id) VALUES (?1, ?2, ?3)",
                libsql::params![
                    post.title.as_str(),
                    post.content.as_str(),
                    i64::from(post.author_id)
                ],
            )
            .await?;
        post.id = Some(id);

        debug!("Created post: {} with id {}", post.title, id);
        Ok(())
    }

    async fn get_user_with_posts(&self, user_id: i32) -> Result<Option<UserWithPosts>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                r#"SELECT id, name, email FROM "user" WHERE id = ?1"#,
                libsql::params![i64::from(user_id)],
            )
            .await
            .map_err(|e| Self::statement_error("Failed to query user", e))?;

        let user = match rows.next().await.map_err(Self::read_error)? {
            Some(row) => Self::row_to_user(&row)?,
            None => return Ok(None),
        };

        // Eager follow-up query on the same session; no lazy relationship loading
        let mut rows = conn
            .query(
                "SELECT id, title, content, author_id FROM post WHERE author_id = ?1 ORDER BY id",
                libsql::params![i64::from(user_id)],
            )
            .await
            .map_err(|e| Self::statement_error("Failed to query posts", e))?;

        let mut posts = Vec::new();
        while let Some(row) = rows.next().await.map_err(Self::read_error)? {
            posts.push(Self::row_to_post(&row)?);
        }

        debug!("Loaded user {} with {} posts", user_id, posts.len());
        Ok(Some(UserWithPosts { user, posts }))
    }

    async fn get_post_by_id(&self, post_id: i32) -> Result<Option<Post>> {
        let conn = self.db.get_connection().await?;

        let mut rows = conn
            .query(
                "SELECT id, title, content, author_id FROM post WHERE id = ?1",
                libsql::params![i64::from(post_id)],
            )
            .await
            .map_err(|e| Self::statement_error("Failed to query post", e))?;

        match rows.next().await.map_err(Self::read_error)? {
            Some(row) => Ok(Some(Self::row_to_post(&row)?)),
            None => Ok(None),
        }
    }
}
