use crate::common::error::{BlogError, Result};
use libsql::{Builder, Connection, Database};
use std::path::PathBuf;
use tracing::{debug, info};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    email TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS post (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    title     TEXT NOT NULL,
    content   TEXT NOT NULL,
    author_id INTEGER NOT NULL REFERENCES "user"(id)
);
CREATE INDEX IF NOT EXISTS idx_post_author_id ON post(author_id);
"#;

/// Where the store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Local SQLite file, created if absent
    Local(PathBuf),
    /// Remote libSQL/Turso database
    Remote { url: String, auth_token: String },
}

impl DatabaseTarget {
    /// Interpret a connection string.
    ///
    /// `libsql://`, `http://` and `https://` URLs are remote and need an auth
    /// token; `file:` URLs and bare paths are local files.
    pub fn parse(url: &str, auth_token: Option<String>) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(BlogError::Config {
                message: "database URL is empty".to_string(),
            });
        }

        let is_remote = ["libsql://", "http://", "https://"]
            .iter()
            .any(|scheme| url.starts_with(scheme));

        if is_remote {
            let auth_token = auth_token.ok_or_else(|| BlogError::Config {
                message: format!("remote database {url} requires LIBSQL_AUTH_TOKEN"),
            })?;
            return Ok(DatabaseTarget::Remote {
                url: url.to_string(),
                auth_token,
            });
        }

        let path = url.strip_prefix("file:").unwrap_or(url);
        Ok(DatabaseTarget::Local(PathBuf::from(path)))
    }
}

pub struct DatabaseManager {
    db: Database,
}

impl DatabaseManager {
    /// Open the database described by `target`
    pub async fn new(target: &DatabaseTarget) -> Result<Self> {
        let db = match target {
            DatabaseTarget::Local(path) => {
                info!("Opening local database at {}", path.display());
                Builder::new_local(path).build().await
            }
            DatabaseTarget::Remote { url, auth_token } => {
                info!("Connecting to remote database at {}", url);
                Builder::new_remote(url.clone(), auth_token.clone())
                    .build()
                    .await
            }
        }
        .map_err(|e| BlogError::Database {
            message: format!("Failed to open database: {e}"),
        })?;

        Ok(Self { db })
    }

    /// Open a session scoped to one operation.
    ///
    /// Foreign keys are enforced per connection in SQLite, so every session
    /// switches them on before it is handed out.
    pub async fn get_connection(&self) -> Result<Connection> {
        let conn = self.db.connect().map_err(|e| BlogError::Database {
            message: format!("Failed to get database connection: {e}"),
        })?;

        conn.execute("PRAGMA foreign_keys = ON", libsql::params![])
            .await
            .map_err(|e| BlogError::Database {
                message: format!("Failed to enable foreign keys: {e}"),
            })?;

        debug!("Opened database session");
        Ok(conn)
    }

    /// Create the `user` and `post` tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        info!("Ensuring database schema...");

        let conn = self.get_connection().await?;
        conn.execute_batch(SCHEMA_SQL)
            .await
            .map_err(|e| BlogError::Database {
                message: format!("Failed to create schema: {e}"),
            })?;

        info!("Database schema ready");
        Ok(())
    }
}
