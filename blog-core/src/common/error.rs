use std::fmt;
use thiserror::Error;

/// Kind of row a lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Post,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => f.write_str("User"),
            Entity::Post => f.write_str("Post"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("{entity} not found")]
    NotFound { entity: Entity },

    #[error("Integrity constraint violated: {message}")]
    IntegrityViolation { message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl BlogError {
    pub fn not_found(entity: Entity) -> Self {
        BlogError::NotFound { entity }
    }

    /// HTTP status the error maps to at the API boundary
    pub fn status(&self) -> u16 {
        match self {
            BlogError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            BlogError::NotFound { .. } => "NOT_FOUND",
            BlogError::IntegrityViolation { .. } => "INTEGRITY_VIOLATION",
            _ => "INTERNAL",
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
