use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<i32>,
    pub title: String,
    pub content: String,
    pub author_id: i32,
}

/// A user together with every post it authored, loaded in one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithPosts {
    pub user: User,
    pub posts: Vec<Post>,
}

impl User {
    /// New, unsaved user; the store assigns the id on insert
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Post {
    /// New, unsaved post written by `author_id`
    pub fn new(title: impl Into<String>, content: impl Into<String>, author_id: i32) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author_id,
        }
    }
}
