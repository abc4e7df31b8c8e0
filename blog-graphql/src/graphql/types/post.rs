use async_graphql::SimpleObject;
use blog_core::common::BlogError;
use blog_core::Post;

/// GraphQL representation of a Post
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    /// The store-assigned identifier of the post
    pub id: i32,
    pub title: String,
    pub content: String,
}

impl TryFrom<Post> for PostSummary {
    type Error = BlogError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        let id = post
            .id
            .ok_or_else(|| BlogError::MissingField("post.id".to_string()))?;

        Ok(Self {
            id,
            title: post.title,
            content: post.content,
        })
    }
}
