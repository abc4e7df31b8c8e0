use super::post::PostSummary;
use async_graphql::SimpleObject;
use blog_core::common::BlogError;
use blog_core::{User, UserWithPosts};

/// GraphQL representation of a User and the posts it authored
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    /// The store-assigned identifier of the user
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Every post authored by this user, loaded together with the user
    pub posts: Vec<PostSummary>,
}

impl TryFrom<UserWithPosts> for UserView {
    type Error = BlogError;

    fn try_from(loaded: UserWithPosts) -> Result<Self, Self::Error> {
        let posts = loaded
            .posts
            .into_iter()
            .map(PostSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut view = UserView::try_from(loaded.user)?;
        view.posts = posts;
        Ok(view)
    }
}

/// A freshly created user owns no posts yet
impl TryFrom<User> for UserView {
    type Error = BlogError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let id = user
            .id
            .ok_or_else(|| BlogError::MissingField("user.id".to_string()))?;

        Ok(Self {
            id,
            name: user.name,
            email: user.email,
            posts: Vec::new(),
        })
    }
}
