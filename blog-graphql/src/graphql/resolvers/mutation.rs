use crate::graphql::error::to_graphql_error;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{PostSummary, UserView};
use crate::observability::metrics::{self, StoreOperation};
use async_graphql::{Context, FieldResult, Object};
use blog_core::{Post, User};
use tracing::{error, info};

/// Root mutation object for GraphQL
pub struct Mutation;

#[Object]
impl Mutation {
    /// Create a user. Emails are not required to be unique.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
    ) -> FieldResult<Option<UserView>> {
        let context = ctx.data::<GraphQLContext>()?;
        let mut user = User::new(name, email);

        let result = context.storage.create_user(&mut user).await;
        metrics::store::operation(StoreOperation::CreateUser, result.is_ok());

        if let Err(e) = result {
            error!("Failed to create user {}: {}", user.name, e);
            return Err(to_graphql_error(&e));
        }

        info!("Created user {:?}", user.id);
        UserView::try_from(user)
            .map(Some)
            .map_err(|e| to_graphql_error(&e))
    }

    /// Create a post written by `author_id`.
    ///
    /// The author is not looked up first; a dangling `author_id` is rejected
    /// by the store's foreign key and surfaces as an integrity error.
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        author_id: i32,
    ) -> FieldResult<Option<PostSummary>> {
        let context = ctx.data::<GraphQLContext>()?;
        let mut post = Post::new(title, content, author_id);

        let result = context.storage.create_post(&mut post).await;
        metrics::store::operation(StoreOperation::CreatePost, result.is_ok());

        if let Err(e) = result {
            error!("Failed to create post for author {}: {}", author_id, e);
            return Err(to_graphql_error(&e));
        }

        info!("Created post {:?} for author {}", post.id, author_id);
        PostSummary::try_from(post)
            .map(Some)
            .map_err(|e| to_graphql_error(&e))
    }
}
