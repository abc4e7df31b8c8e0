use crate::graphql::error::to_graphql_error;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{PostSummary, UserView};
use crate::observability::metrics::{self, StoreOperation};
use async_graphql::{Context, FieldResult, Object};
use blog_core::common::{BlogError, Entity};
use tracing::{debug, error};

/// Root query object for GraphQL.
///
/// Root fields are nullable: a failed lookup nulls only its own field, so
/// sibling fields still resolve and report their own errors.
pub struct Query;

#[Object]
impl Query {
    /// Get a user and every post it authored by ID
    async fn get_user(&self, ctx: &Context<'_>, id: i32) -> FieldResult<Option<UserView>> {
        let context = ctx.data::<GraphQLContext>()?;

        let result = context.storage.get_user_with_posts(id).await;
        metrics::store::operation(StoreOperation::GetUser, result.is_ok());

        match result {
            Ok(Some(loaded)) => UserView::try_from(loaded)
                .map(Some)
                .map_err(|e| to_graphql_error(&e)),
            Ok(None) => {
                debug!("User {} not found", id);
                Err(to_graphql_error(&BlogError::not_found(Entity::User)))
            }
            Err(e) => {
                error!("Failed to load user {}: {}", id, e);
                Err(to_graphql_error(&e))
            }
        }
    }

    /// Get a post by ID
    async fn get_post(&self, ctx: &Context<'_>, id: i32) -> FieldResult<Option<PostSummary>> {
        let context = ctx.data::<GraphQLContext>()?;

        let result = context.storage.get_post_by_id(id).await;
        metrics::store::operation(StoreOperation::GetPost, result.is_ok());

        match result {
            Ok(Some(post)) => PostSummary::try_from(post)
                .map(Some)
                .map_err(|e| to_graphql_error(&e)),
            Ok(None) => {
                debug!("Post {} not found", id);
                Err(to_graphql_error(&BlogError::not_found(Entity::Post)))
            }
            Err(e) => {
                error!("Failed to load post {}: {}", id, e);
                Err(to_graphql_error(&e))
            }
        }
    }
}
