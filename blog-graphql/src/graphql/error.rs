use async_graphql::{Error, ErrorExtensions};
use blog_core::common::BlogError;

/// Convert a domain error into a GraphQL error.
///
/// The message is the error's display text; `code` and the HTTP-equivalent
/// `status` travel in the error's extensions.
pub fn to_graphql_error(err: &BlogError) -> Error {
    let code = err.code();
    let status = i32::from(err.status());
    Error::new(err.to_string()).extend_with(|_, e| {
        e.set("code", code);
        e.set("status", status);
    })
}
