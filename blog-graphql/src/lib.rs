pub mod config;
pub mod graphql;
pub mod observability;
pub mod server;
