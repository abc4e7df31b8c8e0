use crate::graphql::schema::{create_schema, GraphQLSchema};
use crate::observability::metrics;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    http::Method,
    response::{Html, IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use blog_core::storage::Storage;
use hyper::Server;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "blog-graphql",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GraphiQL IDE endpoint
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// GraphQL endpoint handler
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let started = Instant::now();
    let response = schema.execute(req.into_inner()).await;
    metrics::graphql::request_completed(started.elapsed(), response.is_err());
    response.into()
}

/// Create the HTTP router.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_server(
    storage: Arc<dyn Storage>,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let schema = create_schema(storage);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/graphiql", get(graphiql))
        .route("/graphql", get(graphiql).post(graphql_handler));

    if let Some(handle) = metrics_handle {
        router = router.route(
            "/metrics",
            get(move || std::future::ready(handle.render())),
        );
    }

    router
        .layer(Extension(schema))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Serve `app` on `addr` until Ctrl-C
pub async fn start_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("HTTP server running on http://{}", addr);
    info!("GraphQL:      http://{}/graphql", addr);
    info!("GraphiQL UI:  http://{}/graphiql", addr);
    info!("Health check: http://{}/health", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
