//! Request and store metrics, exported in Prometheus text format.
//!
//! Recording is a no-op until [`init`] installs the recorder, so tests and
//! tools that build a schema without metrics pay nothing.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::fmt;
use tracing::info;

/// Every metric name used by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    GraphqlRequests,
    GraphqlRequestErrors,
    GraphqlRequestDuration,
    StoreOperations,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::GraphqlRequests => "graphql_requests_total",
            MetricName::GraphqlRequestErrors => "graphql_request_errors_total",
            MetricName::GraphqlRequestDuration => "graphql_request_duration_seconds",
            MetricName::StoreOperations => "store_operations_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store operation label values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    CreateUser,
    CreatePost,
    GetUser,
    GetPost,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::CreateUser => "create_user",
            StoreOperation::CreatePost => "create_post",
            StoreOperation::GetUser => "get_user",
            StoreOperation::GetPost => "get_post",
        }
    }
}

/// Install the Prometheus recorder and return the handle that renders it
pub fn init() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Metrics system initialized");
    Ok(handle)
}

pub mod graphql {
    use super::MetricName;
    use std::time::Duration;

    /// Record one executed GraphQL request
    pub fn request_completed(elapsed: Duration, failed: bool) {
        ::metrics::counter!(MetricName::GraphqlRequests.as_str()).increment(1);
        if failed {
            ::metrics::counter!(MetricName::GraphqlRequestErrors.as_str()).increment(1);
        }
        ::metrics::histogram!(MetricName::GraphqlRequestDuration.as_str())
            .record(elapsed.as_secs_f64());
    }
}

pub mod store {
    use super::{MetricName, StoreOperation};

    /// Record one store round trip; a missing row still counts as `ok`
    pub fn operation(operation: StoreOperation, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        ::metrics::counter!(
            MetricName::StoreOperations.as_str(),
            "operation" => operation.as_str(),
            "outcome" => outcome
        )
        .increment(1);
    }
}
