// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use snafu::Snafu;

pub mod prometheus;
pub mod route;

pub use prometheus::PrometheusMetrics;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("missing cluster id or query"))]
    MissingParameter,

    #[snafu(display("cluster '{}' is not configured", cluster_id))]
    UnknownCluster { cluster_id: String },

    #[snafu(display("no token configured for cluster '{}'", cluster_id))]
    MissingToken { cluster_id: String },

    #[snafu(display("invalid endpoint '{}' for cluster '{}'", endpoint, cluster_id))]
    InvalidEndpoint { cluster_id: String, endpoint: String },

    #[snafu(display("failed to build http client: {}", source))]
    HttpClient { source: reqwest::Error },

    #[snafu(display("failed to create kubernetes client: {}", source))]
    KubeClient { source: kube::Error },

    #[snafu(display("failed to look up prometheus route: {}", source))]
    Route { source: kube::Error },

    #[snafu(display("prometheus route has no host"))]
    MissingRouteHost,

    #[snafu(display("prometheus request failed: {}", source))]
    Transport { source: reqwest::Error },

    #[snafu(display("prometheus responded with status {}", status))]
    Status { status: u16 },

    #[snafu(display("cannot decode prometheus response: {}", source))]
    Decode { source: reqwest::Error },

    #[snafu(display("prometheus query failed: {}", message))]
    QueryFailed { message: String },

    #[snafu(display("prometheus result contains {} records, expected one", rows))]
    AmbiguousResult { rows: usize },

    #[snafu(display("prometheus result is empty"))]
    EmptyResult,

    #[snafu(display("unexpected prometheus result type '{}'", result_type))]
    UnexpectedResultType { result_type: String },

    #[snafu(display("invalid sample value '{}': {}", value, source))]
    InvalidValue {
        value: String,
        source: std::num::ParseFloatError,
    },

    #[snafu(display("sample value '{}' is not finite", value))]
    NonFiniteValue { value: String },
}

/// Read-only access to a cluster's metrics.
///
/// Every call must yield exactly one number or an error.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn query(&self, cluster_id: &str, query: &str) -> Result<f64, Error>;
}
