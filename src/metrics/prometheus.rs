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

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::IgnoredAny;
use snafu::{OptionExt, ResultExt, ensure};
use tracing::{debug, warn};

use super::{
    AmbiguousResultSnafu, DecodeSnafu, EmptyResultSnafu, Error, HttpClientSnafu,
    InvalidValueSnafu, MetricsSource, MissingParameterSnafu, MissingTokenSnafu,
    NonFiniteValueSnafu, QueryFailedSnafu, StatusSnafu, TransportSnafu, UnknownClusterSnafu,
    UnexpectedResultTypeSnafu, route,
};
use crate::types::cluster::Cluster;

const QUERY_PATH: &str = "api/v1/query";

/// Instant-query response of the Prometheus HTTP API.
#[derive(Deserialize, Debug)]
pub(crate) struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
enum QueryData {
    Vector(Vec<VectorSample>),
    Scalar(SampleValue),
    Matrix(IgnoredAny),
    String(IgnoredAny),
}

#[derive(Deserialize, Debug)]
struct VectorSample {
    #[serde(default)]
    #[allow(dead_code)]
    metric: HashMap<String, String>,
    value: SampleValue,
}

/// `[<unix timestamp>, "<value>"]`
#[derive(Deserialize, Debug)]
struct SampleValue(#[allow(dead_code)] f64, String);

/// Queries the monitoring Prometheus of each configured cluster.
pub struct PrometheusMetrics {
    clusters: HashMap<String, Cluster>,
    verified: reqwest::Client,
    insecure: reqwest::Client,
}

impl PrometheusMetrics {
    pub fn new(clusters: &[Cluster], timeout: Duration) -> Result<Self, Error> {
        let verified = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context(HttpClientSnafu)?;
        let insecure = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context(HttpClientSnafu)?;

        Ok(Self {
            clusters: clusters
                .iter()
                .map(|c| (c.id.clone(), c.clone()))
                .collect(),
            verified,
            insecure,
        })
    }

    fn http(&self, cluster: &Cluster) -> &reqwest::Client {
        if cluster.insecure_skip_tls_verify {
            &self.insecure
        } else {
            &self.verified
        }
    }

    async fn query_url(&self, cluster: &Cluster) -> Result<Url, Error> {
        let mut endpoint = match &cluster.prometheus_url {
            Some(url) => url.clone(),
            None => format!("https://{}", route::prometheus_host(cluster).await?),
        };
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Url::parse(&endpoint)
            .and_then(|base| base.join(QUERY_PATH))
            .map_err(|_| Error::InvalidEndpoint {
                cluster_id: cluster.id.clone(),
                endpoint,
            })
    }
}

#[async_trait]
impl MetricsSource for PrometheusMetrics {
    async fn query(&self, cluster_id: &str, query: &str) -> Result<f64, Error> {
        ensure!(
            !cluster_id.is_empty() && !query.is_empty(),
            MissingParameterSnafu
        );

        let cluster = self
            .clusters
            .get(cluster_id)
            .context(UnknownClusterSnafu { cluster_id })?;
        ensure!(!cluster.token.is_empty(), MissingTokenSnafu { cluster_id });

        let url = self.query_url(cluster).await?;
        debug!("Calling {} for cluster {}", url, cluster_id);

        let response = self
            .http(cluster)
            .get(url)
            .query(&[("query", query)])
            .bearer_auth(&cluster.token)
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = response
                .json::<QueryResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_default();
            warn!(
                "prometheus of cluster {} responded with {}: {}",
                cluster_id, status, reason
            );
            return StatusSnafu {
                status: status.as_u16(),
            }
            .fail();
        }

        let body: QueryResponse = response.json().await.context(DecodeSnafu)?;
        single_value(body)
    }
}

/// Extract the only value of an instant query result.
pub(crate) fn single_value(response: QueryResponse) -> Result<f64, Error> {
    if response.status != "success" {
        return QueryFailedSnafu {
            message: response.error.unwrap_or(response.status),
        }
        .fail();
    }

    let sample = match response.data {
        Some(QueryData::Vector(mut rows)) => match rows.len() {
            0 => return EmptyResultSnafu.fail(),
            1 => rows.remove(0).value,
            rows => return AmbiguousResultSnafu { rows }.fail(),
        },
        Some(QueryData::Scalar(value)) => value,
        Some(QueryData::Matrix(_)) => {
            return UnexpectedResultTypeSnafu {
                result_type: "matrix",
            }
            .fail();
        }
        Some(QueryData::String(_)) => {
            return UnexpectedResultTypeSnafu {
                result_type: "string",
            }
            .fail();
        }
        None => return EmptyResultSnafu.fail(),
    };

    parse_value(&sample.1)
}

fn parse_value(raw: &str) -> Result<f64, Error> {
    let value: f64 = raw.parse().context(InvalidValueSnafu { value: raw })?;
    ensure!(value.is_finite(), NonFiniteValueSnafu { value: raw });
    Ok(value)
}
