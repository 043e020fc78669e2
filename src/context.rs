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

use std::sync::Arc;

use snafu::{ResultExt, Snafu};
use tokio_util::sync::CancellationToken;

use crate::capacity::{self, Recommendation};
use crate::config::Config;
use crate::metrics::{self, MetricsSource, PrometheusMetrics};
use crate::types::cluster::Cluster;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot set up metrics client: {}", source))]
    Metrics { source: metrics::Error },
}

/// Process-wide, read-only state shared by every request.
pub struct Context {
    pub(crate) config: Arc<Config>,
    pub(crate) metrics: Arc<dyn MetricsSource>,
}

impl Context {
    pub fn new(config: Config) -> Result<Self, Error> {
        let metrics = PrometheusMetrics::new(&config.clusters, config.metrics_timeout())
            .context(MetricsSnafu)?;
        Ok(Self::with_metrics(config, Arc::new(metrics)))
    }

    pub fn with_metrics(config: Config, metrics: Arc<dyn MetricsSource>) -> Self {
        Self {
            config: Arc::new(config),
            metrics,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fresh copy of the configured clusters; nothing written to it is kept.
    pub fn clusters(&self) -> Vec<Cluster> {
        self.config.clusters.clone()
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.config.cluster(id)
    }

    /// Run a recommendation over all configured clusters.
    ///
    /// Returns the cluster list with the winner marked.
    pub async fn recommend(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Cluster>, Recommendation), capacity::Error> {
        let mut clusters = self.clusters();
        let recommendation = capacity::recommend(
            &mut clusters,
            self.metrics.as_ref(),
            &self.config.capacity,
            cancel,
        )
        .await?;
        Ok((clusters, recommendation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{StaticMetrics, create_test_cluster, create_test_config};

    #[tokio::test]
    async fn test_concurrent_runs_do_not_share_flags() {
        let config = create_test_config(vec![
            create_test_cluster("a", None),
            create_test_cluster("b", None),
        ]);
        let metrics = StaticMetrics::new()
            .with_sample("a", 0.2, 0.2, 0.2)
            .with_sample("b", 0.5, 0.5, 0.5);
        let ctx = Context::with_metrics(config, Arc::new(metrics));

        let cancel = CancellationToken::new();
        let (first, second) = tokio::join!(ctx.recommend(&cancel), ctx.recommend(&cancel));
        let (first, _) = first.unwrap();
        let (second, _) = second.unwrap();

        assert!(first[0].recommended && !first[1].recommended);
        assert!(second[0].recommended && !second[1].recommended);
        assert!(ctx.config().clusters.iter().all(|c| !c.recommended));
    }

    #[tokio::test]
    async fn test_new_builds_prometheus_client() {
        crate::tests::install_crypto_provider();
        let config = create_test_config(vec![create_test_cluster("a", None)]);
        let ctx = Context::new(config).unwrap();
        assert_eq!(ctx.clusters().len(), 1);
        assert!(ctx.cluster("a").is_some());
    }
}
