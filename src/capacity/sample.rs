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

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use strum::{Display, EnumIter, IntoEnumIterator};

use super::score::{LoadScore, score};
use super::{CollaboratorSnafu, Error};
use crate::metrics::MetricsSource;
use crate::types::cluster::Cluster;

/// Resource dimension sampled on a cluster's compute nodes.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[strum(to_string = "cpu requests")]
    CpuRequests,

    #[strum(to_string = "memory requests")]
    MemoryRequests,

    #[strum(to_string = "pod capacity")]
    PodCapacity,
}

/// PromQL expressions yielding one ratio per dimension.
///
/// The defaults only consider nodes labelled as compute nodes.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CapacityQueries {
    #[serde(default = "default_cpu_requests")]
    pub cpu_requests: String,

    #[serde(default = "default_memory_requests")]
    pub memory_requests: String,

    #[serde(default = "default_pod_capacity")]
    pub pod_capacity: String,
}

fn default_cpu_requests() -> String {
    "sum(kube_pod_container_resource_requests_cpu_cores and on(node) kube_node_labels{label_node_role_kubernetes_io_compute='true'}) / sum(node:node_num_cpu:sum and on(node) kube_node_labels{label_node_role_kubernetes_io_compute='true'})".to_string()
}

fn default_memory_requests() -> String {
    "sum(kube_pod_container_resource_requests_memory_bytes and on(node) kube_node_labels{label_node_role_kubernetes_io_compute='true'}) / sum(node:node_memory_bytes_total:sum and on(node) kube_node_labels{label_node_role_kubernetes_io_compute='true'})".to_string()
}

fn default_pod_capacity() -> String {
    "count(kube_pod_info and on(pod) kube_pod_container_status_running == 1 and on(node) kube_node_labels{label_node_role_kubernetes_io_compute='true'}) / sum(kube_node_status_capacity_pods and on(node) kube_node_labels{label_node_role_kubernetes_io_compute='true'})".to_string()
}

impl Default for CapacityQueries {
    fn default() -> Self {
        Self {
            cpu_requests: default_cpu_requests(),
            memory_requests: default_memory_requests(),
            pod_capacity: default_pod_capacity(),
        }
    }
}

impl CapacityQueries {
    pub fn get(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::CpuRequests => &self.cpu_requests,
            Dimension::MemoryRequests => &self.memory_requests,
            Dimension::PodCapacity => &self.pod_capacity,
        }
    }
}

/// Utilization of one cluster at one point in time, each in `[0, 1]`.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct UtilizationSample {
    pub cpu_requests: f64,
    pub memory_requests: f64,
    pub pod_capacity: f64,
}

impl UtilizationSample {
    pub fn fractions(&self) -> [f64; 3] {
        [self.cpu_requests, self.memory_requests, self.pod_capacity]
    }

    pub fn score(&self) -> LoadScore {
        score(&self.fractions())
    }

    fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::CpuRequests => self.cpu_requests = value,
            Dimension::MemoryRequests => self.memory_requests = value,
            Dimension::PodCapacity => self.pod_capacity = value,
        }
    }
}

/// Query the three utilization ratios of a cluster, one after the other.
///
/// The first failing query aborts sampling.
pub async fn sample(
    source: &dyn MetricsSource,
    queries: &CapacityQueries,
    cluster: &Cluster,
) -> Result<UtilizationSample, Error> {
    let mut sample = UtilizationSample::default();
    for dimension in Dimension::iter() {
        let value = source
            .query(&cluster.id, queries.get(dimension))
            .await
            .context(CollaboratorSnafu {
                cluster_id: &cluster.id,
                dimension,
            })?;
        sample.set(dimension, value);
    }
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;
    use crate::tests::{StaticMetrics, create_test_cluster};

    #[tokio::test]
    async fn test_sample_maps_each_query_to_its_dimension() {
        let metrics = StaticMetrics::new().with_sample("awsdev", 0.9, 0.2, 0.4);
        let cluster = create_test_cluster("awsdev", None);

        let sample = sample(&metrics, &CapacityQueries::default(), &cluster)
            .await
            .unwrap();

        assert_eq!(
            sample,
            UtilizationSample {
                cpu_requests: 0.9,
                memory_requests: 0.2,
                pod_capacity: 0.4,
            }
        );
        assert_eq!(sample.score(), 0.84);
        assert_eq!(metrics.calls(), vec![
            ("awsdev".to_string(), Dimension::CpuRequests),
            ("awsdev".to_string(), Dimension::MemoryRequests),
            ("awsdev".to_string(), Dimension::PodCapacity),
        ]);
    }

    #[tokio::test]
    async fn test_sample_stops_at_first_failure() {
        let metrics = StaticMetrics::new()
            .with_sample("awsdev", 0.5, 0.5, 0.5)
            .with_failure("awsdev", Dimension::MemoryRequests);
        let cluster = create_test_cluster("awsdev", None);

        let err = sample(&metrics, &CapacityQueries::default(), &cluster)
            .await
            .unwrap_err();

        match err {
            Error::Collaborator {
                cluster_id,
                dimension,
                source,
            } => {
                assert_eq!(cluster_id, "awsdev");
                assert_eq!(dimension, Dimension::MemoryRequests);
                assert!(matches!(source, metrics::Error::AmbiguousResult { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(metrics.calls().len(), 2, "pod query must not be issued");
    }

    #[tokio::test]
    async fn test_custom_queries_are_used() {
        let queries = CapacityQueries {
            cpu_requests: "cpu".to_string(),
            memory_requests: "mem".to_string(),
            pod_capacity: "pods".to_string(),
        };
        let metrics = StaticMetrics::with_queries(queries.clone()).with_sample("c1", 0.1, 0.2, 0.3);

        let sample = sample(&metrics, &queries, &create_test_cluster("c1", None))
            .await
            .unwrap();
        assert_eq!(sample.fractions(), [0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_default_queries_target_compute_nodes() {
        let queries = CapacityQueries::default();
        for dimension in Dimension::iter() {
            assert!(
                queries
                    .get(dimension)
                    .contains("label_node_role_kubernetes_io_compute='true'"),
                "{dimension} query must be scoped to compute nodes"
            );
        }
    }

    #[test]
    fn test_partial_query_config_keeps_defaults() {
        let queries: CapacityQueries =
            serde_yaml_ng::from_str("pod_capacity: count(kube_pod_info) / 250").unwrap();
        assert_eq!(queries.pod_capacity, "count(kube_pod_info) / 250");
        assert_eq!(queries.cpu_requests, default_cpu_requests());
    }
}
