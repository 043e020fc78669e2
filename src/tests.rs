//  Copyright 2025 RustFS Team
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http:www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use strum::IntoEnumIterator;

use crate::capacity::{CapacityQueries, Dimension};
use crate::config::Config;
use crate::metrics::{self, MetricsSource};
use crate::types::cluster::Cluster;

pub const TEST_JWT_SECRET: &str = "test-secret";

// Helper function to create a test cluster (available to submodule tests via super::tests)
pub fn create_test_cluster(id: &str, exclusion_group: Option<&str>) -> Cluster {
    Cluster {
        id: id.to_string(),
        name: format!("Cluster {}", id),
        exclusion_group: exclusion_group.map(str::to_string),
        url: format!("https://api.{}.example:6443", id),
        token: format!("{}-token", id),
        prometheus_url: None,
        insecure_skip_tls_verify: true,
        gluster_api: None,
        nfs_api: None,
        recommended: false,
    }
}

pub fn create_test_config(clusters: Vec<Cluster>) -> Config {
    Config {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        clusters,
        ..Default::default()
    }
}

pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// In-memory metrics source answering from fixed per-cluster samples.
pub struct StaticMetrics {
    queries: CapacityQueries,
    samples: HashMap<String, [f64; 3]>,
    failures: HashSet<(String, Dimension)>,
    hanging: HashSet<String>,
    calls: Mutex<Vec<(String, Dimension)>>,
}

impl StaticMetrics {
    pub fn new() -> Self {
        Self::with_queries(CapacityQueries::default())
    }

    pub fn with_queries(queries: CapacityQueries) -> Self {
        Self {
            queries,
            samples: HashMap::new(),
            failures: HashSet::new(),
            hanging: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sample(mut self, cluster_id: &str, cpu: f64, memory: f64, pods: f64) -> Self {
        self.samples
            .insert(cluster_id.to_string(), [cpu, memory, pods]);
        self
    }

    /// Answer the given dimension with an ambiguous result.
    pub fn with_failure(mut self, cluster_id: &str, dimension: Dimension) -> Self {
        self.failures.insert((cluster_id.to_string(), dimension));
        self
    }

    /// Never answer queries for the cluster.
    pub fn with_hanging(mut self, cluster_id: &str) -> Self {
        self.hanging.insert(cluster_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, Dimension)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSource for StaticMetrics {
    async fn query(&self, cluster_id: &str, query: &str) -> Result<f64, metrics::Error> {
        let dimension = Dimension::iter()
            .find(|d| self.queries.get(*d) == query)
            .ok_or(metrics::Error::MissingParameter)?;
        self.calls
            .lock()
            .unwrap()
            .push((cluster_id.to_string(), dimension));

        if self.hanging.contains(cluster_id) {
            std::future::pending::<()>().await;
        }
        if self
            .failures
            .contains(&(cluster_id.to_string(), dimension))
        {
            return Err(metrics::Error::AmbiguousResult { rows: 2 });
        }

        let sample = self
            .samples
            .get(cluster_id)
            .ok_or_else(|| metrics::Error::UnknownCluster {
                cluster_id: cluster_id.to_string(),
            })?;
        Ok(match dimension {
            Dimension::CpuRequests => sample[0],
            Dimension::MemoryRequests => sample[1],
            Dimension::PodCapacity => sample[2],
        })
    }
}
