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

use crate::capacity::{Recommendation, ScoredCluster};
use crate::types::cluster::Cluster;

/// 集群列表响应
#[derive(Debug, Serialize)]
pub struct ClusterListResponse {
    pub clusters: Vec<Cluster>,
}

/// 集群容量
#[derive(Debug, Serialize, PartialEq)]
pub struct ClusterCapacity {
    pub id: String,
    pub name: String,
    pub excluded: bool,
    pub cpu_requests: Option<f64>,
    pub memory_requests: Option<f64>,
    pub pod_capacity: Option<f64>,
    pub score: Option<f64>,
    pub recommended: bool,
}

/// 容量推荐响应
///
/// `message` carries the recommended cluster id.
#[derive(Debug, Serialize)]
pub struct CapacityResponse {
    pub message: String,
    pub clusters: Vec<ClusterCapacity>,
}

impl CapacityResponse {
    pub fn new(clusters: &[Cluster], recommendation: &Recommendation) -> Self {
        let capacity = clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| {
                let scored: Option<&ScoredCluster> =
                    recommendation.scored.iter().find(|s| s.index == index);
                ClusterCapacity {
                    id: cluster.id.clone(),
                    name: cluster.name.clone(),
                    excluded: !cluster.is_eligible(),
                    cpu_requests: scored.map(|s| s.sample.cpu_requests),
                    memory_requests: scored.map(|s| s.sample.memory_requests),
                    pod_capacity: scored.map(|s| s.sample.pod_capacity),
                    score: scored.map(|s| s.score),
                    recommended: cluster.recommended,
                }
            })
            .collect();

        Self {
            message: recommendation.cluster_id.clone(),
            clusters: capacity,
        }
    }
}

/// 功能开关查询参数
#[derive(Debug, Deserialize)]
pub struct FeaturesQuery {
    pub clusterid: Option<String>,
}
