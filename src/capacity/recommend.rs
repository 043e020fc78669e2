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

use serde::Serialize;
use snafu::OptionExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::sample::{CapacityQueries, UtilizationSample, sample};
use super::score::LoadScore;
use super::{CancelledSnafu, Error, NoEligibleClusterSnafu};
use crate::metrics::MetricsSource;
use crate::types::cluster::Cluster;

/// A cluster that took part in a recommendation run.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScoredCluster {
    /// Position in the cluster list passed to [`recommend`].
    pub index: usize,
    pub id: String,
    pub sample: UtilizationSample,
    pub score: LoadScore,
}

/// Outcome of a successful recommendation run.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Recommendation {
    /// Position of the winner in the cluster list passed to [`recommend`].
    pub index: usize,
    pub cluster_id: String,
    pub score: LoadScore,
    /// Every sampled cluster, in input order.
    pub scored: Vec<ScoredCluster>,
}

/// Pick the least loaded eligible cluster and mark it as recommended.
///
/// Clusters with an exclusion group are skipped without being sampled.
/// Sampling happens in input order and the first failure aborts the run.
/// The first scored cluster seeds the running best; later clusters only
/// replace it with a strictly lower score. On any error no cluster is left
/// marked.
pub async fn recommend(
    clusters: &mut [Cluster],
    source: &dyn MetricsSource,
    queries: &CapacityQueries,
    cancel: &CancellationToken,
) -> Result<Recommendation, Error> {
    for cluster in clusters.iter_mut() {
        cluster.recommended = false;
    }

    let mut scored: Vec<ScoredCluster> = Vec::new();
    let mut best: Option<(usize, LoadScore)> = None;

    for (index, cluster) in clusters.iter().enumerate() {
        if !cluster.is_eligible() {
            debug!(
                "skipping cluster {} (exclusion group {:?})",
                cluster.id, cluster.exclusion_group
            );
            continue;
        }

        let sample = tokio::select! {
            biased;
            _ = cancel.cancelled() => return CancelledSnafu.fail(),
            result = sample(source, queries, cluster) => result?,
        };

        let score = sample.score();
        info!(
            "Cluster capacity {}: cpu: {} mem: {} pods: {} score: {}",
            cluster.id, sample.cpu_requests, sample.memory_requests, sample.pod_capacity, score
        );

        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((index, score));
        }
        scored.push(ScoredCluster {
            index,
            id: cluster.id.clone(),
            sample,
            score,
        });
    }

    let (index, score) = best.context(NoEligibleClusterSnafu {
        configured: clusters.len(),
    })?;

    let winner = &mut clusters[index];
    winner.recommended = true;
    info!("Recommended cluster {} with score {}", winner.id, score);

    Ok(Recommendation {
        index,
        cluster_id: winner.id.clone(),
        score,
        scored,
    })
}
