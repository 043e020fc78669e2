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

//! Cluster capacity sampling and recommendation.

use snafu::Snafu;

use crate::metrics;

pub mod recommend;
pub mod sample;
pub mod score;

pub use recommend::{Recommendation, ScoredCluster, recommend};
pub use sample::{CapacityQueries, Dimension, UtilizationSample, sample};
pub use score::{LoadScore, score, weighted_load};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display(
        "sampling {} of cluster '{}' failed: {}",
        dimension,
        cluster_id,
        source
    ))]
    Collaborator {
        cluster_id: String,
        dimension: Dimension,
        source: metrics::Error,
    },

    #[snafu(display(
        "no cluster eligible for recommendation ({} configured)",
        configured
    ))]
    NoEligibleCluster { configured: usize },

    #[snafu(display("recommendation run was cancelled"))]
    Cancelled,
}
