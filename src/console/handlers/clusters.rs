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

use axum::{
    Json,
    extract::{Query, State},
};
use snafu::OptionExt;

use crate::console::{
    error::{self, Result},
    models::cluster::{ClusterListResponse, FeaturesQuery},
    state::AppState,
};
use crate::types::cluster::Features;

/// 列出所有集群
pub async fn list_clusters(State(state): State<AppState>) -> Json<ClusterListResponse> {
    Json(ClusterListResponse {
        clusters: state.context.clusters(),
    })
}

/// 查询集群支持的存储功能
pub async fn features(
    State(state): State<AppState>,
    Query(query): Query<FeaturesQuery>,
) -> Result<Json<Features>> {
    let cluster_id = query
        .clusterid
        .filter(|id| !id.is_empty())
        .context(error::BadRequestSnafu {
            message: "Missing query parameter 'clusterid'",
        })?;

    let cluster = state
        .context
        .cluster(&cluster_id)
        .context(error::NotFoundSnafu {
            resource: format!("cluster {}", cluster_id),
        })?;

    Ok(Json(Features::from(cluster)))
}
