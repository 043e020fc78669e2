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

use axum::{Json, extract::State};
use snafu::ResultExt;

use crate::console::{
    error::{self, Result},
    models::cluster::CapacityResponse,
    state::AppState,
};

/// 推荐容量最充足的集群
///
/// Samples every eligible cluster and reports the least loaded one. A client
/// that disconnects drops the handler future, which cancels the run.
pub async fn cluster_capacity(State(state): State<AppState>) -> Result<Json<CapacityResponse>> {
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let (clusters, recommendation) = state
        .context
        .recommend(&cancel)
        .await
        .context(error::CapacitySnafu)?;

    tracing::info!(
        "recommending cluster {} with score {}",
        recommendation.cluster_id,
        recommendation.score
    );

    Ok(Json(CapacityResponse::new(&clusters, &recommendation)))
}
