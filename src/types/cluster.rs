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

/// An OpenShift cluster the portal can place workloads on.
///
/// Loaded once from the `openshift` section of the configuration file.
/// Secrets are accepted on input but never serialized back out.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Cluster {
    pub id: String,

    pub name: String,

    /// Clusters tagged with a group (e.g. `Private`, `Deprecated`) are not
    /// considered when recommending a cluster.
    #[serde(
        default,
        alias = "optgroup",
        skip_serializing_if = "Option::is_none"
    )]
    pub exclusion_group: Option<String>,

    /// OpenShift API server, e.g. `https://api.example:6443`.
    pub url: String,

    #[serde(default, skip_serializing)]
    pub token: String,

    /// Query Prometheus here instead of discovering the `prometheus-k8s` route.
    #[serde(default, skip_serializing)]
    pub prometheus_url: Option<String>,

    #[serde(default = "default_insecure", skip_serializing)]
    pub insecure_skip_tls_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gluster_api: Option<StorageApi>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs_api: Option<StorageApi>,

    /// Set on the per-request copy of the cluster list by a recommendation run.
    #[serde(default, skip_deserializing)]
    pub recommended: bool,
}

/// Storage provisioning endpoint attached to a cluster.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct StorageApi {
    pub url: String,

    #[serde(default, skip_serializing)]
    pub secret: String,
}

fn default_insecure() -> bool {
    true
}

impl Cluster {
    /// Whether the cluster takes part in recommendation runs.
    pub fn is_eligible(&self) -> bool {
        self.exclusion_group
            .as_deref()
            .is_none_or(|group| group.is_empty())
    }

    /// Environment variable that may carry this cluster's token.
    pub fn token_env_key(&self) -> String {
        let id: String = self
            .id
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        format!("SSP_OPENSHIFT_{}_TOKEN", id)
    }
}

/// Storage features available on a cluster.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    pub nfs: bool,
    pub gluster: bool,
}

impl From<&Cluster> for Features {
    fn from(cluster: &Cluster) -> Self {
        Self {
            nfs: cluster.nfs_api.is_some(),
            gluster: cluster.gluster_api.is_some(),
        }
    }
}
