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

use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind};
use kube::Client;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use super::{Error, KubeClientSnafu, MissingRouteHostSnafu, RouteSnafu};
use crate::types::cluster::Cluster;

pub const MONITORING_NAMESPACE: &str = "openshift-monitoring";
pub const PROMETHEUS_ROUTE: &str = "prometheus-k8s";

#[derive(Deserialize, Debug, Default)]
struct RouteBody {
    #[serde(default)]
    spec: Option<RouteSpec>,
}

#[derive(Deserialize, Debug, Default)]
struct RouteSpec {
    #[serde(default)]
    host: Option<String>,
}

fn route_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk("route.openshift.io", "v1", "Route");
    ApiResource::from_gvk_with_plural(&gvk, "routes")
}

/// Host of the cluster monitoring Prometheus, read from its OpenShift route.
pub async fn prometheus_host(cluster: &Cluster) -> Result<String, Error> {
    let client = create_client(cluster)?;
    let api: Api<DynamicObject> =
        Api::namespaced_with(client, MONITORING_NAMESPACE, &route_resource());

    let route = api.get(PROMETHEUS_ROUTE).await.context(RouteSnafu)?;
    let host = route_host(&route)?;
    debug!("cluster {} prometheus route host: {}", cluster.id, host);

    Ok(host)
}

fn route_host(route: &DynamicObject) -> Result<String, Error> {
    serde_json::from_value::<RouteBody>(route.data.clone())
        .ok()
        .and_then(|body| body.spec)
        .and_then(|spec| spec.host)
        .filter(|host| !host.is_empty())
        .context(MissingRouteHostSnafu)
}

/// Kubernetes client authenticated with the cluster's service token.
fn create_client(cluster: &Cluster) -> Result<Client, Error> {
    let uri = cluster
        .url
        .parse::<http::Uri>()
        .map_err(|_| Error::InvalidEndpoint {
            cluster_id: cluster.id.clone(),
            endpoint: cluster.url.clone(),
        })?;

    let mut config = kube::Config::new(uri);
    config.auth_info.token = Some(cluster.token.clone().into());
    config.accept_invalid_certs = cluster.insecure_skip_tls_verify;

    Client::try_from(config).context(KubeClientSnafu)
}
