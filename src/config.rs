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

//! Portal configuration, loaded and validated once at startup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use snafu::{ResultExt, Snafu, ensure};
use tracing::{info, warn};

use crate::capacity::CapacityQueries;
use crate::types::cluster::Cluster;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("cannot read configuration file {}: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("cannot parse configuration: {}", source))]
    Parse { source: serde_yaml_ng::Error },

    #[snafu(display("invalid value '{}' for environment variable {}", value, key))]
    InvalidEnv { key: String, value: String },

    #[snafu(display("configuration field '{}' must be set", field))]
    MissingField { field: String },

    #[snafu(display("invalid value '{}' for configuration field '{}'", value, field))]
    InvalidField { field: String, value: String },

    #[snafu(display("no openshift clusters configured"))]
    NoClusters,

    #[snafu(display("openshift cluster #{} has no '{}'", position, field))]
    MissingClusterField { position: usize, field: String },

    #[snafu(display("openshift cluster '{}' is configured more than once", id))]
    DuplicateCluster { id: String },
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub debug: bool,

    /// HS256 secret used to verify bearer tokens.
    #[serde(default)]
    pub jwt_secret: String,

    /// CORS origins. Empty allows any origin without credentials.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_metrics_timeout_secs")]
    pub metrics_timeout_secs: u64,

    #[serde(default)]
    pub capacity: CapacityQueries,

    #[serde(default, rename = "openshift")]
    pub clusters: Vec<Cluster>,
}

fn default_port() -> u16 {
    8000
}

fn default_metrics_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            debug: false,
            jwt_secret: String::new(),
            allowed_origins: Vec::new(),
            metrics_timeout_secs: default_metrics_timeout_secs(),
            capacity: CapacityQueries::default(),
            clusters: Vec::new(),
        }
    }
}

impl Config {
    /// Read the file, apply `SSP_*` environment overrides and validate.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .context(ReadSnafu { path })?;

        let mut config = Self::from_yaml(&raw)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            "loaded configuration from {} ({} openshift clusters)",
            path.display(),
            config.clusters.len()
        );
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, Error> {
        serde_yaml_ng::from_str(raw).context(ParseSnafu)
    }

    /// Override settings from the environment. `lookup` returns the value of
    /// a variable if it is set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SSP_PORT") {
            self.port = parse_env("SSP_PORT", value)?;
        }
        if let Some(value) = lookup("SSP_DEBUG") {
            self.debug = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return InvalidEnvSnafu {
                        key: "SSP_DEBUG",
                        value,
                    }
                    .fail();
                }
            };
        }
        if let Some(value) = lookup("SSP_JWT_SECRET") {
            self.jwt_secret = value;
        }
        if let Some(value) = lookup("SSP_METRICS_TIMEOUT_SECS") {
            self.metrics_timeout_secs = parse_env("SSP_METRICS_TIMEOUT_SECS", value)?;
        }

        for cluster in &mut self.clusters {
            if let Some(token) = lookup(&cluster.token_env_key()) {
                if !cluster.token.is_empty() {
                    warn!(
                        "token of cluster {} is overridden by {}",
                        cluster.id,
                        cluster.token_env_key()
                    );
                }
                cluster.token = token;
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), Error> {
        ensure!(
            !self.jwt_secret.is_empty(),
            MissingFieldSnafu {
                field: "jwt_secret"
            }
        );
        ensure!(
            self.metrics_timeout_secs > 0,
            InvalidFieldSnafu {
                field: "metrics_timeout_secs",
                value: self.metrics_timeout_secs.to_string(),
            }
        );
        for origin in &self.allowed_origins {
            ensure!(
                origin.parse::<http::HeaderValue>().is_ok(),
                InvalidFieldSnafu {
                    field: "allowed_origins",
                    value: origin,
                }
            );
        }

        ensure!(!self.clusters.is_empty(), NoClustersSnafu);

        let mut seen = HashSet::new();
        for (position, cluster) in self.clusters.iter().enumerate() {
            for (field, value) in [
                ("id", &cluster.id),
                ("name", &cluster.name),
                ("url", &cluster.url),
                ("token", &cluster.token),
            ] {
                ensure!(
                    !value.is_empty(),
                    MissingClusterFieldSnafu { position, field }
                );
            }

            ensure!(
                reqwest::Url::parse(&cluster.url).is_ok(),
                InvalidFieldSnafu {
                    field: format!("openshift.{}.url", cluster.id),
                    value: &cluster.url,
                }
            );
            if let Some(url) = &cluster.prometheus_url {
                ensure!(
                    reqwest::Url::parse(url).is_ok(),
                    InvalidFieldSnafu {
                        field: format!("openshift.{}.prometheus_url", cluster.id),
                        value: url,
                    }
                );
            }

            ensure!(
                seen.insert(cluster.id.as_str()),
                DuplicateClusterSnafu { id: &cluster.id }
            );
        }

        Ok(())
    }

    pub fn metrics_timeout(&self) -> Duration {
        Duration::from_secs(self.metrics_timeout_secs)
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, Error> {
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => InvalidEnvSnafu { key, value }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const SAMPLE: &str = r#"
port: 9000
jwt_secret: very-secret
capacity:
  pod_capacity: count(kube_pod_info) / 250
openshift:
  - id: awsdev
    name: AWS Dev
    url: https://api.awsdev.example:6443
    token: aws-token
  - id: vias-prod
    name: Vias Prod
    url: https://api.vias.example:6443
    token: vias-token
    optgroup: Private
    prometheus_url: https://prometheus.vias.example
    insecure_skip_tls_verify: false
    gluster_api:
      url: https://gluster.vias.example
      secret: gluster-secret
"#;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_sample_config() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.port, 9000);
        assert!(!config.debug);
        assert_eq!(config.metrics_timeout(), Duration::from_secs(30));
        assert_eq!(config.clusters.len(), 2);
        assert_eq!(config.capacity.pod_capacity, "count(kube_pod_info) / 250");
        assert_eq!(
            config.capacity.cpu_requests,
            CapacityQueries::default().cpu_requests
        );

        let vias = config.cluster("vias-prod").unwrap();
        assert_eq!(vias.exclusion_group.as_deref(), Some("Private"));
        assert!(!vias.insecure_skip_tls_verify);
        assert!(vias.gluster_api.is_some());
        assert_eq!(vias.token, "vias-token");
        assert!(config.cluster("unknown").is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config
            .apply_env(env(&[
                ("SSP_PORT", "8080"),
                ("SSP_DEBUG", "true"),
                ("SSP_JWT_SECRET", "from-env"),
                ("SSP_METRICS_TIMEOUT_SECS", "5"),
                ("SSP_OPENSHIFT_VIAS_PROD_TOKEN", "vias-env-token"),
            ]))
            .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.debug);
        assert_eq!(config.jwt_secret, "from-env");
        assert_eq!(config.metrics_timeout(), Duration::from_secs(5));
        assert_eq!(config.cluster("vias-prod").unwrap().token, "vias-env-token");
        assert_eq!(config.cluster("awsdev").unwrap().token, "aws-token");
        config.validate().unwrap();
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        let err = config.apply_env(env(&[("SSP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { key, .. } if key == "SSP_PORT"));

        let err = config.apply_env(env(&[("SSP_DEBUG", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { key, .. } if key == "SSP_DEBUG"));
    }

    #[test]
    fn test_missing_jwt_secret() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config.jwt_secret.clear();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingField { field } if field == "jwt_secret"
        ));
    }

    #[test]
    fn test_no_clusters() {
        let config = Config::from_yaml("jwt_secret: s\n").unwrap();
        assert!(matches!(config.validate().unwrap_err(), Error::NoClusters));
    }

    #[test]
    fn test_cluster_without_token() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config.clusters[1].token.clear();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingClusterField { position: 1, field } if field == "token"
        ));
    }

    #[test]
    fn test_duplicate_cluster_ids() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config.clusters[1].id = "awsdev".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::DuplicateCluster { id } if id == "awsdev"
        ));
    }

    #[test]
    fn test_invalid_urls() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config.clusters[0].url = "api.awsdev".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidField { field, .. } if field == "openshift.awsdev.url"
        ));

        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config.clusters[1].prometheus_url = Some("::".to_string());
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidField { field, .. } if field == "openshift.vias-prod.prometheus_url"
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = Config::from_yaml(SAMPLE).unwrap();
        config.metrics_timeout_secs = 0;
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidField { field, .. } if field == "metrics_timeout_secs"
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            Config::from_yaml("openshift: [ {id: ").unwrap_err(),
            Error::Parse { .. }
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.clusters[0].id, "awsdev");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/ssp/config.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
