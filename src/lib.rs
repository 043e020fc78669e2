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

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::console::models::cluster::CapacityResponse;
use crate::context::Context;

pub mod capacity;
pub mod config;
pub mod console;
pub mod context;
pub mod logging;
pub mod metrics;
pub mod types;

#[cfg(test)]
mod tests;

shadow_rs::shadow!(build);

pub use logging::{LogHandle, apply_debug, init_tracing};

pub async fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load(path).await?)
}

/// Serve the portal until Ctrl-C.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    console::server::run(config).await
}

/// Print every configured cluster and its eligibility.
pub fn check_config(config: &Config) {
    println!("port: {}", config.port);
    println!("metrics timeout: {}s", config.metrics_timeout_secs);
    for cluster in &config.clusters {
        let group = cluster.exclusion_group.as_deref().unwrap_or("-");
        println!(
            "{}\t{}\t{}\tgroup={}\teligible={}",
            cluster.id,
            cluster.name,
            cluster.url,
            group,
            cluster.is_eligible()
        );
    }
}

/// Run one recommendation and print the result as JSON.
pub async fn recommend(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let _ = rustls::crypto::ring::default_provider().install_default();
    let context = Context::new(config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let (clusters, recommendation) = context.recommend(&cancel).await?;
    let response = CapacityResponse::new(&clusters, &recommendation);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
