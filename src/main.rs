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

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ssp::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "ssp")]
#[command(version = ssp::build::PKG_VERSION)]
#[command(about = "Self-service portal backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Server {
        #[arg(short, long, env = "SSP_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Validate the configuration and list the clusters
    CheckConfig {
        #[arg(short, long, env = "SSP_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Sample all clusters once and print the recommendation
    Recommend {
        #[arg(short, long, env = "SSP_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let log = ssp::init_tracing();

    match cli.command {
        Commands::Server { config } => {
            let config = ssp::load_config(&config).await?;
            ssp::apply_debug(&log, config.debug);
            ssp::run(config).await?;
        }
        Commands::CheckConfig { config } => {
            let config = ssp::load_config(&config).await?;
            ssp::check_config(&config);
        }
        Commands::Recommend { config } => {
            let config = ssp::load_config(&config).await?;
            ssp::apply_debug(&log, config.debug);
            ssp::recommend(config).await?;
        }
    }

    Ok(())
}
