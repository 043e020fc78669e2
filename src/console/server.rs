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

use std::sync::Arc;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::console::{routes, state::AppState};
use crate::context::Context;

/// 启动 Console HTTP Server
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let port = config.port;
    let cors = cors_layer(&config.allowed_origins)?;
    let context = Arc::new(Context::new(config)?);

    tracing::info!("Starting self-service portal on port {}", port);

    let shutdown = CancellationToken::new();
    let state = AppState::new(context, shutdown.clone());
    let app = router(state).layer(cors);

    // 启动服务器
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Portal listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  - GET  /api/v1/ose/clusters/capacity");
    tracing::info!("  - GET  /api/v1/ose/clusters");
    tracing::info!("  - GET  /api/v1/ose/features?clusterid=");
    tracing::info!("  - GET  /healthz");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Portal stopped");
    Ok(())
}

/// 构建应用路由 (不含 CORS)
pub fn router(state: AppState) -> Router {
    Router::new()
        // 健康检查 (无需认证)
        .route("/healthz", get(health_check))
        .route("/readyz", get(ready_check))
        .route("/version", get(version))
        // API v1 路由 (需要认证)
        .nest(
            "/api/v1",
            api_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                crate::console::middleware::auth::auth_middleware,
            )),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

/// API 路由组合
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(routes::auth_routes())
        .merge(routes::cluster_routes())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::OPTIONS]);

    if origins.is_empty() {
        return Ok(layer.allow_origin(Any).allow_headers(Any));
    }

    let origins = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true))
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("shutdown signal received, cancelling in-flight recommendations");
    shutdown.cancel();
}

/// 健康检查
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 就绪检查
async fn ready_check() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}

#[derive(Serialize)]
struct VersionResponse {
    version: &'static str,
    commit: &'static str,
    build_time: &'static str,
    rust_version: &'static str,
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: crate::build::PKG_VERSION,
        commit: crate::build::SHORT_COMMIT,
        build_time: crate::build::BUILD_TIME,
        rust_version: crate::build::RUST_VERSION,
    })
}
