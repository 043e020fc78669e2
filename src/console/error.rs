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
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;

use crate::capacity;

/// Shown to users whenever a proxied platform call fails.
pub const GENERIC_API_ERROR: &str = "Error calling the OpenShift API. Please open a ticket";

/// Console API 错误类型
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unauthorized: {}", message))]
    Unauthorized { message: String },

    #[snafu(display("Not found: {}", resource))]
    NotFound { resource: String },

    #[snafu(display("Bad request: {}", message))]
    BadRequest { message: String },

    #[snafu(display("Cluster capacity error: {}", source))]
    Capacity { source: capacity::Error },
}

/// API 错误响应格式
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", message.clone())
            }
            Error::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("Resource not found: {}", resource),
            ),
            Error::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BadRequest", message.clone())
            }
            Error::Capacity { source } => {
                // the cause may name internal endpoints, keep it in the log
                tracing::error!("cluster capacity request failed: {}", source);
                let status = match source {
                    capacity::Error::Collaborator { .. } => StatusCode::BAD_GATEWAY,
                    capacity::Error::NoEligibleCluster { .. } => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    capacity::Error::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, "ProxyError", GENERIC_API_ERROR.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type for Console API
pub type Result<T> = std::result::Result<T, Error>;
