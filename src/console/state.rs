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

use tokio_util::sync::CancellationToken;

use crate::context::Context;

/// Console 应用状态
#[derive(Clone)]
pub struct AppState {
    /// JWT 签名密钥
    pub jwt_secret: Arc<String>,
    pub context: Arc<Context>,
    /// Cancelled when the server shuts down; request-scoped runs derive from it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(context: Arc<Context>, shutdown: CancellationToken) -> Self {
        Self {
            jwt_secret: Arc::new(context.config().jwt_secret.clone()),
            context,
            shutdown,
        }
    }
}

/// JWT Claims issued by the portal's identity provider
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Token 过期时间 (Unix timestamp)
    pub exp: usize,
    /// Token 签发时间
    #[serde(default)]
    pub iat: usize,
}

#[cfg(test)]
impl Claims {
    pub fn new(sub: impl Into<String>, ttl_secs: usize) -> Self {
        let now = chrono::Utc::now().timestamp() as usize;
        Self {
            sub: sub.into(),
            mail: None,
            iat: now,
            exp: now + ttl_secs,
        }
    }
}
