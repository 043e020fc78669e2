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

use serde::Serialize;

/// 会话检查响应
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub valid: bool,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    pub expires_at: Option<String>,
}
