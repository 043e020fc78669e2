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
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::console::error::Error;
use crate::console::state::{AppState, Claims};

/// JWT 认证中间件
///
/// 从 Authorization 头 (或 session Cookie) 中提取 JWT Token,验证后将 Claims 注入到请求扩展中
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = extract_token(request.headers()).ok_or_else(|| Error::Unauthorized {
        message: "Missing bearer token".to_string(),
    })?;

    // 验证 JWT
    let claims = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        Error::Unauthorized {
            message: "Invalid or expired token".to_string(),
        }
    })?
    .claims;

    // 检查过期时间
    let now = chrono::Utc::now().timestamp() as usize;
    if claims.exp < now {
        tracing::warn!("Token expired");
        return Err(Error::Unauthorized {
            message: "Invalid or expired token".to_string(),
        });
    }

    // 将 Claims 注入请求扩展
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        let cookies = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        parse_session_cookie(cookies)
    })
}

/// 从 Cookie 字符串中解析 session token
fn parse_session_cookie(cookies: &str) -> Option<String> {
    cookies.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == "session" && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_session_cookie() {
        let cookies = "session=test_token; other=value";
        assert_eq!(parse_session_cookie(cookies), Some("test_token".to_string()));

        let cookies = "other=value";
        assert_eq!(parse_session_cookie(cookies), None);

        assert_eq!(parse_session_cookie("session="), None);
    }

    #[test]
    fn test_bearer_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=cookie-token"));
        assert_eq!(extract_token(&headers), Some("abc.def".to_string()));

        headers.remove(header::AUTHORIZATION);
        assert_eq!(extract_token(&headers), Some("cookie-token".to_string()));
    }

    #[test]
    fn test_non_bearer_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_token(&headers), None);
    }
}
