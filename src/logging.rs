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

//! Process-wide tracing subscriber.

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

pub type LogHandle = reload::Handle<EnvFilter, Registry>;

/// Filter directive: `RUST_LOG` wins over the `debug` setting.
fn filter_directive(debug: bool, rust_log: Option<String>) -> String {
    match rust_log.filter(|v| !v.is_empty()) {
        Some(directive) => directive,
        None if debug => "debug".to_string(),
        None => "info".to_string(),
    }
}

/// Install the global fmt subscriber before anything logs.
///
/// The filter can be raised later with [`apply_debug`] once the
/// configuration is known.
pub fn init_tracing() -> LogHandle {
    let directive = filter_directive(false, std::env::var("RUST_LOG").ok());
    let (filter, handle) = reload::Layer::new(EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    handle
}

pub fn apply_debug(handle: &LogHandle, debug: bool) {
    let directive = filter_directive(debug, std::env::var("RUST_LOG").ok());
    if let Err(e) = handle.reload(EnvFilter::new(directive)) {
        tracing::warn!("cannot update log filter: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(false, None), "info");
        assert_eq!(filter_directive(true, None), "debug");
        assert_eq!(filter_directive(true, Some(String::new())), "debug");
        assert_eq!(
            filter_directive(true, Some("ssp=trace".to_string())),
            "ssp=trace"
        );
    }
}
