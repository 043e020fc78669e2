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

/// Load of a cluster, lower means more spare capacity.
pub type LoadScore = f64;

/// Slack applied before truncating to hundredths so that values such as
/// `0.09 + 0.14 = 0.22999999999999998` land on the intended step.
const TRUNCATE_TOLERANCE: f64 = 1e-9;

/// Reduce utilization fractions into one load value.
///
/// The most saturated dimension is squared. The headroom it leaves
/// (`1 - max`) is shared between the remaining dimensions in proportion to
/// their own saturation, and each of them adds `v * share`. The first
/// occurrence of the maximum is the one treated as "max"; every other
/// element, including an equal second maximum, is a remainder term.
///
/// Never panics. An empty slice yields `0.0`.
pub fn weighted_load(fractions: &[f64]) -> f64 {
    let Some((max_index, max)) = fractions
        .iter()
        .copied()
        .enumerate()
        .reduce(|best, item| if item.1 > best.1 { item } else { best })
    else {
        return 0.0;
    };

    let complement = 1.0 - max;
    let remainder_sum: f64 = fractions
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != max_index)
        .map(|(_, v)| v)
        .sum();

    let mut total = max * max;
    for (i, v) in fractions.iter().enumerate() {
        if i == max_index || remainder_sum == 0.0 {
            continue;
        }
        total += v * (v / remainder_sum * complement);
    }

    total
}

/// Load score of a set of fractions: [`weighted_load`] truncated to two
/// decimal places.
pub fn score(fractions: &[f64]) -> LoadScore {
    truncate_hundredths(weighted_load(fractions))
}

fn truncate_hundredths(value: f64) -> f64 {
    (value * 100.0 + TRUNCATE_TOLERANCE).floor() / 100.0
}
