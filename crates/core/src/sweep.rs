// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_cover_domain::CoverRequest;
use time::OffsetDateTime;

/// Selects the cover requests that the sweeper must expire at `now`.
///
/// A request is stale once it is still pending strictly after its expiry.
/// Running the sweep twice at the same instant selects nothing the second
/// time, because expired requests are no longer pending.
#[must_use]
pub fn select_stale_requests(requests: &[CoverRequest], now: OffsetDateTime) -> Vec<i64> {
    let mut stale: Vec<i64> = requests
        .iter()
        .filter(|request| request.is_stale_at(now))
        .map(|request| request.leave_id)
        .collect();
    stale.sort_unstable();
    stale.dedup();
    stale
}
