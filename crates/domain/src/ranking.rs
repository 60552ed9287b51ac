// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ranking of substitute cover candidates.
//!
//! The ranking strategy is pluggable. [`WorkloadRanker`] is the default and
//! prefers the least-loaded colleague.

use serde::{Deserialize, Serialize};

/// Workload facts about a potential substitute cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverCandidate {
    /// The candidate employee.
    pub employee_id: i64,
    /// Display name.
    pub name: String,
    /// Cover requests awaiting this candidate's answer.
    pub pending_cover_requests: u32,
    /// Approved leaves this candidate is covering during the window.
    pub covering_duties: u32,
    /// Whether the candidate has an active leave overlapping the window.
    pub on_leave: bool,
}

impl CoverCandidate {
    /// Returns the raw workload score. Lower is preferred.
    #[must_use]
    pub const fn workload(&self) -> u32 {
        self.pending_cover_requests
            .saturating_add(self.covering_duties.saturating_mul(2))
    }
}

/// A candidate with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// The candidate.
    pub candidate: CoverCandidate,
    /// Whether an admin may pick this candidate.
    pub selectable: bool,
    /// 1-based rank.
    pub rank: u32,
}

/// Orders cover candidates for an admin to choose from.
pub trait CandidateRanker: Send + Sync {
    /// Ranks `candidates`. Unavailable candidates must be included but
    /// marked not selectable.
    fn rank(&self, candidates: Vec<CoverCandidate>) -> Vec<RankedCandidate>;
}

/// Ranks available candidates by ascending workload, then by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkloadRanker;

impl CandidateRanker for WorkloadRanker {
    fn rank(&self, mut candidates: Vec<CoverCandidate>) -> Vec<RankedCandidate> {
        candidates.sort_by_key(|candidate| {
            (candidate.on_leave, candidate.workload(), candidate.employee_id)
        });
        candidates
            .into_iter()
            .zip(1_u32..)
            .map(|(candidate, rank)| RankedCandidate {
                selectable: !candidate.on_leave,
                candidate,
                rank,
            })
            .collect()
    }
}
