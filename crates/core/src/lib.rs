// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod application;
mod apply;
mod command;
mod error;
mod event;
mod reassignment;
mod state;
mod sweep;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use application::apply_for_leave;
pub use apply::apply;
pub use command::{AdminDecision, Command, CoverDecision};
pub use error::CoreError;
pub use event::{LeaveEvent, LeaveSummary};
pub use reassignment::{rank_candidates, resolve_reassignment};
pub use state::{
    ApplicationContext, ApplicationResult, COVER_REQUEST_TTL, CandidateCheck,
    EXPIRED_COVER_RESPONSE, LeaveState, NewCoverRequest, NewLeave, NewReassignment,
    ReassignmentContext, ReassignmentResult, TransitionResult,
};
pub use sweep::select_stale_requests;
