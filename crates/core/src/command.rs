// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The cover employee's answer to a cover request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverDecision {
    /// Take over the applicant's duties.
    Accept,
    /// Refuse, with a reason shown to the applicant.
    Decline {
        /// Why cover was refused.
        reason: String,
    },
}

/// An administrator's decision on a leave awaiting review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminDecision {
    /// Approve the leave.
    Approve {
        /// Optional message to the applicant.
        response: Option<String>,
    },
    /// Decline the leave.
    Decline {
        /// Optional message to the applicant.
        response: Option<String>,
    },
}

/// A command represents user or system intent against an existing leave.
///
/// New applications go through [`crate::apply_for_leave`] and reassignment
/// resolution through [`crate::resolve_reassignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The named cover employee answers the cover request.
    RespondToCover {
        /// Accept or decline.
        decision: CoverDecision,
    },
    /// An administrator approves or declines a leave awaiting review.
    DecideLeave {
        /// Approve or decline.
        decision: AdminDecision,
    },
    /// The owning employee withdraws a pending leave.
    CancelLeave,
    /// The sweeper closes a cover request that outlived its TTL.
    ExpireCoverRequest,
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::RespondToCover {
                decision: CoverDecision::Accept,
            } => "AcceptCover",
            Self::RespondToCover {
                decision: CoverDecision::Decline { .. },
            } => "DeclineCover",
            Self::DecideLeave {
                decision: AdminDecision::Approve { .. },
            } => "ApproveLeave",
            Self::DecideLeave {
                decision: AdminDecision::Decline { .. },
            } => "DeclineLeave",
            Self::CancelLeave => "CancelLeave",
            Self::ExpireCoverRequest => "ExpireCoverRequest",
        }
    }
}
