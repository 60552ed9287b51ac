// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Swappable engine policies and the collaborators handlers depend on.

use leave_cover_domain::{AllotmentPolicy, CandidateRanker, StandardAllotment, WorkloadRanker};

use crate::notifications::NotificationDispatcher;

/// The pluggable rules of the engine.
pub struct LeavePolicies {
    /// Computes yearly allotments when a balance is created or reset.
    pub allotment: Box<dyn AllotmentPolicy>,
    /// Orders substitute cover candidates.
    pub ranker: Box<dyn CandidateRanker>,
}

impl Default for LeavePolicies {
    fn default() -> Self {
        Self {
            allotment: Box::new(StandardAllotment),
            ranker: Box::new(WorkloadRanker),
        }
    }
}

/// Policies plus the notification dispatcher, shared by every handler.
pub struct LeaveServices {
    /// The engine policies.
    pub policies: LeavePolicies,
    /// Delivers notifications for committed events.
    pub dispatcher: NotificationDispatcher,
}

impl LeaveServices {
    /// Bundles policies and a dispatcher.
    #[must_use]
    pub const fn new(policies: LeavePolicies, dispatcher: NotificationDispatcher) -> Self {
        Self {
            policies,
            dispatcher,
        }
    }
}
