//! Assignment status transitions.
//!
//! ```text
//! pending --accept--> accepted --start--> in_progress --complete--> completed
//! pending --decline--> declined
//! accepted --decline--> declined   (only when the policy allows it)
//! ```
//!
//! Every persisted status change goes through [`AssignmentStatus::apply`];
//! [`AssignmentStatus::available_actions`] is what clients use to decide which
//! buttons to render.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::assignment::AssignmentStatus;
use crate::core::config::AssignmentConfig;

/// Action a responder performs on an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentAction {
    Accept,
    Start,
    Complete,
    Decline,
}

impl AssignmentAction {
    pub const ALL: [AssignmentAction; 4] = [
        AssignmentAction::Accept,
        AssignmentAction::Start,
        AssignmentAction::Complete,
        AssignmentAction::Decline,
    ];
}

impl std::fmt::Display for AssignmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentAction::Accept => write!(f, "accept"),
            AssignmentAction::Start => write!(f, "start"),
            AssignmentAction::Complete => write!(f, "complete"),
            AssignmentAction::Decline => write!(f, "decline"),
        }
    }
}

/// Knobs that change which transitions are legal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionPolicy {
    pub allow_decline_after_accept: bool,
}

impl From<&AssignmentConfig> for TransitionPolicy {
    fn from(config: &AssignmentConfig) -> Self {
        Self {
            allow_decline_after_accept: config.allow_decline_after_accept,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} an assignment that is {from}")]
pub struct TransitionError {
    pub from: AssignmentStatus,
    pub action: AssignmentAction,
}

impl AssignmentStatus {
    /// Status reached by performing `action` from `self`
    pub fn apply(
        self,
        action: AssignmentAction,
        policy: TransitionPolicy,
    ) -> Result<AssignmentStatus, TransitionError> {
        use AssignmentAction as A;
        use AssignmentStatus as S;

        match (self, action) {
            (S::Pending, A::Accept) => Ok(S::Accepted),
            (S::Accepted, A::Start) => Ok(S::InProgress),
            (S::InProgress, A::Complete) => Ok(S::Completed),
            (S::Pending, A::Decline) => Ok(S::Declined),
            (S::Accepted, A::Decline) if policy.allow_decline_after_accept => Ok(S::Declined),
            (from, action) => Err(TransitionError { from, action }),
        }
    }

    /// Actions that are legal from this status, in display order
    pub fn available_actions(self, policy: TransitionPolicy) -> Vec<AssignmentAction> {
        AssignmentAction::ALL
            .into_iter()
            .filter(|action| self.apply(*action, policy).is_ok())
            .collect()
    }
}
