//! Dispatch lifecycle of an emergency call.
//!
//! ```text
//! pending -> assigned -> en_route -> at_scene -> transporting -> completed
//!    \__________\___________\___________\_____________\______-> cancelled
//! ```
//!
//! Every change of `CallStatus` goes through [`CallStatus::apply`], which is
//! the whole transition table: anything it does not list is rejected.

use serde::{Deserialize, Serialize};

use crate::domain::a001_ambulance::aggregate::AmbulanceStatus;
use crate::string_enum;

string_enum! {
    pub enum CallStatus {
        Pending => ("pending", "Pending"),
        Assigned => ("assigned", "Assigned"),
        EnRoute => ("en_route", "En Route"),
        AtScene => ("at_scene", "At Scene"),
        Transporting => ("transporting", "Transporting"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

string_enum! {
    /// Something a dispatcher or crew does to a call
    pub enum CallAction {
        Assign => ("assign", "Assign ambulance"),
        Depart => ("depart", "Depart"),
        Arrive => ("arrive", "Arrive at scene"),
        BeginTransport => ("begin_transport", "Begin transport"),
        Complete => ("complete", "Complete"),
        Cancel => ("cancel", "Cancel"),
    }
}

impl CallStatus {
    /// `completed` and `cancelled` accept no further action
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Completed | CallStatus::Cancelled)
    }

    /// Status after `action`, or the reason it is not allowed
    pub fn apply(self, action: CallAction) -> Result<CallStatus, TransitionError> {
        use CallAction as A;
        use CallStatus as S;

        let next = match (self, action) {
            (S::Pending, A::Assign) => S::Assigned,
            (S::Assigned, A::Depart) => S::EnRoute,
            (S::EnRoute, A::Arrive) => S::AtScene,
            (S::AtScene, A::BeginTransport) => S::Transporting,
            (S::Transporting, A::Complete) => S::Completed,
            (from, A::Cancel) if !from.is_terminal() => S::Cancelled,
            (from, action) => return Err(TransitionError { from, action }),
        };
        Ok(next)
    }

    pub fn can(&self, action: CallAction) -> bool {
        self.apply(action).is_ok()
    }

    /// Actions the UI may offer for a call in this status
    pub fn allowed_actions(&self) -> Vec<CallAction> {
        CallAction::all()
            .iter()
            .copied()
            .filter(|action| self.can(*action))
            .collect()
    }

    /// Whether a call in this status holds on to its ambulance
    pub fn is_active(&self) -> bool {
        !matches!(self, CallStatus::Pending) && !self.is_terminal()
    }
}

impl CallAction {
    /// The status this action leads to
    pub fn target(&self) -> CallStatus {
        match self {
            CallAction::Assign => CallStatus::Assigned,
            CallAction::Depart => CallStatus::EnRoute,
            CallAction::Arrive => CallStatus::AtScene,
            CallAction::BeginTransport => CallStatus::Transporting,
            CallAction::Complete => CallStatus::Completed,
            CallAction::Cancel => CallStatus::Cancelled,
        }
    }

    /// Action that leads to `target`. `pending` is never a target.
    pub fn toward(target: CallStatus) -> Option<CallAction> {
        CallAction::all()
            .iter()
            .copied()
            .find(|action| action.target() == target)
    }
}

/// Ambulance status that follows from its call reaching `status`.
///
/// Terminal statuses are not mirrored; see [`ReleasePolicy`].
pub fn mirrored_ambulance_status(status: CallStatus) -> Option<AmbulanceStatus> {
    match status {
        CallStatus::Assigned => Some(AmbulanceStatus::Assigned),
        CallStatus::EnRoute => Some(AmbulanceStatus::EnRoute),
        CallStatus::AtScene => Some(AmbulanceStatus::AtScene),
        CallStatus::Transporting => Some(AmbulanceStatus::Transporting),
        CallStatus::Pending | CallStatus::Completed | CallStatus::Cancelled => None,
    }
}

/// What happens to the ambulance when its call ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleasePolicy {
    /// Completed or cancelled calls put the ambulance back to `available`
    #[default]
    Automatic,
    /// The ambulance keeps its last status until a dispatcher resets it
    Manual,
}

impl ReleasePolicy {
    /// New ambulance status after its call moved to `status`, if any
    pub fn ambulance_status_for(&self, status: CallStatus) -> Option<AmbulanceStatus> {
        match mirrored_ambulance_status(status) {
            Some(mirrored) => Some(mirrored),
            None if status.is_terminal() && *self == ReleasePolicy::Automatic => {
                Some(AmbulanceStatus::Available)
            }
            None => None,
        }
    }
}

/// Rejected transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionError {
    pub from: CallStatus,
    pub action: CallAction,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot move call from '{}' to '{}'",
            self.from,
            self.action.target()
        )
    }
}

impl std::error::Error for TransitionError {}
