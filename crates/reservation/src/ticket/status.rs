//! Ticket status state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle stage of a ticket, or the outcome of its last change.
///
/// State transitions:
/// ```text
/// Confirmed ──► Modified ──► Cancelled
///     │                        ▲
///     └────────────────────────┘
///
/// Confirmed | Modified ──(no seat moved)──► Failed  (outcome only)
/// ```
///
/// `Failed` reports a modification that could not move any seat. It only
/// ever appears as the status of a `ModifyOutcome`; the stored ticket keeps
/// its previous status and can be modified again. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    /// Freshly reserved.
    #[default]
    Confirmed,

    /// At least one seat has been reassigned.
    Modified,

    /// A modification hit seat conflicts only. Reported in the outcome,
    /// never stored on the ticket.
    Failed,

    /// Cancelled; all seats released (terminal state).
    Cancelled,
}

impl TicketStatus {
    /// Returns true if seats can still be reassigned.
    pub fn can_modify(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the ticket can be cancelled.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Confirmed => "Confirmed",
            TicketStatus::Modified => "Modified",
            TicketStatus::Failed => "Failed",
            TicketStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_confirmed() {
        assert_eq!(TicketStatus::default(), TicketStatus::Confirmed);
    }

    #[test]
    fn test_only_cancelled_is_terminal() {
        assert!(!TicketStatus::Confirmed.is_terminal());
        assert!(!TicketStatus::Modified.is_terminal());
        assert!(!TicketStatus::Failed.is_terminal());
        assert!(TicketStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_failed_can_still_be_modified() {
        assert!(TicketStatus::Failed.can_modify());
        assert!(TicketStatus::Failed.can_cancel());
        assert!(!TicketStatus::Cancelled.can_modify());
        assert!(!TicketStatus::Cancelled.can_cancel());
    }

    #[test]
    fn test_display() {
        assert_eq!(TicketStatus::Confirmed.to_string(), "Confirmed");
        assert_eq!(TicketStatus::Modified.to_string(), "Modified");
        assert_eq!(TicketStatus::Failed.to_string(), "Failed");
        assert_eq!(TicketStatus::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TicketStatus::Modified).unwrap();
        assert_eq!(json, "\"Modified\"");
        let parsed: TicketStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TicketStatus::Modified);
    }
}
