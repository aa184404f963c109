//! Reservation error types.

use common::{Section, TicketId};
use thiserror::Error;

/// Errors that can occur during reservation operations.
///
/// Seat conflicts during a modification are not errors; they are reported
/// in-band through [`crate::ModifyOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// A modify or cancel request did not carry a ticket ID.
    #[error("Ticket ID is required")]
    MissingTicketId,

    /// A reservation request listed no passengers.
    #[error("At least one passenger is required")]
    NoPassengers,

    /// A requested section does not exist in the seat grid.
    #[error("Unknown section: {0}")]
    UnknownSection(Section),

    /// A requested seat index is outside the section.
    #[error("Seat index {index} out of range (1..={max})")]
    SeatOutOfRange { index: u32, max: u32 },

    /// A seat change addressed a passenger the ticket does not have.
    #[error("Passenger {position} out of range: ticket has {count} passengers")]
    PassengerOutOfRange { position: usize, count: usize },

    /// The ticket ID does not resolve to a stored ticket.
    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// The ticket was cancelled and can no longer change.
    #[error("Ticket {0} is cancelled")]
    TicketCancelled(TicketId),

    /// Not enough free seats remain.
    #[error("No seats available: requested {requested}, available {available}")]
    CapacityExhausted { requested: usize, available: usize },

    /// The seat inventory shape is unusable.
    #[error("Invalid inventory: {0}")]
    InvalidInventory(String),
}

/// Broad classification of a [`ReservationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    CapacityExhausted,
}

impl ErrorKind {
    /// Returns a stable lowercase label, used for metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::FailedPrecondition => "failed_precondition",
            ErrorKind::CapacityExhausted => "capacity_exhausted",
        }
    }
}

impl ReservationError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReservationError::MissingTicketId
            | ReservationError::NoPassengers
            | ReservationError::UnknownSection(_)
            | ReservationError::SeatOutOfRange { .. }
            | ReservationError::PassengerOutOfRange { .. }
            | ReservationError::InvalidInventory(_) => ErrorKind::InvalidArgument,
            ReservationError::TicketNotFound(_) => ErrorKind::NotFound,
            ReservationError::TicketCancelled(_) => ErrorKind::FailedPrecondition,
            ReservationError::CapacityExhausted { .. } => ErrorKind::CapacityExhausted,
        }
    }
}

/// Result type for reservation operations.
pub type Result<T> = std::result::Result<T, ReservationError>;
