//! Seat allocation and ticket lifecycle for train reservations.
//!
//! This crate provides:
//! - `SeatGrid`: seat ownership table and the allocation algorithm
//! - `TicketCounter` and `TicketStore`: ID issuing and ticket records
//! - `ReservationEngine`: reserve, modify, cancel and list, serialized
//!   behind one lock

pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod grid;
pub mod ticket;

pub use common::{ParseSectionError, Seat, Section, TicketId};
pub use config::InventoryConfig;
pub use counter::TicketCounter;
pub use engine::{ModifyOutcome, ReservationEngine, ReservationState, SeatChange};
pub use error::{ErrorKind, ReservationError, Result};
pub use grid::{SeatGrid, SeatMap, SeatPreference, SectionMap};
pub use ticket::{
    CancelTicket, ModifyTicket, Passenger, PassengerDetails, ReserveTicket, Ticket, TicketStatus,
    TicketStore,
};
