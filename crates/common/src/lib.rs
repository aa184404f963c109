//! Shared types for the train reservation system.

mod types;

pub use types::{ParseSectionError, Seat, Section, TicketId};
