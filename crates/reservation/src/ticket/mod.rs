//! Tickets, their commands, and the store holding them.

mod commands;
mod model;
mod status;
mod store;

pub use commands::{CancelTicket, ModifyTicket, PassengerDetails, ReserveTicket};
pub use model::{Passenger, Ticket};
pub(crate) use model::MSG_MODIFIED;
pub use status::TicketStatus;
pub use store::TicketStore;
