//! Ticket commands.

use common::{Seat, Section, TicketId};

use crate::grid::SeatPreference;

/// Contact details of one passenger plus an optional seat wish.
#[derive(Debug, Clone, Default)]
pub struct PassengerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub preference: SeatPreference,
}

impl PassengerDetails {
    /// Creates passenger details with no seat preference.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            address: address.into(),
            preference: SeatPreference::any(),
        }
    }

    /// Sets a preferred seat.
    pub fn with_seat(mut self, section: Section, index: u32) -> Self {
        self.preference = SeatPreference::seat(section, index);
        self
    }

    /// Sets a full preference, which may be partial.
    pub fn with_preference(mut self, preference: SeatPreference) -> Self {
        self.preference = preference;
        self
    }
}

/// Command to book a new ticket.
#[derive(Debug, Clone)]
pub struct ReserveTicket {
    /// Departure station code.
    pub from_code: String,

    /// Arrival station code.
    pub to_code: String,

    /// Amount paid, recorded as given.
    pub price_paid: u64,

    /// Passengers, each receiving one seat.
    pub passengers: Vec<PassengerDetails>,
}

impl ReserveTicket {
    /// Creates a new ReserveTicket command.
    pub fn new(
        from_code: impl Into<String>,
        to_code: impl Into<String>,
        price_paid: u64,
        passengers: Vec<PassengerDetails>,
    ) -> Self {
        Self {
            from_code: from_code.into(),
            to_code: to_code.into(),
            price_paid,
            passengers,
        }
    }
}

/// Command to reassign seats on an existing ticket.
#[derive(Debug, Clone, Default)]
pub struct ModifyTicket {
    /// The ticket to modify. Required.
    pub ticket_id: Option<TicketId>,

    /// Requested seat per passenger position; `None` leaves that passenger
    /// where they are.
    pub seats: Vec<Option<Seat>>,
}

impl ModifyTicket {
    /// Creates a new ModifyTicket command.
    pub fn new(ticket_id: TicketId, seats: Vec<Option<Seat>>) -> Self {
        Self {
            ticket_id: Some(ticket_id),
            seats,
        }
    }

    /// Moves only the first passenger.
    pub fn single(ticket_id: TicketId, seat: Seat) -> Self {
        Self::new(ticket_id, vec![Some(seat)])
    }
}

/// Command to cancel a ticket.
#[derive(Debug, Clone, Default)]
pub struct CancelTicket {
    /// The ticket to cancel. Required.
    pub ticket_id: Option<TicketId>,
}

impl CancelTicket {
    /// Creates a new CancelTicket command.
    pub fn new(ticket_id: TicketId) -> Self {
        Self {
            ticket_id: Some(ticket_id),
        }
    }
}
