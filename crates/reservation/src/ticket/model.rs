//! Ticket and passenger records.

use chrono::{DateTime, Utc};
use common::{Seat, TicketId};
use serde::{Deserialize, Serialize};

use super::{PassengerDetails, TicketStatus};

pub(crate) const MSG_BOOKED: &str = "Booked Successfully";
pub(crate) const MSG_MODIFIED: &str = "Modification Saved";
pub(crate) const MSG_CANCELLED: &str = "Ticket Cancelled";

/// A passenger on a ticket and the seat they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,

    /// `None` until allocated, and again after cancellation.
    pub seat: Option<Seat>,
}

impl Passenger {
    pub(crate) fn seated(details: PassengerDetails, seat: Seat) -> Self {
        Self {
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            address: details.address,
            seat: Some(seat),
        }
    }

    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A reservation covering one or more passengers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    from_code: String,
    to_code: String,
    price_paid: u64,
    passenger_count: usize,
    passengers: Vec<Passenger>,
    status: TicketStatus,

    /// Human-readable outcome of the last operation.
    message: String,

    booked_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// Query methods
impl Ticket {
    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn from_code(&self) -> &str {
        &self.from_code
    }

    pub fn to_code(&self) -> &str {
        &self.to_code
    }

    pub fn price_paid(&self) -> u64 {
        self.price_paid
    }

    pub fn passenger_count(&self) -> usize {
        self.passenger_count
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn booked_at(&self) -> DateTime<Utc> {
        self.booked_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the seats currently held, in passenger order.
    pub fn seats(&self) -> Vec<Seat> {
        self.passengers.iter().filter_map(|p| p.seat).collect()
    }

    /// Returns the seat held by the passenger at `position`.
    pub fn seat_of(&self, position: usize) -> Option<Seat> {
        self.passengers.get(position).and_then(|p| p.seat)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TicketStatus::Cancelled
    }
}

// Mutations, driven by the engine while it holds the lock
impl Ticket {
    pub(crate) fn confirmed(
        id: TicketId,
        from_code: String,
        to_code: String,
        price_paid: u64,
        passengers: Vec<Passenger>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            from_code,
            to_code,
            price_paid,
            passenger_count: passengers.len(),
            passengers,
            status: TicketStatus::Confirmed,
            message: MSG_BOOKED.to_string(),
            booked_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn assign_seat(&mut self, position: usize, seat: Seat) {
        if let Some(passenger) = self.passengers.get_mut(position) {
            passenger.seat = Some(seat);
        }
    }

    pub(crate) fn mark_modified(&mut self, message: String, now: DateTime<Utc>) {
        self.status = TicketStatus::Modified;
        self.message = message;
        self.updated_at = now;
    }

    /// Clears every passenger's seat and returns the seats that were held.
    pub(crate) fn cancel(&mut self, now: DateTime<Utc>) -> Vec<Seat> {
        let released = self
            .passengers
            .iter_mut()
            .filter_map(|p| p.seat.take())
            .collect();
        self.status = TicketStatus::Cancelled;
        self.message = MSG_CANCELLED.to_string();
        self.updated_at = now;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Section;

    fn ticket() -> Ticket {
        let passengers = vec![
            Passenger::seated(
                PassengerDetails::new("Ada", "Lovelace", "ada@example.com", "London"),
                Seat::new(Section::A, 1),
            ),
            Passenger::seated(
                PassengerDetails::new("Alan", "Turing", "alan@example.com", "Wilmslow"),
                Seat::new(Section::A, 2),
            ),
        ];
        Ticket::confirmed(
            TicketId::new(1),
            "LON".to_string(),
            "PAR".to_string(),
            40,
            passengers,
            Utc::now(),
        )
    }

    #[test]
    fn test_confirmed_ticket() {
        let ticket = ticket();
        assert_eq!(ticket.status(), TicketStatus::Confirmed);
        assert_eq!(ticket.passenger_count(), 2);
        assert_eq!(ticket.message(), MSG_BOOKED);
        assert_eq!(ticket.booked_at(), ticket.updated_at());
        assert_eq!(ticket.passengers()[1].full_name(), "Alan Turing");
    }

    #[test]
    fn test_cancel_clears_seats() {
        let mut ticket = ticket();
        let released = ticket.cancel(Utc::now());

        assert_eq!(
            released,
            vec![Seat::new(Section::A, 1), Seat::new(Section::A, 2)]
        );
        assert!(ticket.is_cancelled());
        assert!(ticket.seats().is_empty());
        assert!(ticket.passengers().iter().all(|p| p.seat.is_none()));

        // A second cancel finds nothing left to release.
        assert!(ticket.cancel(Utc::now()).is_empty());
    }

    #[test]
    fn test_assign_seat() {
        let mut ticket = ticket();
        ticket.assign_seat(1, Seat::new(Section::B, 9));
        ticket.mark_modified(MSG_MODIFIED.to_string(), Utc::now());

        assert_eq!(ticket.seat_of(1), Some(Seat::new(Section::B, 9)));
        assert_eq!(ticket.status(), TicketStatus::Modified);
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(ticket()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "Confirmed");
        assert_eq!(json["passengers"][0]["seat"]["section"], "A");
        assert_eq!(json["passengers"][0]["seat"]["index"], 1);
    }
}
