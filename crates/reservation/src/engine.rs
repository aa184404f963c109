//! Reservation engine: the only place seats and tickets change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Seat, TicketId};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::InventoryConfig;
use crate::counter::TicketCounter;
use crate::error::{ReservationError, Result};
use crate::grid::{SeatGrid, SeatMap, SeatPreference};
use crate::ticket::{
    CancelTicket, MSG_MODIFIED, ModifyTicket, Passenger, ReserveTicket, Ticket, TicketStatus,
    TicketStore,
};

/// What happened to one passenger during a modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeatChange {
    /// No seat was requested for this passenger.
    Skipped { passenger: usize },

    /// The passenger already holds the requested seat.
    Unchanged { passenger: usize, seat: Seat },

    /// The passenger moved.
    Moved {
        passenger: usize,
        from: Option<Seat>,
        to: Seat,
    },

    /// The requested seat is held by another ticket, or by another
    /// passenger on this one. The passenger keeps their seat.
    Conflict {
        passenger: usize,
        requested: Seat,
        owner: TicketId,
    },
}

impl SeatChange {
    pub fn is_moved(&self) -> bool {
        matches!(self, SeatChange::Moved { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SeatChange::Conflict { .. })
    }
}

/// Result of a modification.
///
/// `status` is `Modified` if any passenger moved, `Failed` if none moved
/// and at least one conflicted, and the ticket's own status otherwise.
/// The stored ticket only changes when something moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifyOutcome {
    pub ticket: Ticket,
    pub status: TicketStatus,
    pub changes: Vec<SeatChange>,
}

impl ModifyOutcome {
    /// Returns the number of passengers that moved.
    pub fn moved(&self) -> usize {
        self.changes.iter().filter(|c| c.is_moved()).count()
    }

    /// Returns the number of conflicting requests.
    pub fn conflicts(&self) -> usize {
        self.changes.iter().filter(|c| c.is_conflict()).count()
    }

    pub fn is_success(&self) -> bool {
        self.status == TicketStatus::Modified
    }

    /// Returns a human-readable summary.
    pub fn message(&self) -> String {
        match self.status {
            TicketStatus::Modified => self.ticket.message().to_string(),
            TicketStatus::Failed => {
                let taken: Vec<String> = self
                    .changes
                    .iter()
                    .filter_map(|c| match c {
                        SeatChange::Conflict {
                            requested, owner, ..
                        } => Some(format!("{requested} (ticket {owner})")),
                        _ => None,
                    })
                    .collect();
                format!("Seat already taken: {}", taken.join(", "))
            }
            _ => "No changes".to_string(),
        }
    }
}

/// Seat grid, ticket records and the ID counter, mutated together.
///
/// Every method runs to completion without suspending, so a caller holding
/// the engine lock always leaves this in a consistent state.
#[derive(Debug)]
pub struct ReservationState {
    grid: SeatGrid,
    tickets: TicketStore,
    counter: TicketCounter,
}

impl ReservationState {
    /// Creates an empty inventory with the given shape.
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            grid: SeatGrid::new(config),
            tickets: TicketStore::new(),
            counter: TicketCounter::new(),
        }
    }

    pub fn grid(&self) -> &SeatGrid {
        &self.grid
    }

    pub fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    pub(crate) fn reserve(&mut self, cmd: ReserveTicket, now: DateTime<Utc>) -> Result<Ticket> {
        if cmd.passengers.is_empty() {
            return Err(ReservationError::NoPassengers);
        }

        let preferences: Vec<SeatPreference> =
            cmd.passengers.iter().map(|p| p.preference).collect();
        for preference in &preferences {
            self.grid.validate_preference(preference)?;
        }

        let available = self.grid.available();
        if available < preferences.len() {
            return Err(ReservationError::CapacityExhausted {
                requested: preferences.len(),
                available,
            });
        }

        let id = self.counter.next_id();
        let seats = self.grid.allocate(&preferences, id)?;

        let passengers = cmd
            .passengers
            .into_iter()
            .zip(seats)
            .map(|(details, seat)| Passenger::seated(details, seat))
            .collect();
        let ticket = Ticket::confirmed(
            id,
            cmd.from_code,
            cmd.to_code,
            cmd.price_paid,
            passengers,
            now,
        );
        self.tickets.insert(ticket.clone());

        Ok(ticket)
    }

    pub(crate) fn modify(
        &mut self,
        cmd: ModifyTicket,
        now: DateTime<Utc>,
    ) -> Result<ModifyOutcome> {
        let id = cmd.ticket_id.ok_or(ReservationError::MissingTicketId)?;
        let ticket = self
            .tickets
            .get_mut(id)
            .ok_or(ReservationError::TicketNotFound(id))?;

        if !ticket.status().can_modify() {
            return Err(ReservationError::TicketCancelled(id));
        }

        let count = ticket.passenger_count();
        if cmd.seats.len() > count {
            return Err(ReservationError::PassengerOutOfRange {
                position: count,
                count,
            });
        }
        for seat in cmd.seats.iter().flatten() {
            self.grid.validate(*seat)?;
        }

        let mut changes = Vec::with_capacity(cmd.seats.len());
        for (passenger, requested) in cmd.seats.into_iter().enumerate() {
            let Some(requested) = requested else {
                changes.push(SeatChange::Skipped { passenger });
                continue;
            };

            let current = ticket.seat_of(passenger);
            if current == Some(requested) {
                changes.push(SeatChange::Unchanged {
                    passenger,
                    seat: requested,
                });
                continue;
            }

            if let Some(owner) = self.grid.owner(requested) {
                changes.push(SeatChange::Conflict {
                    passenger,
                    requested,
                    owner,
                });
                continue;
            }

            if let Some(from) = current {
                self.grid.release(from, id);
            }
            self.grid.occupy(requested, id);
            ticket.assign_seat(passenger, requested);
            changes.push(SeatChange::Moved {
                passenger,
                from: current,
                to: requested,
            });
        }

        let moved = changes.iter().filter(|c| c.is_moved()).count();
        let conflicts = changes.iter().filter(|c| c.is_conflict()).count();
        let status = if moved > 0 {
            let message = if conflicts == 0 {
                MSG_MODIFIED.to_string()
            } else {
                format!("{MSG_MODIFIED} ({conflicts} seat conflicts)")
            };
            ticket.mark_modified(message, now);
            TicketStatus::Modified
        } else if conflicts > 0 {
            TicketStatus::Failed
        } else {
            ticket.status()
        };

        Ok(ModifyOutcome {
            ticket: ticket.clone(),
            status,
            changes,
        })
    }

    /// Cancels a ticket and returns it with the seats that were freed.
    /// An already cancelled ticket frees nothing.
    pub(crate) fn cancel(
        &mut self,
        cmd: CancelTicket,
        now: DateTime<Utc>,
    ) -> Result<(Ticket, Vec<Seat>)> {
        let id = cmd.ticket_id.ok_or(ReservationError::MissingTicketId)?;
        let ticket = self
            .tickets
            .get_mut(id)
            .ok_or(ReservationError::TicketNotFound(id))?;

        let mut released = Vec::new();
        if ticket.status().can_cancel() {
            for seat in ticket.cancel(now) {
                if self.grid.release(seat, id) {
                    released.push(seat);
                }
            }
        }

        Ok((ticket.clone(), released))
    }
}

/// Serializes every reservation operation behind one exclusive lock.
///
/// Cloning is cheap and every clone shares the same inventory. Reads take
/// the same lock as writes, so callers never observe a half-applied
/// operation. Nothing awaits while the lock is held.
#[derive(Debug, Clone)]
pub struct ReservationEngine {
    state: Arc<Mutex<ReservationState>>,
}

impl ReservationEngine {
    /// Creates an engine that owns the given state.
    pub fn new(state: ReservationState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Creates an engine over an empty inventory of the given shape.
    pub fn with_config(config: &InventoryConfig) -> Self {
        Self::new(ReservationState::new(config))
    }

    /// Books a ticket, assigning one seat per passenger.
    #[tracing::instrument(
        skip(self, cmd),
        fields(from = %cmd.from_code, to = %cmd.to_code, passengers = cmd.passengers.len())
    )]
    pub async fn reserve(&self, cmd: ReserveTicket) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        let result = state.reserve(cmd, Utc::now());
        let available = state.grid().available();
        drop(state);

        metrics::gauge!("seats_available").set(available as f64);
        match &result {
            Ok(ticket) => {
                metrics::counter!("tickets_reserved_total").increment(1);
                tracing::info!(
                    ticket_id = %ticket.id(),
                    seats = ?ticket.seats(),
                    available,
                    "ticket reserved"
                );
            }
            Err(e) => record_rejection("reserve", e),
        }
        result
    }

    /// Moves passengers to requested seats, one passenger at a time.
    ///
    /// Conflicts do not abort the call; see [`ModifyOutcome`].
    #[tracing::instrument(skip(self, cmd), fields(ticket_id = ?cmd.ticket_id))]
    pub async fn modify(&self, cmd: ModifyTicket) -> Result<ModifyOutcome> {
        let mut state = self.state.lock().await;
        let result = state.modify(cmd, Utc::now());
        drop(state);

        match &result {
            Ok(outcome) => {
                let conflicts = outcome.conflicts();
                if outcome.is_success() {
                    metrics::counter!("tickets_modified_total").increment(1);
                }
                if conflicts > 0 {
                    metrics::counter!("seat_conflicts_total").increment(conflicts as u64);
                    tracing::warn!(
                        ticket_id = %outcome.ticket.id(),
                        conflicts,
                        moved = outcome.moved(),
                        "seat conflict during modification"
                    );
                } else {
                    tracing::info!(
                        ticket_id = %outcome.ticket.id(),
                        moved = outcome.moved(),
                        status = %outcome.status,
                        "ticket modified"
                    );
                }
            }
            Err(e) => record_rejection("modify", e),
        }
        result
    }

    /// Cancels a ticket and frees its seats. Cancelling twice is harmless.
    #[tracing::instrument(skip(self, cmd), fields(ticket_id = ?cmd.ticket_id))]
    pub async fn cancel(&self, cmd: CancelTicket) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        let result = state.cancel(cmd, Utc::now());
        let available = state.grid().available();
        drop(state);

        match result {
            Ok((ticket, released)) => {
                if released.is_empty() {
                    tracing::debug!(ticket_id = %ticket.id(), "ticket already cancelled");
                } else {
                    metrics::counter!("tickets_cancelled_total").increment(1);
                    metrics::gauge!("seats_available").set(available as f64);
                    tracing::info!(
                        ticket_id = %ticket.id(),
                        released = ?released,
                        available,
                        "ticket cancelled"
                    );
                }
                Ok(ticket)
            }
            Err(e) => {
                record_rejection("cancel", &e);
                Err(e)
            }
        }
    }

    /// Returns every ticket, cancelled ones included, newest first.
    pub async fn list(&self) -> Vec<Ticket> {
        self.state.lock().await.tickets().newest_first()
    }

    /// Looks up one ticket.
    pub async fn get(&self, ticket_id: TicketId) -> Result<Ticket> {
        self.state
            .lock()
            .await
            .tickets()
            .get(ticket_id)
            .cloned()
            .ok_or(ReservationError::TicketNotFound(ticket_id))
    }

    /// Returns a snapshot of seat ownership.
    pub async fn seat_map(&self) -> SeatMap {
        self.state.lock().await.grid().snapshot()
    }
}

impl Default for ReservationEngine {
    fn default() -> Self {
        Self::with_config(&InventoryConfig::default())
    }
}

fn record_rejection(operation: &'static str, error: &ReservationError) {
    metrics::counter!(
        "reservations_rejected_total",
        "operation" => operation,
        "reason" => error.kind().as_str()
    )
    .increment(1);
    tracing::warn!(operation, error = %error, "request rejected");
}
