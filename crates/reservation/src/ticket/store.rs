//! In-memory ticket records.

use std::collections::BTreeMap;

use common::TicketId;

use super::Ticket;

/// Every ticket ever created, keyed by ID. Cancelled tickets stay.
#[derive(Debug, Clone, Default)]
pub struct TicketStore {
    tickets: BTreeMap<TicketId, Ticket>,
}

impl TicketStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, ticket: Ticket) {
        self.tickets.insert(ticket.id(), ticket);
    }

    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.get_mut(&id)
    }

    /// Returns all tickets, most recently created first.
    pub fn newest_first(&self) -> Vec<Ticket> {
        self.tickets.values().rev().cloned().collect()
    }

    /// Iterates over tickets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }

    /// Returns the total number of tickets stored.
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
