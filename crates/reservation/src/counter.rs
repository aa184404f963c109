//! Ticket identifier generation.

use common::TicketId;

/// Issues ticket IDs 1, 2, 3, ... and never repeats one.
///
/// Not synchronized on its own; it lives inside the engine's locked state.
#[derive(Debug, Clone, Default)]
pub struct TicketCounter {
    last: u64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket ID.
    pub fn next_id(&mut self) -> TicketId {
        self.last += 1;
        TicketId::new(self.last)
    }

    /// Returns the most recently issued ID, if any.
    pub fn last_issued(&self) -> Option<TicketId> {
        (self.last > 0).then(|| TicketId::new(self.last))
    }
}
