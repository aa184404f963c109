//! Seat ownership table and the allocation algorithm.

use common::{Seat, Section, TicketId};
use serde::{Deserialize, Serialize};

use crate::config::InventoryConfig;
use crate::error::{ReservationError, Result};

/// A passenger's optional seat wish.
///
/// A preference only pins a seat when both the section and a non-zero index
/// are present; anything less means "any free seat".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPreference {
    pub section: Option<Section>,
    pub index: Option<u32>,
}

impl SeatPreference {
    /// No preference at all.
    pub fn any() -> Self {
        Self::default()
    }

    /// Prefers an exact seat.
    pub fn seat(section: Section, index: u32) -> Self {
        Self {
            section: Some(section),
            index: Some(index),
        }
    }

    /// Returns the pinned seat, if the preference names one.
    pub fn pinned(&self) -> Option<Seat> {
        match (self.section, self.index) {
            (Some(section), Some(index)) if index > 0 => Some(Seat::new(section, index)),
            _ => None,
        }
    }
}

/// Fixed-capacity table mapping every seat to its owning ticket, if any.
///
/// Slots are stored per section, in scan priority order, with index `i`
/// of a section living at position `i - 1`.
#[derive(Debug, Clone)]
pub struct SeatGrid {
    sections: Vec<Section>,
    seats_per_section: u32,
    slots: Vec<Vec<Option<TicketId>>>,
}

impl SeatGrid {
    /// Creates an empty grid with the given shape.
    pub fn new(config: &InventoryConfig) -> Self {
        let per_section = config.seats_per_section() as usize;
        Self {
            sections: config.sections().to_vec(),
            seats_per_section: config.seats_per_section(),
            slots: vec![vec![None; per_section]; config.sections().len()],
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn seats_per_section(&self) -> u32 {
        self.seats_per_section
    }

    /// Returns the total number of seats.
    pub fn capacity(&self) -> usize {
        self.sections.len() * self.seats_per_section as usize
    }

    /// Returns the number of free seats.
    pub fn available(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.is_none())
            .count()
    }

    /// Checks that a seat exists in this grid.
    pub fn validate(&self, seat: Seat) -> Result<()> {
        self.section_position(seat.section)?;
        self.validate_index(seat.index)
    }

    /// Checks a preference's section and, when a section is named, its
    /// index. An index without a section is ignored like any other
    /// unpinned preference.
    pub fn validate_preference(&self, preference: &SeatPreference) -> Result<()> {
        let Some(section) = preference.section else {
            return Ok(());
        };
        self.section_position(section)?;
        match preference.index {
            Some(index) if index > 0 => self.validate_index(index),
            _ => Ok(()),
        }
    }

    /// Returns the ticket owning a seat, or `None` if it is free or does
    /// not exist.
    pub fn owner(&self, seat: Seat) -> Option<TicketId> {
        self.slot(seat).and_then(|slot| *slot)
    }

    /// Returns true if the seat exists and is free.
    pub fn is_free(&self, seat: Seat) -> bool {
        matches!(self.slot(seat), Some(None))
    }

    /// Marks a seat as owned by `owner`.
    ///
    /// The caller must have checked the seat is valid and free.
    pub(crate) fn occupy(&mut self, seat: Seat, owner: TicketId) {
        if let Some(slot) = self.slot_mut(seat) {
            debug_assert!(slot.is_none(), "seat {seat} already owned");
            *slot = Some(owner);
        }
    }

    /// Frees a seat if it is owned by `owner`. Returns whether it was freed.
    pub(crate) fn release(&mut self, seat: Seat, owner: TicketId) -> bool {
        match self.slot_mut(seat) {
            Some(slot) if *slot == Some(owner) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Returns the lowest-index free seat in a section.
    pub fn first_free_in(&self, section: Section) -> Option<Seat> {
        let pos = self.sections.binary_search(&section).ok()?;
        self.slots[pos]
            .iter()
            .position(Option::is_none)
            .map(|i| Seat::new(section, i as u32 + 1))
    }

    /// Returns the first free seat in scan order: sections by priority,
    /// then ascending index.
    pub fn first_free(&self) -> Option<Seat> {
        self.sections
            .iter()
            .find_map(|section| self.first_free_in(*section))
    }

    /// Returns every seat owned by `owner`, in scan order.
    pub fn owned_by(&self, owner: TicketId) -> Vec<Seat> {
        self.seats()
            .filter(|(_, slot)| *slot == Some(owner))
            .map(|(seat, _)| seat)
            .collect()
    }

    /// Assigns one seat per preference to `owner`, in order.
    ///
    /// A free pinned seat is taken as is. A pinned seat owned by someone else
    /// falls back to the first free seat of the same section, then to the
    /// first free seat anywhere. Unpinned preferences take the first free
    /// seat anywhere. Each assignment is applied before the next preference
    /// is considered.
    ///
    /// On [`ReservationError::CapacityExhausted`] every seat taken by this
    /// call is released again, leaving the grid unchanged.
    pub fn allocate(
        &mut self,
        preferences: &[SeatPreference],
        owner: TicketId,
    ) -> Result<Vec<Seat>> {
        for preference in preferences {
            self.validate_preference(preference)?;
        }

        let mut assigned = Vec::with_capacity(preferences.len());
        for preference in preferences {
            match self.choose(preference) {
                Some(seat) => {
                    self.occupy(seat, owner);
                    assigned.push(seat);
                }
                None => {
                    for seat in &assigned {
                        self.release(*seat, owner);
                    }
                    return Err(ReservationError::CapacityExhausted {
                        requested: preferences.len(),
                        available: self.available(),
                    });
                }
            }
        }

        Ok(assigned)
    }

    /// Returns a read-only picture of the grid.
    pub fn snapshot(&self) -> SeatMap {
        SeatMap {
            seats_per_section: self.seats_per_section,
            capacity: self.capacity(),
            available: self.available(),
            sections: self
                .sections
                .iter()
                .zip(&self.slots)
                .map(|(section, slots)| SectionMap {
                    section: *section,
                    slots: slots.clone(),
                })
                .collect(),
        }
    }

    fn choose(&self, preference: &SeatPreference) -> Option<Seat> {
        match preference.pinned() {
            Some(seat) if self.is_free(seat) => Some(seat),
            Some(seat) => self
                .first_free_in(seat.section)
                .or_else(|| self.first_free()),
            None => self.first_free(),
        }
    }

    fn seats(&self) -> impl Iterator<Item = (Seat, Option<TicketId>)> + '_ {
        self.sections
            .iter()
            .zip(&self.slots)
            .flat_map(|(section, slots)| {
                slots
                    .iter()
                    .enumerate()
                    .map(move |(i, slot)| (Seat::new(*section, i as u32 + 1), *slot))
            })
    }

    fn section_position(&self, section: Section) -> Result<usize> {
        self.sections
            .binary_search(&section)
            .map_err(|_| ReservationError::UnknownSection(section))
    }

    fn validate_index(&self, index: u32) -> Result<()> {
        if index == 0 || index > self.seats_per_section {
            return Err(ReservationError::SeatOutOfRange {
                index,
                max: self.seats_per_section,
            });
        }
        Ok(())
    }

    fn slot(&self, seat: Seat) -> Option<&Option<TicketId>> {
        let pos = self.sections.binary_search(&seat.section).ok()?;
        let i = (seat.index as usize).checked_sub(1)?;
        self.slots[pos].get(i)
    }

    fn slot_mut(&mut self, seat: Seat) -> Option<&mut Option<TicketId>> {
        let pos = self.sections.binary_search(&seat.section).ok()?;
        let i = (seat.index as usize).checked_sub(1)?;
        self.slots[pos].get_mut(i)
    }
}

/// Snapshot of the grid for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    pub seats_per_section: u32,
    pub capacity: usize,
    pub available: usize,
    pub sections: Vec<SectionMap>,
}

/// Ownership of every seat in one section; position `i` is seat `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    pub section: Section,
    pub slots: Vec<Option<TicketId>>,
}

impl SeatMap {
    /// Returns the owner of a seat, or `None` if free or unknown.
    pub fn owner(&self, seat: Seat) -> Option<TicketId> {
        let section = self.sections.iter().find(|s| s.section == seat.section)?;
        let i = (seat.index as usize).checked_sub(1)?;
        section.slots.get(i).copied().flatten()
    }

    /// Returns the number of owned seats.
    pub fn occupied(&self) -> usize {
        self.capacity - self.available
    }
}
