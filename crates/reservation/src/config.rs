//! Seat inventory shape.

use common::Section;

use crate::error::{ReservationError, Result};

/// The shape of the seat inventory: which sections exist and how many
/// seats each one holds.
///
/// Sections are kept sorted, which fixes the scan priority (A before B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    sections: Vec<Section>,
    seats_per_section: u32,
}

impl InventoryConfig {
    /// Seats per section in the reference layout.
    pub const DEFAULT_SEATS_PER_SECTION: u32 = 20;

    /// Creates an inventory shape.
    ///
    /// Fails if no sections are given, a section repeats, or the
    /// per-section capacity is zero.
    pub fn new(
        sections: impl IntoIterator<Item = Section>,
        seats_per_section: u32,
    ) -> Result<Self> {
        let mut sections: Vec<Section> = sections.into_iter().collect();
        if sections.is_empty() {
            return Err(ReservationError::InvalidInventory(
                "at least one section is required".to_string(),
            ));
        }
        if seats_per_section == 0 {
            return Err(ReservationError::InvalidInventory(
                "seats per section must be greater than 0".to_string(),
            ));
        }

        sections.sort();
        if let Some(pair) = sections.windows(2).find(|w| w[0] == w[1]) {
            return Err(ReservationError::InvalidInventory(format!(
                "duplicate section {}",
                pair[0]
            )));
        }

        Ok(Self {
            sections,
            seats_per_section,
        })
    }

    /// Returns the sections in scan priority order.
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
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            sections: vec![Section::A, Section::B],
            seats_per_section: Self::DEFAULT_SEATS_PER_SECTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = InventoryConfig::default();
        assert_eq!(config.sections(), &[Section::A, Section::B]);
        assert_eq!(config.seats_per_section(), 20);
        assert_eq!(config.capacity(), 40);
    }

    #[test]
    fn test_sections_are_sorted() {
        let config = InventoryConfig::new([Section::B, Section::A], 4).unwrap();
        assert_eq!(config.sections(), &[Section::A, Section::B]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            InventoryConfig::new(Vec::<Section>::new(), 4),
            Err(ReservationError::InvalidInventory(_))
        ));
        assert!(matches!(
            InventoryConfig::new([Section::A, Section::A], 4),
            Err(ReservationError::InvalidInventory(_))
        ));
        assert!(matches!(
            InventoryConfig::new([Section::A], 0),
            Err(ReservationError::InvalidInventory(_))
        ));
    }
}
