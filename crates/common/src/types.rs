use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a ticket.
///
/// Issued in strictly increasing order starting at 1 and never reused,
/// so ordering by id is ordering by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Creates a ticket ID from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TicketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<TicketId> for u64 {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

/// Error returned when text does not name a valid section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid section '{0}': expected a single letter A-Z")]
pub struct ParseSectionError(pub String);

/// A named partition of the carriage, identified by one uppercase letter.
///
/// Sections order alphabetically, which is also the priority order used
/// when scanning for a free seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Section(char);

impl Section {
    pub const A: Section = Section('A');
    pub const B: Section = Section('B');

    /// Creates a section from a letter, normalizing to uppercase.
    pub fn new(letter: char) -> Result<Self, ParseSectionError> {
        if letter.is_ascii_alphabetic() {
            Ok(Self(letter.to_ascii_uppercase()))
        } else {
            Err(ParseSectionError(letter.to_string()))
        }
    }

    /// Returns the section letter.
    pub fn letter(&self) -> char {
        self.0
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Section {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                Section::new(letter).map_err(|_| ParseSectionError(trimmed.to_string()))
            }
            _ => Err(ParseSectionError(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Section {
    type Error = ParseSectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.0.to_string()
    }
}

/// An addressable seat: a section plus a 1-based index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat {
    pub section: Section,
    pub index: u32,
}

impl Seat {
    /// Creates a seat reference.
    pub fn new(section: Section, index: u32) -> Self {
        Self { section, index }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.section, self.index)
    }
}
