//! Booking rule violations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Key used in [`ValidationError::field_errors`] for errors not tied to a field
pub const NON_FIELD_KEY: &str = "non_field";

/// Inclusive range of valid row or seat numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRange {
    pub min: i32,
    pub max: i32,
}

impl SeatRange {
    /// The 1-based range `[1, max]`
    pub fn up_to(max: i32) -> Self {
        Self { min: 1, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl std::fmt::Display for SeatRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}

/// Why a ticket draft cannot be persisted
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("seat (row: {row}, seat: {seat}) is already taken for session {session_id}")]
    DuplicateSeat { session_id: Uuid, row: i32, seat: i32 },

    #[error("row number must be in available range: (1, rows): {range}")]
    RowOutOfRange { row: i32, range: SeatRange },

    #[error("seat number must be in available range: (1, seats_in_row): {range}")]
    SeatOutOfRange { seat: i32, range: SeatRange },

    #[error("movie session {session_id} not found")]
    SessionNotFound { session_id: Uuid },

    #[error("cinema hall for movie session {session_id} not found")]
    HallNotFound { session_id: Uuid },
}

impl ValidationError {
    /// The draft field this error is attributed to
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::RowOutOfRange { .. } => Some("row"),
            ValidationError::SeatOutOfRange { .. } => Some("seat"),
            _ => None,
        }
    }

    /// Field-keyed messages for a presentation layer
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let key = self.field().unwrap_or(NON_FIELD_KEY);
        BTreeMap::from([(key.to_string(), vec![self.to_string()])])
    }
}
