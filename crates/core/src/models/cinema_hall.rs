//! Cinema hall model - the seat grid every session is booked against

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A physical room with a fixed grid of `rows` x `seats_in_row`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CinemaHall {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

impl CinemaHall {
    /// Create a hall, rejecting empty grids
    pub fn new(name: String, rows: i32, seats_in_row: i32) -> Result<Self> {
        if rows <= 0 || seats_in_row <= 0 {
            return Err(Error::InvalidOperation(format!(
                "hall dimensions must be positive, got {} rows x {} seats",
                rows, seats_in_row
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            rows,
            seats_in_row,
        })
    }

    /// Total number of seats in the hall
    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }

    pub fn dimensions(&self) -> HallDimensions {
        HallDimensions {
            rows: self.rows,
            seats_in_row: self.seats_in_row,
        }
    }
}

impl std::fmt::Display for CinemaHall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Row and seat counts of a hall, as seen by the booking validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallDimensions {
    pub rows: i32,
    pub seats_in_row: i32,
}
