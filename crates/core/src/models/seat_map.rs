//! Seat availability for one session

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HallDimensions;

/// The hall grid of a session plus the seats already ticketed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatMap {
    pub session_id: Uuid,
    pub dimensions: HallDimensions,
    /// (row, seat) pairs held by any order
    pub taken: BTreeSet<(i32, i32)>,
}

impl SeatMap {
    pub fn is_taken(&self, row: i32, seat: i32) -> bool {
        self.taken.contains(&(row, seat))
    }

    pub fn available(&self) -> i64 {
        i64::from(self.dimensions.rows) * i64::from(self.dimensions.seats_in_row)
            - self.taken.len() as i64
    }

    /// One line per row, `.` for a free seat and `x` for a taken one
    pub fn render(&self) -> String {
        (1..=self.dimensions.rows)
            .map(|row| {
                let seats: String = (1..=self.dimensions.seats_in_row)
                    .map(|seat| if self.is_taken(row, seat) { 'x' } else { '.' })
                    .collect();
                format!("{:>3} {}", row, seats)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
