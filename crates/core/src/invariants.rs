//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{CinemaHall, HallDimensions, MovieSession, Ticket};

/// Validate that a hall loaded from storage has a usable seat grid
pub fn assert_hall_invariants(hall: &CinemaHall) {
    debug_assert!(
        hall.rows > 0 && hall.seats_in_row > 0,
        "Hall {} has non-positive dimensions {}x{}",
        hall.id,
        hall.rows,
        hall.seats_in_row
    );
}

/// Validate that a session references a hall and a movie
pub fn assert_session_invariants(session: &MovieSession) {
    debug_assert!(
        session.cinema_hall_id != Uuid::nil(),
        "Session {} has nil cinema_hall_id",
        session.id
    );

    debug_assert!(
        session.movie_id != Uuid::nil(),
        "Session {} has nil movie_id",
        session.id
    );
}

/// Validate that a persisted ticket sits inside its session's hall
pub fn assert_ticket_in_hall(ticket: &Ticket, hall: &HallDimensions) {
    debug_assert!(
        (1..=hall.rows).contains(&ticket.row) && (1..=hall.seats_in_row).contains(&ticket.seat),
        "Ticket {} at row {} seat {} is outside hall of session {} ({}x{})",
        ticket.id,
        ticket.row,
        ticket.seat,
        ticket.movie_session_id,
        hall.rows,
        hall.seats_in_row
    );
}

/// Validate that no two tickets in a listing hold the same seat of a session
pub fn assert_no_double_booking(tickets: &[Ticket]) {
    let mut seats: Vec<(Uuid, i32, i32)> = tickets
        .iter()
        .map(|t| (t.movie_session_id, t.row, t.seat))
        .collect();
    seats.sort_unstable();
    let before = seats.len();
    seats.dedup();

    debug_assert!(
        before == seats.len(),
        "{} tickets share a seat in a ticket listing",
        before - seats.len()
    );
}
