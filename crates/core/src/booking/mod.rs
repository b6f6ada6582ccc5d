//! Ticket booking rules
//!
//! The validator decides whether a ticket draft may be persisted. It is a free
//! function over two capabilities supplied by the caller:
//!
//! - [`HallDirectory`] resolves a movie session to its hall dimensions
//! - [`SeatLedger`] answers whether a seat is taken and persists tickets
//!
//! The pre-check in [`validate`] is only an early exit. Two callers can both
//! pass it for the same seat, so the ledger's insert must enforce uniqueness
//! atomically and report [`Error::Conflict`], which [`book_ticket`] maps back
//! to [`ValidationError::DuplicateSeat`].

mod error;

pub use error::{SeatRange, ValidationError, NON_FIELD_KEY};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{HallDimensions, Ticket};

/// A ticket that has not been persisted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub session_id: Uuid,
    pub order_id: Uuid,
    pub row: i32,
    pub seat: i32,
}

impl TicketDraft {
    pub fn new(session_id: Uuid, order_id: Uuid, row: i32, seat: i32) -> Self {
        Self {
            session_id,
            order_id,
            row,
            seat,
        }
    }
}

/// Resolves a movie session to the dimensions of the hall it runs in
pub trait HallDirectory {
    /// Fails with [`ValidationError::SessionNotFound`] or
    /// [`ValidationError::HallNotFound`] when the lookup has nothing
    fn hall_dimensions(&self, session_id: Uuid) -> Result<HallDimensions>;
}

/// Existence checks and durable persistence for tickets
pub trait SeatLedger {
    /// Is any ticket, from any order, holding this seat in this session
    fn seat_taken(&self, session_id: Uuid, row: i32, seat: i32) -> Result<bool>;

    /// Persist a ticket. Must fail with [`Error::Conflict`] if the
    /// (session, row, seat) triple is already held.
    fn insert_ticket(&self, ticket: &Ticket) -> Result<()>;
}

/// Check a draft against the booking rules
///
/// Checks run in order and the first failure wins: duplicate seat, row
/// bound, seat bound. Both bounds are enforced at the low end as well.
pub fn validate<H, L>(draft: &TicketDraft, halls: &H, ledger: &L) -> Result<()>
where
    H: HallDirectory + ?Sized,
    L: SeatLedger + ?Sized,
{
    if ledger.seat_taken(draft.session_id, draft.row, draft.seat)? {
        return Err(ValidationError::DuplicateSeat {
            session_id: draft.session_id,
            row: draft.row,
            seat: draft.seat,
        }
        .into());
    }

    let hall = halls.hall_dimensions(draft.session_id)?;

    let rows = SeatRange::up_to(hall.rows);
    if !rows.contains(draft.row) {
        return Err(ValidationError::RowOutOfRange {
            row: draft.row,
            range: rows,
        }
        .into());
    }

    let seats = SeatRange::up_to(hall.seats_in_row);
    if !seats.contains(draft.seat) {
        return Err(ValidationError::SeatOutOfRange {
            seat: draft.seat,
            range: seats,
        }
        .into());
    }

    debug!(
        session_id = %draft.session_id,
        row = draft.row,
        seat = draft.seat,
        "Ticket draft is valid"
    );
    Ok(())
}

/// Validate a draft and persist it as a ticket
///
/// A storage conflict on insert means another booking won the race for the
/// seat; it is reported as [`ValidationError::DuplicateSeat`], never retried.
pub fn book_ticket<S>(draft: &TicketDraft, store: &S) -> Result<Ticket>
where
    S: HallDirectory + SeatLedger + ?Sized,
{
    if let Err(e) = validate(draft, store, store) {
        if let Some(reason) = e.validation() {
            warn!(
                session_id = %draft.session_id,
                order_id = %draft.order_id,
                row = draft.row,
                seat = draft.seat,
                %reason,
                "Ticket rejected"
            );
        }
        return Err(e);
    }

    let ticket = Ticket::from(draft);
    match store.insert_ticket(&ticket) {
        Ok(()) => {
            info!(
                ticket_id = %ticket.id,
                session_id = %ticket.movie_session_id,
                order_id = %ticket.order_id,
                row = ticket.row,
                seat = ticket.seat,
                "Ticket booked"
            );
            Ok(ticket)
        }
        Err(Error::Conflict(detail)) => {
            warn!(
                session_id = %draft.session_id,
                row = draft.row,
                seat = draft.seat,
                %detail,
                "Seat taken between check and insert"
            );
            Err(ValidationError::DuplicateSeat {
                session_id: draft.session_id,
                row: draft.row,
                seat: draft.seat,
            }
            .into())
        }
        Err(e) => Err(e),
    }
}
