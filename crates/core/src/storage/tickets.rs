//! Ticket storage operations
//!
//! `TicketStore` is the SQLite side of the booking capabilities: it resolves
//! hall dimensions through the session table and relies on the
//! `ticket_unique_seat` index to reject double-booked seats.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::movie_sessions::MovieSessionStore;
use super::parse::{classify_write, parse_datetime, parse_uuid, OptionalExt};
use crate::booking::{HallDirectory, SeatLedger};
use crate::error::Result;
use crate::invariants::{assert_no_double_booking, assert_ticket_in_hall};
use crate::models::{HallDimensions, SeatMap, Ticket, TicketDisplay};

pub struct TicketStore<'a> {
    conn: &'a Connection,
}

fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        movie_session_id: parse_uuid(&row.get::<_, String>(1)?)?,
        order_id: parse_uuid(&row.get::<_, String>(2)?)?,
        row: row.get(3)?,
        seat: row.get(4)?,
    })
}

fn display_from_row(row: &Row<'_>) -> rusqlite::Result<TicketDisplay> {
    Ok(TicketDisplay {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        movie_title: row.get(1)?,
        show_time: parse_datetime(&row.get::<_, String>(2)?)?,
        row: row.get(3)?,
        seat: row.get(4)?,
    })
}

impl<'a> TicketStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a ticket without running the booking rules
    ///
    /// A seat already held in the session fails with `Error::Conflict`.
    /// Use [`crate::booking::book_ticket`] for validated bookings.
    #[instrument(skip(self, ticket), fields(session_id = %ticket.movie_session_id, row = ticket.row, seat = ticket.seat))]
    pub fn create(&self, ticket: &Ticket) -> Result<()> {
        self.conn
            .execute(
                r#"INSERT INTO tickets (id, movie_session_id, order_id, "row", seat)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    ticket.id.to_string(),
                    ticket.movie_session_id.to_string(),
                    ticket.order_id.to_string(),
                    ticket.row,
                    ticket.seat,
                ],
            )
            .map_err(|e| classify_write(e, "ticket"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>> {
        let ticket = self
            .conn
            .query_row(
                r#"SELECT id, movie_session_id, order_id, "row", seat FROM tickets WHERE id = ?1"#,
                params![id.to_string()],
                ticket_from_row,
            )
            .optional()?;

        Ok(ticket)
    }

    /// Is the seat held by any order in this session
    #[instrument(skip(self))]
    pub fn exists(&self, session_id: Uuid, row: i32, seat: i32) -> Result<bool> {
        let exists = self.conn.query_row(
            r#"SELECT EXISTS(
                   SELECT 1 FROM tickets
                   WHERE movie_session_id = ?1 AND "row" = ?2 AND seat = ?3
               )"#,
            params![session_id.to_string(), row, seat],
            |row| row.get::<_, bool>(0),
        )?;

        Ok(exists)
    }

    /// Tickets held by an order, with movie and show time, in seat order
    #[instrument(skip(self))]
    pub fn list_for_order(&self, order_id: Uuid) -> Result<Vec<TicketDisplay>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT t.id, m.title, s.show_time, t."row", t.seat
               FROM tickets t
               INNER JOIN movie_sessions s ON s.id = t.movie_session_id
               INNER JOIN movies m ON m.id = s.movie_id
               WHERE t.order_id = ?1
               ORDER BY s.show_time, t."row", t.seat"#,
        )?;

        let tickets = stmt
            .query_map(params![order_id.to_string()], display_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tickets)
    }

    /// Every ticket sold for a session, in seat order
    #[instrument(skip(self))]
    pub fn list_for_session(&self, session_id: Uuid) -> Result<Vec<Ticket>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, movie_session_id, order_id, "row", seat FROM tickets
               WHERE movie_session_id = ?1
               ORDER BY "row", seat"#,
        )?;

        let tickets = stmt
            .query_map(params![session_id.to_string()], ticket_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        assert_no_double_booking(&tickets);
        Ok(tickets)
    }

    /// Hall grid and taken seats for a session
    #[instrument(skip(self))]
    pub fn seat_map(&self, session_id: Uuid) -> Result<SeatMap> {
        let dimensions = MovieSessionStore::new(self.conn).hall_dimensions(session_id)?;
        let taken: BTreeSet<(i32, i32)> = self
            .list_for_session(session_id)?
            .into_iter()
            .inspect(|t| assert_ticket_in_hall(t, &dimensions))
            .map(|t| (t.row, t.seat))
            .collect();

        Ok(SeatMap {
            session_id,
            dimensions,
            taken,
        })
    }

    /// Number of tickets sold for a session
    pub fn count_for_session(&self, session_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tickets WHERE movie_session_id = ?1",
            params![session_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl HallDirectory for TicketStore<'_> {
    fn hall_dimensions(&self, session_id: Uuid) -> Result<HallDimensions> {
        MovieSessionStore::new(self.conn).hall_dimensions(session_id)
    }
}

impl SeatLedger for TicketStore<'_> {
    fn seat_taken(&self, session_id: Uuid, row: i32, seat: i32) -> Result<bool> {
        self.exists(session_id, row, seat)
    }

    fn insert_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.create(ticket)
    }
}
