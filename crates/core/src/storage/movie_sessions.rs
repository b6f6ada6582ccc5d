//! Movie session storage operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{classify_write, parse_datetime, parse_uuid, OptionalExt};
use crate::booking::ValidationError;
use crate::error::Result;
use crate::invariants::assert_session_invariants;
use crate::models::{HallDimensions, MovieSession, MovieSessionDisplay};

pub struct MovieSessionStore<'a> {
    conn: &'a Connection,
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<MovieSession> {
    Ok(MovieSession {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        show_time: parse_datetime(&row.get::<_, String>(1)?)?,
        cinema_hall_id: parse_uuid(&row.get::<_, String>(2)?)?,
        movie_id: parse_uuid(&row.get::<_, String>(3)?)?,
    })
}

fn display_from_row(row: &Row<'_>) -> rusqlite::Result<MovieSessionDisplay> {
    Ok(MovieSessionDisplay {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        movie_title: row.get(1)?,
        hall_name: row.get(2)?,
        show_time: parse_datetime(&row.get::<_, String>(3)?)?,
    })
}

impl<'a> MovieSessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Schedule a session. The hall and movie must exist.
    #[instrument(skip(self, session), fields(session_id = %session.id, hall_id = %session.cinema_hall_id, movie_id = %session.movie_id))]
    pub fn create(&self, session: &MovieSession) -> Result<()> {
        assert_session_invariants(session);

        self.conn
            .execute(
                "INSERT INTO movie_sessions (id, show_time, cinema_hall_id, movie_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    session.id.to_string(),
                    session.show_time.to_rfc3339(),
                    session.cinema_hall_id.to_string(),
                    session.movie_id.to_string(),
                ],
            )
            .map_err(|e| classify_write(e, "movie session"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<MovieSession>> {
        let session = self
            .conn
            .query_row(
                "SELECT id, show_time, cinema_hall_id, movie_id FROM movie_sessions WHERE id = ?1",
                params![id.to_string()],
                session_from_row,
            )
            .optional()?;

        Ok(session)
    }

    /// Sessions with their movie and hall names, earliest first
    ///
    /// With `from` set, only sessions showing at or after that time.
    #[instrument(skip(self))]
    pub fn list_display(&self, from: Option<DateTime<Utc>>) -> Result<Vec<MovieSessionDisplay>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, m.title, h.name, s.show_time
             FROM movie_sessions s
             INNER JOIN movies m ON m.id = s.movie_id
             INNER JOIN cinema_halls h ON h.id = s.cinema_hall_id
             WHERE ?1 IS NULL OR s.show_time >= ?1
             ORDER BY s.show_time, m.title",
        )?;

        let sessions = stmt
            .query_map(params![from.map(|t| t.to_rfc3339())], display_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Sessions scheduled for a movie, earliest first
    #[instrument(skip(self))]
    pub fn list_for_movie(&self, movie_id: Uuid) -> Result<Vec<MovieSessionDisplay>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, m.title, h.name, s.show_time
             FROM movie_sessions s
             INNER JOIN movies m ON m.id = s.movie_id
             INNER JOIN cinema_halls h ON h.id = s.cinema_hall_id
             WHERE s.movie_id = ?1
             ORDER BY s.show_time",
        )?;

        let sessions = stmt
            .query_map(params![movie_id.to_string()], display_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Resolve a session to the seat grid of its hall
    ///
    /// Distinguishes an unknown session from a session whose hall row is
    /// missing.
    #[instrument(skip(self))]
    pub fn hall_dimensions(&self, session_id: Uuid) -> Result<HallDimensions> {
        let found = self
            .conn
            .query_row(
                r#"SELECT h."rows", h.seats_in_row
                   FROM movie_sessions s
                   LEFT JOIN cinema_halls h ON h.id = s.cinema_hall_id
                   WHERE s.id = ?1"#,
                params![session_id.to_string()],
                |row| Ok((row.get::<_, Option<i32>>(0)?, row.get::<_, Option<i32>>(1)?)),
            )
            .optional()?;

        match found {
            None => Err(ValidationError::SessionNotFound { session_id }.into()),
            Some((Some(rows), Some(seats_in_row))) => Ok(HallDimensions { rows, seats_in_row }),
            Some(_) => Err(ValidationError::HallNotFound { session_id }.into()),
        }
    }

    /// Delete a session and every ticket sold for it
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM movie_sessions WHERE id = ?1", params![id.to_string()])
            .map_err(|e| classify_write(e, "movie session"))?;
        Ok(())
    }
}
