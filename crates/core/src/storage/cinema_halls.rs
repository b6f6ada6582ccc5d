//! Cinema hall storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{classify_write, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::invariants::assert_hall_invariants;
use crate::models::CinemaHall;

pub struct CinemaHallStore<'a> {
    conn: &'a Connection,
}

fn hall_from_row(row: &Row<'_>) -> rusqlite::Result<CinemaHall> {
    Ok(CinemaHall {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        rows: row.get(2)?,
        seats_in_row: row.get(3)?,
    })
}

impl<'a> CinemaHallStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self, hall), fields(hall_name = %hall.name, rows = hall.rows, seats_in_row = hall.seats_in_row))]
    pub fn create(&self, hall: &CinemaHall) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO cinema_halls (id, name, "rows", seats_in_row) VALUES (?1, ?2, ?3, ?4)"#,
            params![hall.id.to_string(), hall.name, hall.rows, hall.seats_in_row],
        )
        .map_err(|e| classify_write(e, "cinema hall"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<CinemaHall>> {
        let hall = self
            .conn
            .query_row(
                r#"SELECT id, name, "rows", seats_in_row FROM cinema_halls WHERE id = ?1"#,
                params![id.to_string()],
                hall_from_row,
            )
            .optional()?;

        if let Some(hall) = &hall {
            assert_hall_invariants(hall);
        }
        Ok(hall)
    }

    /// All halls, by name
    pub fn list(&self) -> Result<Vec<CinemaHall>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, name, "rows", seats_in_row FROM cinema_halls ORDER BY name"#,
        )?;

        let halls = stmt
            .query_map([], hall_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(halls)
    }

    /// Delete a hall. Sessions scheduled in it, and their tickets, go with it.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM cinema_halls WHERE id = ?1", params![id.to_string()])
            .map_err(|e| classify_write(e, "cinema hall"))?;
        Ok(())
    }
}
