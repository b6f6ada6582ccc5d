//! Actor storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{classify_write, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Actor;

pub struct ActorStore<'a> {
    conn: &'a Connection,
}

fn actor_from_row(row: &Row<'_>) -> rusqlite::Result<Actor> {
    Ok(Actor {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}

impl<'a> ActorStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self, actor), fields(actor = %actor))]
    pub fn create(&self, actor: &Actor) -> Result<()> {
        self.conn.execute(
            "INSERT INTO actors (id, first_name, last_name) VALUES (?1, ?2, ?3)",
            params![actor.id.to_string(), actor.first_name, actor.last_name],
        )
        .map_err(|e| classify_write(e, "actor"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Actor>> {
        let actor = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name FROM actors WHERE id = ?1",
                params![id.to_string()],
                actor_from_row,
            )
            .optional()?;

        Ok(actor)
    }

    /// All actors, by last then first name
    pub fn list(&self) -> Result<Vec<Actor>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name FROM actors ORDER BY last_name, first_name",
        )?;

        let actors = stmt
            .query_map([], actor_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(actors)
    }

    /// Actors credited in a movie
    #[instrument(skip(self))]
    pub fn list_for_movie(&self, movie_id: Uuid) -> Result<Vec<Actor>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.first_name, a.last_name
             FROM actors a
             INNER JOIN movie_actors ma ON ma.actor_id = a.id
             WHERE ma.movie_id = ?1
             ORDER BY a.last_name, a.first_name",
        )?;

        let actors = stmt
            .query_map(params![movie_id.to_string()], actor_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(actors)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM actors WHERE id = ?1", params![id.to_string()])
            .map_err(|e| classify_write(e, "actor"))?;
        Ok(())
    }
}
