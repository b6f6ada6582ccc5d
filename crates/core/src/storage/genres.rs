//! Genre storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{classify_write, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Genre;

pub struct GenreStore<'a> {
    conn: &'a Connection,
}

impl<'a> GenreStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a genre. Names are unique.
    #[instrument(skip(self, genre), fields(name = %genre.name))]
    pub fn create(&self, genre: &Genre) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO genres (id, name) VALUES (?1, ?2)",
                params![genre.id.to_string(), genre.name],
            )
            .map_err(|e| classify_write(e, "genre"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>> {
        let genre = self
            .conn
            .query_row(
                "SELECT id, name FROM genres WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok(Genre {
                        id: parse_uuid(&row.get::<_, String>(0)?)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(genre)
    }

    #[instrument(skip(self))]
    pub fn find_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let genre = self
            .conn
            .query_row(
                "SELECT id, name FROM genres WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Genre {
                        id: parse_uuid(&row.get::<_, String>(0)?)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(genre)
    }

    /// All genres, alphabetically
    pub fn list(&self) -> Result<Vec<Genre>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM genres ORDER BY name")?;

        let genres = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(genres)
    }

    /// Delete a genre, unlinking it from every movie
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM genres WHERE id = ?1", params![id.to_string()])
            .map_err(|e| classify_write(e, "genre"))?;
        Ok(())
    }
}
