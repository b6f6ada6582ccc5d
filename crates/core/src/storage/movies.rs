//! Movie storage operations, including actor and genre links

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{classify_write, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Movie;

pub struct MovieStore<'a> {
    conn: &'a Connection,
}

/// Build a movie from `id, title, description`; links are loaded separately
fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        title: row.get(1)?,
        description: row.get(2)?,
        actor_ids: Vec::new(),
        genre_ids: Vec::new(),
    })
}

fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl<'a> MovieStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a movie together with its actor and genre links
    ///
    /// Linking an unknown actor or genre fails with a referential integrity
    /// error and nothing is written.
    #[instrument(skip(self, movie), fields(title = %movie.title))]
    pub fn create(&self, movie: &Movie) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO movies (id, title, description) VALUES (?1, ?2, ?3)",
            params![movie.id.to_string(), movie.title, movie.description],
        )
        .map_err(|e| classify_write(e, "movie"))?;

        {
            let links = MovieStore::new(&tx);
            for actor_id in &movie.actor_ids {
                links.add_actor(movie.id, *actor_id)?;
            }
            for genre_id in &movie.genre_ids {
                links.add_genre(movie.id, *genre_id)?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Find a movie by ID with its links loaded
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>> {
        let movie = self
            .conn
            .query_row(
                "SELECT id, title, description FROM movies WHERE id = ?1",
                params![id.to_string()],
                movie_from_row,
            )
            .optional()?;

        movie.map(|m| self.load_links(m)).transpose()
    }

    /// All movies ordered by title, links loaded
    pub fn list(&self) -> Result<Vec<Movie>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, description FROM movies ORDER BY title")?;

        let movies = stmt
            .query_map([], movie_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        movies.into_iter().map(|m| self.load_links(m)).collect()
    }

    /// Movies whose title contains `fragment` (ASCII case-insensitive)
    ///
    /// `%` and `_` in the fragment match themselves, not any text.
    #[instrument(skip(self))]
    pub fn search_by_title(&self, fragment: &str) -> Result<Vec<Movie>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id, title, description FROM movies WHERE title LIKE ?1 ESCAPE '\' ORDER BY title",
        )?;

        let pattern = format!("%{}%", escape_like(fragment));
        let movies = stmt
            .query_map(params![pattern], movie_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        movies.into_iter().map(|m| self.load_links(m)).collect()
    }

    fn load_links(&self, movie: Movie) -> Result<Movie> {
        let actor_ids = self.linked_ids(
            "SELECT actor_id FROM movie_actors WHERE movie_id = ?1 ORDER BY actor_id",
            movie.id,
        )?;
        let genre_ids = self.linked_ids(
            "SELECT genre_id FROM movie_genres WHERE movie_id = ?1 ORDER BY genre_id",
            movie.id,
        )?;

        Ok(movie.with_actors(actor_ids).with_genres(genre_ids))
    }

    fn linked_ids(&self, sql: &str, movie_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map(params![movie_id.to_string()], |row| {
                parse_uuid(&row.get::<_, String>(0)?)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Credit an actor in a movie (no-op if already credited)
    #[instrument(skip(self))]
    pub fn add_actor(&self, movie_id: Uuid, actor_id: Uuid) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO movie_actors (movie_id, actor_id) VALUES (?1, ?2)",
                params![movie_id.to_string(), actor_id.to_string()],
            )
            .map_err(|e| classify_write(e, "movie actor"))?;
        Ok(())
    }

    /// Tag a movie with a genre (no-op if already tagged)
    #[instrument(skip(self))]
    pub fn add_genre(&self, movie_id: Uuid, genre_id: Uuid) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2)",
                params![movie_id.to_string(), genre_id.to_string()],
            )
            .map_err(|e| classify_write(e, "movie genre"))?;
        Ok(())
    }

    /// Delete a movie. Its sessions and their tickets go with it.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM movies WHERE id = ?1", params![id.to_string()])
            .map_err(|e| classify_write(e, "movie"))?;
        Ok(())
    }
}
