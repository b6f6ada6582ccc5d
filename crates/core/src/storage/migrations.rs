//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Catalogue
            CREATE TABLE IF NOT EXISTS genres (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS actors (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS movies (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS movie_actors (
                movie_id TEXT NOT NULL,
                actor_id TEXT NOT NULL,
                PRIMARY KEY (movie_id, actor_id),
                FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE,
                FOREIGN KEY (actor_id) REFERENCES actors(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS movie_genres (
                movie_id TEXT NOT NULL,
                genre_id TEXT NOT NULL,
                PRIMARY KEY (movie_id, genre_id),
                FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE,
                FOREIGN KEY (genre_id) REFERENCES genres(id) ON DELETE CASCADE
            );

            -- Halls and screenings
            CREATE TABLE IF NOT EXISTS cinema_halls (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                "rows" INTEGER NOT NULL CHECK ("rows" > 0),
                seats_in_row INTEGER NOT NULL CHECK (seats_in_row > 0)
            );

            CREATE TABLE IF NOT EXISTS movie_sessions (
                id TEXT PRIMARY KEY,
                show_time TEXT NOT NULL,
                cinema_hall_id TEXT NOT NULL,
                movie_id TEXT NOT NULL,
                FOREIGN KEY (cinema_hall_id) REFERENCES cinema_halls(id) ON DELETE CASCADE,
                FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE
            );

            -- Customers and bookings
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                date_joined TEXT NOT NULL,
                last_login TEXT
            );

            CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                user_id TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE RESTRICT
            );

            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                movie_session_id TEXT NOT NULL,
                order_id TEXT NOT NULL,
                "row" INTEGER NOT NULL CHECK ("row" >= 1),
                seat INTEGER NOT NULL CHECK (seat >= 1),
                FOREIGN KEY (movie_session_id) REFERENCES movie_sessions(id) ON DELETE CASCADE,
                FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE RESTRICT
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_movies_title ON movies(title);

            CREATE INDEX IF NOT EXISTS idx_movie_sessions_hall ON movie_sessions(cinema_hall_id);
            CREATE INDEX IF NOT EXISTS idx_movie_sessions_movie ON movie_sessions(movie_id);
            CREATE INDEX IF NOT EXISTS idx_movie_sessions_show_time ON movie_sessions(show_time);

            CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id);
            CREATE INDEX IF NOT EXISTS idx_orders_created ON orders(created_at);

            CREATE INDEX IF NOT EXISTS idx_tickets_order ON tickets(order_id);
        "#,
    },
    Migration {
        version: 3,
        description: "Add ticket seat uniqueness constraint",
        sql: r#"
            CREATE UNIQUE INDEX IF NOT EXISTS ticket_unique_seat
                ON tickets(movie_session_id, "row", seat);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;

            info!(version = migration.version, "Migration complete");
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}
