//! SQLite storage layer for the cinema

mod actors;
mod cinema_halls;
mod genres;
mod migrations;
mod movie_sessions;
mod movies;
mod orders;
mod parse;
mod tickets;
mod traits;
mod users;

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::booking::{book_ticket, HallDirectory, SeatLedger, TicketDraft};
use crate::error::{Error, Result};
use crate::models::{
    Actor, CinemaHall, Genre, HallDimensions, Movie, MovieSession, MovieSessionDisplay, Order,
    SeatMap, Ticket, TicketDisplay, User,
};

pub use actors::ActorStore;
pub use cinema_halls::CinemaHallStore;
pub use genres::GenreStore;
pub use movie_sessions::MovieSessionStore;
pub use movies::MovieStore;
pub use orders::OrderStore;
pub use tickets::TicketStore;
pub use traits::{
    BookingRepository, CatalogueRepository, ScheduleRepository, Storage, UserRepository,
};
pub use users::UserStore;

/// How long a connection waits on another writer before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Main database handle
///
/// A handle owns one connection and is not shared across threads; open one
/// per thread against the same file.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn genres(&self) -> GenreStore<'_> {
        GenreStore::new(&self.conn)
    }

    pub fn actors(&self) -> ActorStore<'_> {
        ActorStore::new(&self.conn)
    }

    pub fn movies(&self) -> MovieStore<'_> {
        MovieStore::new(&self.conn)
    }

    pub fn halls(&self) -> CinemaHallStore<'_> {
        CinemaHallStore::new(&self.conn)
    }

    pub fn sessions(&self) -> MovieSessionStore<'_> {
        MovieSessionStore::new(&self.conn)
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn orders(&self) -> OrderStore<'_> {
        OrderStore::new(&self.conn)
    }

    pub fn tickets(&self) -> TicketStore<'_> {
        TicketStore::new(&self.conn)
    }

    /// Create an order for `user_id` holding one ticket per (row, seat)
    ///
    /// Runs in a single write transaction. Every seat passes through the
    /// booking rules; the first rejected seat rolls back the order and all
    /// tickets booked before it.
    #[instrument(skip(self, seats), fields(seat_count = seats.len()))]
    pub fn book_order(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        seats: &[(i32, i32)],
    ) -> Result<(Order, Vec<Ticket>)> {
        if seats.is_empty() {
            return Err(Error::InvalidOperation(
                "an order needs at least one seat".to_string(),
            ));
        }

        // Write lock up front; concurrent bookings wait out BUSY_TIMEOUT here
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let order = Order::new(user_id);
        OrderStore::new(&tx).create(&order)?;

        let store = TicketStore::new(&tx);
        let tickets = seats
            .iter()
            .map(|&(row, seat)| {
                book_ticket(&TicketDraft::new(session_id, order.id, row, seat), &store)
            })
            .collect::<Result<Vec<_>>>()?;

        tx.commit()?;

        info!(
            order_id = %order.id,
            %user_id,
            %session_id,
            tickets = tickets.len(),
            "Order booked"
        );
        Ok((order, tickets))
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl CatalogueRepository for Database {
    fn create_genre(&self, genre: &Genre) -> Result<()> {
        self.genres().create(genre)
    }

    fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        self.genres().find_by_name(name)
    }

    fn list_genres(&self) -> Result<Vec<Genre>> {
        self.genres().list()
    }

    fn create_actor(&self, actor: &Actor) -> Result<()> {
        self.actors().create(actor)
    }

    fn list_actors(&self) -> Result<Vec<Actor>> {
        self.actors().list()
    }

    fn create_movie(&self, movie: &Movie) -> Result<()> {
        self.movies().create(movie)
    }

    fn find_movie_by_id(&self, id: Uuid) -> Result<Option<Movie>> {
        self.movies().find_by_id(id)
    }

    fn search_movies(&self, fragment: &str) -> Result<Vec<Movie>> {
        self.movies().search_by_title(fragment)
    }

    fn delete_movie(&self, id: Uuid) -> Result<()> {
        self.movies().delete(id)
    }
}

impl ScheduleRepository for Database {
    fn create_hall(&self, hall: &CinemaHall) -> Result<()> {
        self.halls().create(hall)
    }

    fn find_hall_by_id(&self, id: Uuid) -> Result<Option<CinemaHall>> {
        self.halls().find_by_id(id)
    }

    fn list_halls(&self) -> Result<Vec<CinemaHall>> {
        self.halls().list()
    }

    fn delete_hall(&self, id: Uuid) -> Result<()> {
        self.halls().delete(id)
    }

    fn create_session(&self, session: &MovieSession) -> Result<()> {
        self.sessions().create(session)
    }

    fn find_session_by_id(&self, id: Uuid) -> Result<Option<MovieSession>> {
        self.sessions().find_by_id(id)
    }

    fn list_sessions(&self, from: Option<DateTime<Utc>>) -> Result<Vec<MovieSessionDisplay>> {
        self.sessions().list_display(from)
    }

    fn list_sessions_for_movie(&self, movie_id: Uuid) -> Result<Vec<MovieSessionDisplay>> {
        self.sessions().list_for_movie(movie_id)
    }

    fn delete_session(&self, id: Uuid) -> Result<()> {
        self.sessions().delete(id)
    }
}

impl UserRepository for Database {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users().find_by_username(username)
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        self.users().authenticate(username, password)
    }

    fn delete_user(&self, id: Uuid) -> Result<()> {
        self.users().delete(id)
    }
}

impl BookingRepository for Database {
    fn book_order(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        seats: &[(i32, i32)],
    ) -> Result<(Order, Vec<Ticket>)> {
        Database::book_order(self, user_id, session_id, seats)
    }

    fn find_order_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        self.orders().find_by_id(id)
    }

    fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        self.orders().list_for_user(user_id)
    }

    fn delete_order(&self, id: Uuid) -> Result<()> {
        self.orders().delete(id)
    }

    fn find_ticket_by_id(&self, id: Uuid) -> Result<Option<Ticket>> {
        self.tickets().find_by_id(id)
    }

    fn list_tickets_for_order(&self, order_id: Uuid) -> Result<Vec<TicketDisplay>> {
        self.tickets().list_for_order(order_id)
    }

    fn seat_map(&self, session_id: Uuid) -> Result<SeatMap> {
        self.tickets().seat_map(session_id)
    }
}

impl HallDirectory for Database {
    fn hall_dimensions(&self, session_id: Uuid) -> Result<HallDimensions> {
        self.sessions().hall_dimensions(session_id)
    }
}

impl SeatLedger for Database {
    fn seat_taken(&self, session_id: Uuid, row: i32, seat: i32) -> Result<bool> {
        self.tickets().exists(session_id, row, seat)
    }

    fn insert_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.tickets().create(ticket)
    }
}

#[cfg(test)]
mod tests;
