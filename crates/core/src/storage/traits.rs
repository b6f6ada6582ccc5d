//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::booking::{HallDirectory, SeatLedger};
use crate::error::Result;
use crate::models::{
    Actor, CinemaHall, Genre, Movie, MovieSession, MovieSessionDisplay, Order, SeatMap, Ticket,
    TicketDisplay, User,
};

/// Movie catalogue operations
pub trait CatalogueRepository {
    /// Create a genre
    fn create_genre(&self, genre: &Genre) -> Result<()>;

    /// Find genre by its unique name
    fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>>;

    /// List all genres
    fn list_genres(&self) -> Result<Vec<Genre>>;

    /// Create an actor
    fn create_actor(&self, actor: &Actor) -> Result<()>;

    /// List all actors
    fn list_actors(&self) -> Result<Vec<Actor>>;

    /// Create a movie with its actor and genre links
    fn create_movie(&self, movie: &Movie) -> Result<()>;

    /// Find movie by ID
    fn find_movie_by_id(&self, id: Uuid) -> Result<Option<Movie>>;

    /// Search movies by title fragment
    fn search_movies(&self, fragment: &str) -> Result<Vec<Movie>>;

    /// Delete a movie and its sessions
    fn delete_movie(&self, id: Uuid) -> Result<()>;
}

/// Hall and session scheduling operations
pub trait ScheduleRepository {
    /// Create a cinema hall
    fn create_hall(&self, hall: &CinemaHall) -> Result<()>;

    /// Find hall by ID
    fn find_hall_by_id(&self, id: Uuid) -> Result<Option<CinemaHall>>;

    /// List all halls
    fn list_halls(&self) -> Result<Vec<CinemaHall>>;

    /// Delete a hall and its sessions
    fn delete_hall(&self, id: Uuid) -> Result<()>;

    /// Schedule a movie session
    fn create_session(&self, session: &MovieSession) -> Result<()>;

    /// Find session by ID
    fn find_session_by_id(&self, id: Uuid) -> Result<Option<MovieSession>>;

    /// List sessions showing at or after `from`
    fn list_sessions(&self, from: Option<DateTime<Utc>>) -> Result<Vec<MovieSessionDisplay>>;

    /// List the sessions of one movie, earliest first
    fn list_sessions_for_movie(&self, movie_id: Uuid) -> Result<Vec<MovieSessionDisplay>>;

    /// Delete a session and its tickets
    fn delete_session(&self, id: Uuid) -> Result<()>;
}

/// User account operations
pub trait UserRepository {
    /// Create a new user
    fn create_user(&self, user: &User) -> Result<()>;

    /// Find user by ID
    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find user by username
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Verify credentials and record the login
    fn authenticate(&self, username: &str, password: &str) -> Result<User>;

    /// Delete a user (blocked while they own orders)
    fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Order and ticket operations
pub trait BookingRepository {
    /// Create an order and book every requested (row, seat), all or nothing
    fn book_order(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        seats: &[(i32, i32)],
    ) -> Result<(Order, Vec<Ticket>)>;

    /// Find order by ID
    fn find_order_by_id(&self, id: Uuid) -> Result<Option<Order>>;

    /// List a user's orders, newest first
    fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;

    /// Delete an order (blocked while it holds tickets)
    fn delete_order(&self, id: Uuid) -> Result<()>;

    /// Find ticket by ID
    fn find_ticket_by_id(&self, id: Uuid) -> Result<Option<Ticket>>;

    /// List tickets held by an order
    fn list_tickets_for_order(&self, order_id: Uuid) -> Result<Vec<TicketDisplay>>;

    /// Hall grid and taken seats for a session
    fn seat_map(&self, session_id: Uuid) -> Result<SeatMap>;
}

/// Combined storage interface
///
/// Provides access to all repository operations plus the booking
/// capabilities. Implementations may be backed by SQLite or mocks.
pub trait Storage:
    CatalogueRepository
    + ScheduleRepository
    + UserRepository
    + BookingRepository
    + HallDirectory
    + SeatLedger
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: CatalogueRepository
        + ScheduleRepository
        + UserRepository
        + BookingRepository
        + HallDirectory
        + SeatLedger
{
}
