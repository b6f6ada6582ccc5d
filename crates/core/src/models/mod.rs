//! Data models for the cinema catalogue and bookings

mod catalogue;
mod cinema_hall;
mod movie_session;
mod order;
mod seat_map;
mod ticket;
mod user;

pub use catalogue::*;
pub use cinema_hall::*;
pub use movie_session::*;
pub use order::*;
pub use seat_map::*;
pub use ticket::*;
pub use user::*;

/// Timestamp format used by every human-readable model rendering
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
