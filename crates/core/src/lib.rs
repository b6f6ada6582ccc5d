//! Cinema Core Library
//!
//! Catalogue and booking models, the ticket booking rules, and SQLite
//! storage for a cinema box office.

pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod storage;

pub use booking::{
    book_ticket, validate, HallDirectory, SeatLedger, SeatRange, TicketDraft, ValidationError,
};
pub use config::Settings;
pub use error::{Error, Result};
pub use models::*;
pub use storage::{
    BookingRepository, CatalogueRepository, Database, ScheduleRepository, Storage,
    UserRepository,
};
