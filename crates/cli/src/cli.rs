//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Cinema - box office for movie sessions and ticket bookings.
#[derive(Parser, Debug)]
#[command(name = "cinema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "cinema.toml")]
    pub config: PathBuf,

    /// Override the database location from the config
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and apply migrations
    Init,

    /// Manage genres
    #[command(subcommand)]
    Genre(GenreCommand),

    /// Manage actors
    #[command(subcommand)]
    Actor(ActorCommand),

    /// Manage movies
    #[command(subcommand)]
    Movie(MovieCommand),

    /// Manage cinema halls
    #[command(subcommand)]
    Hall(HallCommand),

    /// Manage movie sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Manage customer accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Book seats for a session as a new order
    Book(BookArgs),

    /// List the tickets in an order
    Tickets(TicketsArgs),

    /// Show seat availability for a session
    Seats(SeatsArgs),
}

#[derive(Subcommand, Debug)]
pub enum GenreCommand {
    /// Add a genre
    Add {
        name: String,
    },
    /// List genres
    List,
}

#[derive(Subcommand, Debug)]
pub enum ActorCommand {
    /// Add an actor
    Add {
        first_name: String,
        last_name: String,
    },
    /// List actors
    List,
}

#[derive(Subcommand, Debug)]
pub enum MovieCommand {
    /// Add a movie
    Add(MovieAddArgs),
    /// Search movies by title
    Search {
        #[arg(default_value = "")]
        title: String,
    },
}

#[derive(Args, Debug)]
pub struct MovieAddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Actor ID to credit (repeatable)
    #[arg(long = "actor")]
    pub actors: Vec<Uuid>,

    /// Genre ID to tag (repeatable)
    #[arg(long = "genre")]
    pub genres: Vec<Uuid>,
}

#[derive(Subcommand, Debug)]
pub enum HallCommand {
    /// Add a hall
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rows: i32,
        #[arg(long)]
        seats_in_row: i32,
    },
    /// List halls
    List,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Schedule a movie in a hall
    Add {
        #[arg(long)]
        movie: Uuid,
        #[arg(long)]
        hall: Uuid,
        /// RFC 3339 timestamp, e.g. 2024-03-01T19:30:00Z
        #[arg(long)]
        show_time: DateTime<Utc>,
    },
    /// List sessions
    List {
        /// Only sessions from now on
        #[arg(long)]
        upcoming: bool,
        /// Only sessions of this movie
        #[arg(long, conflicts_with = "upcoming")]
        movie: Option<Uuid>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a customer
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a customer's orders
    Orders {
        #[arg(long)]
        username: String,
    },
}

#[derive(Args, Debug)]
pub struct BookArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub session: Uuid,

    /// Seat as ROW:SEAT (repeatable)
    #[arg(long = "seat", required = true, value_parser = parse_seat)]
    pub seats: Vec<(i32, i32)>,
}

#[derive(Args, Debug)]
pub struct TicketsArgs {
    #[arg(long)]
    pub order: Uuid,
}

#[derive(Args, Debug)]
pub struct SeatsArgs {
    #[arg(long)]
    pub session: Uuid,
}

/// Parse `ROW:SEAT` into a pair
pub fn parse_seat(s: &str) -> Result<(i32, i32), String> {
    let (row, seat) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ROW:SEAT, got '{}'", s))?;

    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{}': {}", row, e))?;
    let seat = seat
        .trim()
        .parse()
        .map_err(|e| format!("invalid seat '{}': {}", seat, e))?;

    Ok((row, seat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seat() {
        assert_eq!(parse_seat("5:7"), Ok((5, 7)));
        assert_eq!(parse_seat(" 10 : 2 "), Ok((10, 2)));
        assert!(parse_seat("5").is_err());
        assert!(parse_seat("a:1").is_err());
    }

    #[test]
    fn test_book_args() {
        let cli = Cli::try_parse_from([
            "cinema",
            "book",
            "--username",
            "alice",
            "--password",
            "pw",
            "--session",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "--seat",
            "5:5",
            "--seat",
            "5:6",
        ])
        .unwrap();

        match cli.command {
            Commands::Book(args) => assert_eq!(args.seats, vec![(5, 5), (5, 6)]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_session_list_filters_are_exclusive() {
        let movie = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let cli = Cli::try_parse_from(["cinema", "session", "list", "--movie", movie]).unwrap();
        match cli.command {
            Commands::Session(SessionCommand::List { upcoming, movie: Some(id) }) => {
                assert!(!upcoming);
                assert_eq!(id.to_string(), movie);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(
            Cli::try_parse_from(["cinema", "session", "list", "--movie", movie, "--upcoming"])
                .is_err()
        );
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
