//! Subcommand handlers

use std::path::PathBuf;

use chrono::Utc;
use cinema_core::auth::hash_password;
use cinema_core::{
    Actor, BookingRepository, CatalogueRepository, CinemaHall, Database, Error, Genre, Movie,
    MovieSession, Result, ScheduleRepository, Settings, User, UserRepository,
};
use tracing::info;

use crate::cli::{
    ActorCommand, BookArgs, Cli, Commands, GenreCommand, HallCommand, MovieCommand,
    SessionCommand, UserCommand,
};

/// Dispatch a parsed command line
pub fn run(cli: Cli, settings: &Settings) -> Result<()> {
    let path = match cli.database {
        Some(path) => path,
        None => settings.database_path()?,
    };
    let db = open(path)?;

    match cli.command {
        Commands::Init => {
            println!("Database ready at schema version {}", db.schema_version());
        }
        Commands::Genre(cmd) => genre(&db, cmd)?,
        Commands::Actor(cmd) => actor(&db, cmd)?,
        Commands::Movie(cmd) => movie(&db, cmd)?,
        Commands::Hall(cmd) => hall(&db, cmd)?,
        Commands::Session(cmd) => session(&db, cmd)?,
        Commands::User(cmd) => user(&db, cmd)?,
        Commands::Book(args) => book(&db, args)?,
        Commands::Tickets(args) => {
            for ticket in db.list_tickets_for_order(args.order)? {
                println!("{}", ticket);
            }
        }
        Commands::Seats(args) => {
            let map = db.seat_map(args.session)?;
            println!("{}", map.render());
            println!("{} seats available", map.available());
        }
    }

    Ok(())
}

fn open(path: PathBuf) -> Result<Database> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    info!(path = %path.display(), "Opening database");
    Database::open(&path)
}

fn genre(db: &Database, cmd: GenreCommand) -> Result<()> {
    match cmd {
        GenreCommand::Add { name } => {
            let genre = Genre::new(name);
            db.create_genre(&genre)?;
            println!("{}\t{}", genre.id, genre);
        }
        GenreCommand::List => {
            for genre in db.list_genres()? {
                println!("{}\t{}", genre.id, genre);
            }
        }
    }
    Ok(())
}

fn actor(db: &Database, cmd: ActorCommand) -> Result<()> {
    match cmd {
        ActorCommand::Add {
            first_name,
            last_name,
        } => {
            let actor = Actor::new(first_name, last_name);
            db.create_actor(&actor)?;
            println!("{}\t{}", actor.id, actor);
        }
        ActorCommand::List => {
            for actor in db.list_actors()? {
                println!("{}\t{}", actor.id, actor);
            }
        }
    }
    Ok(())
}

fn movie(db: &Database, cmd: MovieCommand) -> Result<()> {
    match cmd {
        MovieCommand::Add(args) => {
            let movie = Movie::new(args.title, args.description)
                .with_actors(args.actors)
                .with_genres(args.genres);
            db.create_movie(&movie)?;
            println!("{}\t{}", movie.id, movie);
        }
        MovieCommand::Search { title } => {
            for movie in db.search_movies(&title)? {
                println!("{}\t{}", movie.id, movie);
            }
        }
    }
    Ok(())
}

fn hall(db: &Database, cmd: HallCommand) -> Result<()> {
    match cmd {
        HallCommand::Add {
            name,
            rows,
            seats_in_row,
        } => {
            let hall = CinemaHall::new(name, rows, seats_in_row)?;
            db.create_hall(&hall)?;
            println!("{}\t{} ({} seats)", hall.id, hall, hall.capacity());
        }
        HallCommand::List => {
            for hall in db.list_halls()? {
                println!(
                    "{}\t{}\t{}x{}",
                    hall.id, hall, hall.rows, hall.seats_in_row
                );
            }
        }
    }
    Ok(())
}

fn session(db: &Database, cmd: SessionCommand) -> Result<()> {
    match cmd {
        SessionCommand::Add {
            movie,
            hall,
            show_time,
        } => {
            let session = MovieSession::new(movie, hall, show_time);
            db.create_session(&session)?;
            println!("{}", session.id);
        }
        SessionCommand::List { upcoming, movie } => {
            let sessions = match movie {
                Some(movie_id) => db.list_sessions_for_movie(movie_id)?,
                None => db.list_sessions(upcoming.then(Utc::now))?,
            };
            for session in sessions {
                println!("{}\t{}\t{}", session.id, session, session.hall_name);
            }
        }
    }
    Ok(())
}

fn user(db: &Database, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::Add {
            username,
            email,
            password,
        } => {
            let user = User::new(username, email, hash_password(&password)?);
            db.create_user(&user)?;
            println!("{}\t{}", user.id, user);
        }
        UserCommand::Orders { username } => {
            let user = db
                .find_user_by_username(&username)?
                .ok_or_else(|| Error::NotFound(format!("user '{}'", username)))?;
            for order in db.list_orders_for_user(user.id)? {
                println!("{}\t{}", order.id, order);
            }
        }
    }
    Ok(())
}

fn book(db: &Database, args: BookArgs) -> Result<()> {
    let user = db.authenticate(&args.username, &args.password)?;
    let (order, tickets) = db.book_order(user.id, args.session, &args.seats)?;

    println!("Order {} ({})", order.id, order);
    for ticket in tickets {
        println!("  row {}, seat {}", ticket.row, ticket.seat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    fn run_with(database: &str, args: &[&str]) -> Result<()> {
        let argv = ["cinema", "--database", database]
            .into_iter()
            .chain(args.iter().copied());
        run(Cli::try_parse_from(argv).unwrap(), &Settings::default())
    }

    #[test]
    fn test_commands_against_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box-office").join("cinema.db");
        let database = path.to_str().unwrap();

        run_with(database, &["init"]).unwrap();
        run_with(
            database,
            &["hall", "add", "--name", "Blue", "--rows", "10", "--seats-in-row", "15"],
        )
        .unwrap();
        run_with(
            database,
            &["user", "add", "--username", "alice", "--email", "a@example.com", "--password", "pw"],
        )
        .unwrap();

        let db = Database::open(&path).unwrap();
        let halls = db.list_halls().unwrap();
        assert_eq!(halls.len(), 1);
        assert_eq!(halls[0].capacity(), 150);

        let movie = Movie::new("Speed".to_string(), "A bus".to_string());
        db.create_movie(&movie).unwrap();
        let session = MovieSession::new(
            movie.id,
            halls[0].id,
            Utc.with_ymd_and_hms(2024, 3, 1, 19, 30, 0).unwrap(),
        );
        db.create_session(&session).unwrap();
        let movie_id = movie.id.to_string();
        let session_id = session.id.to_string();

        run_with(database, &["session", "list", "--movie", &movie_id]).unwrap();
        run_with(
            database,
            &["book", "--username", "alice", "--password", "pw", "--session", &session_id, "--seat", "5:5"],
        )
        .unwrap();

        let retry = run_with(
            database,
            &["book", "--username", "alice", "--password", "pw", "--session", &session_id, "--seat", "5:5"],
        );
        assert!(retry.unwrap_err().validation().is_some());

        assert!(matches!(
            run_with(
                database,
                &["book", "--username", "alice", "--password", "nope", "--session", &session_id, "--seat", "1:1"],
            ),
            Err(Error::Authentication(_))
        ));

        assert!(db.seat_map(session.id).unwrap().is_taken(5, 5));
    }
}
