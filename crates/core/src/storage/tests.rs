use chrono::{Duration, TimeZone, Utc};

use super::*;
use crate::auth::hash_password;
use crate::booking::{validate, SeatRange, ValidationError};

struct Fixture {
    db: Database,
    user: User,
    hall: CinemaHall,
    movie: Movie,
    session: MovieSession,
}

fn fixture() -> Fixture {
    let db = Database::open_in_memory().unwrap();

    let user = User::new(
        "alice".to_string(),
        "alice@example.com".to_string(),
        hash_password("secret").unwrap(),
    );
    db.users().create(&user).unwrap();

    let hall = CinemaHall::new("Blue".to_string(), 10, 15).unwrap();
    db.halls().create(&hall).unwrap();

    let movie = Movie::new("Speed".to_string(), "A bus that cannot slow down".to_string());
    db.movies().create(&movie).unwrap();

    let session = MovieSession::new(
        movie.id,
        hall.id,
        Utc.with_ymd_and_hms(2024, 3, 1, 19, 30, 0).unwrap(),
    );
    db.sessions().create(&session).unwrap();

    Fixture {
        db,
        user,
        hall,
        movie,
        session,
    }
}

fn rejection<T: std::fmt::Debug>(result: Result<T>) -> ValidationError {
    match result {
        Err(Error::Validation(e)) => e,
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_schema_version_after_open() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version(), 3);
}

#[test]
fn test_hall_round_trip() {
    let f = fixture();
    let hall = f.db.halls().find_by_id(f.hall.id).unwrap().unwrap();
    assert_eq!(hall, f.hall);
    assert_eq!(hall.capacity(), 150);
}

#[test]
fn test_hall_dimensions_for_session() {
    let f = fixture();
    assert_eq!(
        f.db.hall_dimensions(f.session.id).unwrap(),
        f.hall.dimensions()
    );

    let missing = Uuid::new_v4();
    assert_eq!(
        rejection(f.db.hall_dimensions(missing)),
        ValidationError::SessionNotFound { session_id: missing }
    );
}

#[test]
fn test_second_order_cannot_take_same_seat() {
    let f = fixture();

    let (first, tickets) = f.db.book_order(f.user.id, f.session.id, &[(5, 5)]).unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].order_id, first.id);

    assert_eq!(
        rejection(f.db.book_order(f.user.id, f.session.id, &[(5, 5)])),
        ValidationError::DuplicateSeat {
            session_id: f.session.id,
            row: 5,
            seat: 5
        }
    );
}

#[test]
fn test_out_of_range_seats_rejected() {
    let f = fixture();

    assert_eq!(
        rejection(f.db.book_order(f.user.id, f.session.id, &[(11, 5)])),
        ValidationError::RowOutOfRange {
            row: 11,
            range: SeatRange::up_to(10)
        }
    );
    assert_eq!(
        rejection(f.db.book_order(f.user.id, f.session.id, &[(5, 16)])),
        ValidationError::SeatOutOfRange {
            seat: 16,
            range: SeatRange::up_to(15)
        }
    );
}

#[test]
fn test_failed_order_rolls_back() {
    let f = fixture();

    // Third seat repeats the first within the same order
    let err = rejection(f.db.book_order(f.user.id, f.session.id, &[(1, 1), (2, 2), (1, 1)]));
    assert!(matches!(err, ValidationError::DuplicateSeat { row: 1, seat: 1, .. }));

    assert_eq!(f.db.tickets().count_for_session(f.session.id).unwrap(), 0);
    assert!(f.db.orders().list_for_user(f.user.id).unwrap().is_empty());
}

#[test]
fn test_empty_order_rejected() {
    let f = fixture();
    assert!(matches!(
        f.db.book_order(f.user.id, f.session.id, &[]),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_unique_index_reports_conflict() {
    let f = fixture();
    let order = Order::new(f.user.id);
    f.db.orders().create(&order).unwrap();

    f.db.tickets()
        .create(&Ticket::new(f.session.id, order.id, 3, 3))
        .unwrap();

    let other = Order::new(f.user.id);
    f.db.orders().create(&other).unwrap();
    assert!(matches!(
        f.db.tickets().create(&Ticket::new(f.session.id, other.id, 3, 3)),
        Err(Error::Conflict(_))
    ));
}

#[test]
fn test_check_constraint_rejects_seat_zero() {
    let f = fixture();
    let order = Order::new(f.user.id);
    f.db.orders().create(&order).unwrap();

    assert!(matches!(
        f.db.tickets().create(&Ticket::new(f.session.id, order.id, 0, 1)),
        Err(Error::Database(_))
    ));
}

#[test]
fn test_validate_against_database_is_repeatable() {
    let f = fixture();
    let order = Order::new(f.user.id);
    f.db.orders().create(&order).unwrap();

    let draft = TicketDraft::new(f.session.id, order.id, 4, 4);
    assert!(validate(&draft, &f.db, &f.db).is_ok());
    assert!(validate(&draft, &f.db, &f.db).is_ok());
    assert!(!f.db.seat_taken(f.session.id, 4, 4).unwrap());
}

#[test]
fn test_seat_map() {
    let f = fixture();
    f.db.book_order(f.user.id, f.session.id, &[(1, 1), (1, 2)])
        .unwrap();

    let map = f.db.tickets().seat_map(f.session.id).unwrap();
    assert!(map.is_taken(1, 1));
    assert!(map.is_taken(1, 2));
    assert!(!map.is_taken(1, 3));
    assert_eq!(map.available(), 148);
}

#[test]
fn test_ticket_listing_for_order() {
    let f = fixture();
    let (order, _) = f
        .db
        .book_order(f.user.id, f.session.id, &[(2, 7), (2, 6)])
        .unwrap();

    let tickets = f.db.tickets().list_for_order(order.id).unwrap();
    let rendered: Vec<String> = tickets.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Speed 2024-03-01 19:30:00 (row: 2, seat: 6)",
            "Speed 2024-03-01 19:30:00 (row: 2, seat: 7)",
        ]
    );
}

#[test]
fn test_orders_newest_first() {
    let f = fixture();
    let mut older = Order::new(f.user.id);
    older.created_at = Utc::now() - Duration::hours(2);
    let newer = Order::new(f.user.id);

    f.db.orders().create(&older).unwrap();
    f.db.orders().create(&newer).unwrap();

    let ids: Vec<Uuid> = f
        .db
        .orders()
        .list_for_user(f.user.id)
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[test]
fn test_deleting_session_cascades_to_tickets() {
    let f = fixture();
    let (order, _) = f.db.book_order(f.user.id, f.session.id, &[(1, 1)]).unwrap();

    f.db.sessions().delete(f.session.id).unwrap();

    assert!(f.db.tickets().list_for_order(order.id).unwrap().is_empty());
    assert!(f.db.orders().find_by_id(order.id).unwrap().is_some());
}

#[test]
fn test_deleting_movie_cascades_to_sessions() {
    let f = fixture();
    f.db.movies().delete(f.movie.id).unwrap();
    assert!(f.db.sessions().find_by_id(f.session.id).unwrap().is_none());
}

#[test]
fn test_user_with_orders_cannot_be_deleted() {
    let f = fixture();
    f.db.book_order(f.user.id, f.session.id, &[(1, 1)]).unwrap();

    assert!(matches!(
        f.db.users().delete(f.user.id),
        Err(Error::ReferentialIntegrity(_))
    ));
    assert!(f.db.users().find_by_id(f.user.id).unwrap().is_some());
}

#[test]
fn test_order_with_tickets_cannot_be_deleted() {
    let f = fixture();
    let (order, _) = f.db.book_order(f.user.id, f.session.id, &[(1, 1)]).unwrap();

    assert!(matches!(
        f.db.orders().delete(order.id),
        Err(Error::ReferentialIntegrity(_))
    ));
}

#[test]
fn test_order_for_unknown_user_rejected() {
    let f = fixture();
    assert!(matches!(
        f.db.book_order(Uuid::new_v4(), f.session.id, &[(1, 1)]),
        Err(Error::ReferentialIntegrity(_))
    ));
}

#[test]
fn test_movie_links_and_search() {
    let f = fixture();
    let actor = Actor::new("Sandra".to_string(), "Bullock".to_string());
    let genre = Genre::new("Action".to_string());
    f.db.actors().create(&actor).unwrap();
    f.db.genres().create(&genre).unwrap();

    let movie = Movie::new("Speed 2".to_string(), "A ship this time".to_string())
        .with_actors(vec![actor.id])
        .with_genres(vec![genre.id]);
    f.db.movies().create(&movie).unwrap();

    let loaded = f.db.movies().find_by_id(movie.id).unwrap().unwrap();
    assert_eq!(loaded, movie);

    let titles: Vec<String> = f
        .db
        .search_movies("speed")
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["Speed", "Speed 2"]);

    assert_eq!(f.db.actors().list_for_movie(movie.id).unwrap(), vec![actor]);
}

#[test]
fn test_movie_with_unknown_actor_writes_nothing() {
    let f = fixture();
    let movie = Movie::new("Ghost".to_string(), "Nobody stars".to_string())
        .with_actors(vec![Uuid::new_v4()]);

    assert!(matches!(
        f.db.movies().create(&movie),
        Err(Error::ReferentialIntegrity(_))
    ));
    assert!(f.db.movies().find_by_id(movie.id).unwrap().is_none());
}

#[test]
fn test_genre_names_unique() {
    let f = fixture();
    f.db.genres().create(&Genre::new("Drama".to_string())).unwrap();
    assert!(matches!(
        f.db.genres().create(&Genre::new("Drama".to_string())),
        Err(Error::Conflict(_))
    ));
}

#[test]
fn test_authenticate() {
    let f = fixture();

    let user = f.db.authenticate("alice", "secret").unwrap();
    assert_eq!(user.id, f.user.id);
    assert!(f.db.users().find_by_id(f.user.id).unwrap().unwrap().last_login.is_some());

    assert!(matches!(
        f.db.authenticate("alice", "wrong"),
        Err(Error::Authentication(_))
    ));
    assert!(matches!(
        f.db.authenticate("bob", "secret"),
        Err(Error::Authentication(_))
    ));
}

#[test]
fn test_sessions_listed_from_time() {
    let f = fixture();
    let later = MovieSession::new(
        f.movie.id,
        f.hall.id,
        Utc.with_ymd_and_hms(2024, 3, 2, 21, 0, 0).unwrap(),
    );
    f.db.sessions().create(&later).unwrap();

    assert_eq!(f.db.list_sessions(None).unwrap().len(), 2);

    let from = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
    let upcoming = f.db.list_sessions(Some(from)).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].to_string(), "Speed 2024-03-02 21:00:00");
    assert_eq!(upcoming[0].hall_name, "Blue");
}

#[test]
fn test_sessions_listed_for_movie() {
    let f = fixture();
    let other = Movie::new("Heat".to_string(), "A long night in LA".to_string());
    f.db.movies().create(&other).unwrap();
    f.db.sessions()
        .create(&MovieSession::new(
            other.id,
            f.hall.id,
            Utc.with_ymd_and_hms(2024, 3, 1, 22, 0, 0).unwrap(),
        ))
        .unwrap();
    let matinee = MovieSession::new(
        f.movie.id,
        f.hall.id,
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap(),
    );
    f.db.sessions().create(&matinee).unwrap();

    let listed: Vec<Uuid> = f
        .db
        .list_sessions_for_movie(f.movie.id)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed, vec![matinee.id, f.session.id]);
    assert!(f.db.list_sessions_for_movie(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn test_find_booked_ticket() {
    let f = fixture();
    let (order, tickets) = f.db.book_order(f.user.id, f.session.id, &[(3, 4)]).unwrap();

    let found = f.db.find_ticket_by_id(tickets[0].id).unwrap().unwrap();
    assert_eq!(found.order_id, order.id);
    assert_eq!((found.row, found.seat), (3, 4));
    assert!(f.db.find_ticket_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
#[should_panic(expected = "outside hall")]
fn test_seat_map_flags_ticket_outside_shrunk_hall() {
    let f = fixture();
    f.db.book_order(f.user.id, f.session.id, &[(5, 5)]).unwrap();
    f.db.conn
        .execute(
            r#"UPDATE cinema_halls SET "rows" = 2 WHERE id = ?1"#,
            [f.hall.id.to_string()],
        )
        .unwrap();

    let _ = f.db.seat_map(f.session.id);
}

#[test]
fn test_title_search_treats_wildcards_literally() {
    let f = fixture();
    f.db.movies()
        .create(&Movie::new("100% Wolf".to_string(), "A werewolf".to_string()))
        .unwrap();
    f.db.movies()
        .create(&Movie::new("Face_Off".to_string(), "Swapped faces".to_string()))
        .unwrap();

    let titles = |fragment: &str| -> Vec<String> {
        f.db.search_movies(fragment)
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect()
    };

    assert_eq!(titles("%"), vec!["100% Wolf"]);
    assert_eq!(titles("_"), vec!["Face_Off"]);
    assert_eq!(titles("s_eed"), Vec::<String>::new());
    assert_eq!(titles("\\"), Vec::<String>::new());
    assert_eq!(titles("spe"), vec!["Speed"]);
}

#[test]
fn test_duplicate_hall_id_reports_conflict() {
    let f = fixture();
    assert!(matches!(
        f.db.halls().create(&f.hall),
        Err(Error::Conflict(_))
    ));
}

#[test]
fn test_duplicate_movie_id_reports_conflict() {
    let f = fixture();
    assert!(matches!(
        f.db.movies().create(&f.movie),
        Err(Error::Conflict(_))
    ));
}

#[test]
fn test_deleting_genre_unlinks_movies() {
    let f = fixture();
    let genre = Genre::new("Thriller".to_string());
    f.db.genres().create(&genre).unwrap();
    f.db.movies().add_genre(f.movie.id, genre.id).unwrap();

    f.db.genres().delete(genre.id).unwrap();

    let movie = f.db.movies().find_by_id(f.movie.id).unwrap().unwrap();
    assert!(movie.genre_ids.is_empty());
}
