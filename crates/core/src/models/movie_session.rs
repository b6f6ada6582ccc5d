//! Movie session model - one screening of a movie in a hall

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DISPLAY_TIME_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSession {
    pub id: Uuid,
    pub show_time: DateTime<Utc>,
    pub cinema_hall_id: Uuid,
    pub movie_id: Uuid,
}

impl MovieSession {
    pub fn new(movie_id: Uuid, cinema_hall_id: Uuid, show_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            show_time,
            cinema_hall_id,
            movie_id,
        }
    }
}

/// A session joined with its movie title, for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSessionDisplay {
    pub id: Uuid,
    pub movie_title: String,
    pub hall_name: String,
    pub show_time: DateTime<Utc>,
}

impl std::fmt::Display for MovieSessionDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.movie_title,
            self.show_time.format(DISPLAY_TIME_FORMAT)
        )
    }
}
