//! Ticket model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DISPLAY_TIME_FORMAT;
use crate::booking::TicketDraft;

/// A claim on one (row, seat) within one session, held by one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub movie_session_id: Uuid,
    pub order_id: Uuid,
    /// 1-based
    pub row: i32,
    /// 1-based
    pub seat: i32,
}

impl Ticket {
    pub fn new(movie_session_id: Uuid, order_id: Uuid, row: i32, seat: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_session_id,
            order_id,
            row,
            seat,
        }
    }
}

impl From<&TicketDraft> for Ticket {
    fn from(draft: &TicketDraft) -> Self {
        Ticket::new(draft.session_id, draft.order_id, draft.row, draft.seat)
    }
}

/// A ticket joined with its session's movie and show time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDisplay {
    pub id: Uuid,
    pub movie_title: String,
    pub show_time: DateTime<Utc>,
    pub row: i32,
    pub seat: i32,
}

impl std::fmt::Display for TicketDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (row: {}, seat: {})",
            self.movie_title,
            self.show_time.format(DISPLAY_TIME_FORMAT),
            self.row,
            self.seat
        )
    }
}
