//! User storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::parse::{classify_write, parse_datetime, parse_datetime_opt, parse_uuid, OptionalExt};
use crate::auth::verify_password;
use crate::error::{Error, Result};
use crate::models::User;

pub struct UserStore<'a> {
    conn: &'a Connection,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        date_joined: parse_datetime(&row.get::<_, String>(4)?)?,
        last_login: parse_datetime_opt(row.get::<_, Option<String>>(5)?)?,
    })
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new user. Usernames are unique.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn create(&self, user: &User) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (id, username, email, password_hash, date_joined, last_login)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.to_string(),
                    user.username,
                    user.email,
                    user.password_hash,
                    user.date_joined.to_rfc3339(),
                    user.last_login.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| classify_write(e, "user"))?;
        Ok(())
    }

    /// Find user by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, email, password_hash, date_joined, last_login
                 FROM users WHERE id = ?1",
                params![id.to_string()],
                user_from_row,
            )
            .optional()?;

        Ok(user)
    }

    /// Find user by username
    #[instrument(skip(self))]
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, email, password_hash, date_joined, last_login
                 FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;

        Ok(user)
    }

    /// Update last login time
    pub fn update_last_login(&self, user_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), user_id.to_string()],
        )?;
        Ok(())
    }

    /// Check credentials and record the login
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let mut user = self
            .find_by_username(username)?
            .ok_or_else(|| Error::Authentication("User not found".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            warn!(username, "Rejected login");
            return Err(Error::Authentication("Invalid password".to_string()));
        }

        self.update_last_login(user.id)?;
        user.last_login = Some(Utc::now());
        Ok(user)
    }

    /// Delete a user
    ///
    /// Blocked with [`Error::ReferentialIntegrity`] while the user owns orders.
    #[instrument(skip(self))]
    pub fn delete(&self, user_id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM users WHERE id = ?1", params![user_id.to_string()])
            .map_err(|e| classify_write(e, "user"))?;
        Ok(())
    }
}
