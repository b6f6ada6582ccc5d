//! Order storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{classify_write, parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Order;

pub struct OrderStore<'a> {
    conn: &'a Connection,
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        created_at: parse_datetime(&row.get::<_, String>(1)?)?,
        user_id: parse_uuid(&row.get::<_, String>(2)?)?,
    })
}

impl<'a> OrderStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create an order. The owning user must exist.
    #[instrument(skip(self, order), fields(order_id = %order.id, user_id = %order.user_id))]
    pub fn create(&self, order: &Order) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO orders (id, created_at, user_id) VALUES (?1, ?2, ?3)",
                params![
                    order.id.to_string(),
                    order.created_at.to_rfc3339(),
                    order.user_id.to_string(),
                ],
            )
            .map_err(|e| classify_write(e, "order"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        let order = self
            .conn
            .query_row(
                "SELECT id, created_at, user_id FROM orders WHERE id = ?1",
                params![id.to_string()],
                order_from_row,
            )
            .optional()?;

        Ok(order)
    }

    /// A user's orders, newest first
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, user_id FROM orders
             WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;

        let orders = stmt
            .query_map(params![user_id.to_string()], order_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(orders)
    }

    /// Delete an order
    ///
    /// Blocked with a referential integrity error while it holds tickets.
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM orders WHERE id = ?1", params![id.to_string()])
            .map_err(|e| classify_write(e, "order"))?;
        Ok(())
    }
}
