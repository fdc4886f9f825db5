//! Order listing, deletion and status transitions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use souq_core::catalog::Stock;
use souq_core::orders::{
    InventoryEffect, InventoryError, Order, OrderFilter, StatusChange, plan_status_change,
};
use souq_core::records::{ORDER_COLUMNS, OrderRow};
use souq_core::{OrderId, OrderStatus, ProductId};

use super::RepositoryError;

/// Errors from moving an order to a new status.
#[derive(Debug, Error)]
pub enum StatusChangeError {
    #[error("order not found")]
    NotFound,

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for StatusChangeError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(err.into())
    }
}

/// The order after a status change, with what happened to stock.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub order: Order,
    pub change: StatusChange,
}

/// Repository for merchant order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders matching `filter`, newest first.
    ///
    /// `now` anchors the relative date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored order is malformed.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE TRUE"));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(product_id) = filter.product_id {
            query.push(" AND product_id = ").push_bind(product_id);
        }
        if let Some(product_type_id) = filter.product_type_id {
            query
                .push(" AND product_id IN (SELECT id FROM products WHERE product_type_id = ")
                .push_bind(product_type_id)
                .push(")");
        }
        if let Some(wilaya) = filter.wilaya() {
            query.push(" AND wilaya = ").push_bind(wilaya.to_owned());
        }
        if let Some(since) = filter.range.since(now) {
            query.push(" AND created_at >= ").push_bind(since);
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query
            .build_query_as::<OrderRow>()
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|row| Order::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Order::try_from(row)?)
    }

    /// Delete an order. Stock already decremented for it is not restored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Move an order to `target` and apply the inventory effect of the move.
    ///
    /// The order row and its product row are locked for the duration, and
    /// the change is planned against the stored status, so concurrent
    /// requests cannot decrement stock twice for one delivery.
    ///
    /// # Errors
    ///
    /// Returns `StatusChangeError::NotFound` if the order does not exist.
    /// Returns `StatusChangeError::Inventory` if limited stock cannot cover
    /// the order; nothing is written in that case.
    pub async fn change_status(
        &self,
        id: OrderId,
        target: OrderStatus,
    ) -> Result<StatusUpdate, StatusChangeError> {
        let mut tx = self.pool.begin().await?;

        let (current, product_id, stored_quantity): (OrderStatus, Option<ProductId>, i32) =
            sqlx::query_as(
                "SELECT status, product_id, quantity FROM orders WHERE id = $1 FOR UPDATE",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StatusChangeError::NotFound)?;

        let quantity = u32::try_from(stored_quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "orders.quantity is negative: {stored_quantity}"
            ))
        })?;

        let stock = match product_id {
            Some(product_id) => {
                let max_quantity: Option<Option<i32>> = sqlx::query_scalar(
                    "SELECT max_quantity FROM products WHERE id = $1 FOR UPDATE",
                )
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
                max_quantity.map(stock_from_column).transpose()?
            }
            None => None,
        };

        let change = plan_status_change(current, target, quantity, stock)?;

        if let InventoryEffect::Decremented { before, .. } = change.inventory
            && let Some(product_id) = product_id
        {
            let result = sqlx::query(
                r"
                UPDATE products
                SET max_quantity = max_quantity - $2, updated_at = NOW()
                WHERE id = $1 AND max_quantity IS NOT NULL AND max_quantity >= $2
                ",
            )
            .bind(product_id)
            .bind(stored_quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(InventoryError::Insufficient {
                    available: before,
                    requested: quantity,
                }
                .into());
            }
        }

        let row = if change.is_noop() {
            sqlx::query_as::<_, OrderRow>(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
            ))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, OrderRow>(&format!(
                r"
                UPDATE orders SET status = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING {ORDER_COLUMNS}
                "
            ))
            .bind(id)
            .bind(target)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;

        let order = Order::try_from(row).map_err(RepositoryError::from)?;

        match change.inventory {
            InventoryEffect::Decremented { before, after } => tracing::info!(
                order_id = %id,
                from = %change.from,
                to = %change.to,
                stock_before = before,
                stock_after = after,
                "Order status changed, stock decremented"
            ),
            InventoryEffect::Orphaned => tracing::warn!(
                order_id = %id,
                to = %change.to,
                "Order delivered after its product was deleted, no stock to decrement"
            ),
            InventoryEffect::Unchanged | InventoryEffect::Exempt => tracing::info!(
                order_id = %id,
                from = %change.from,
                to = %change.to,
                "Order status changed"
            ),
        }

        Ok(StatusUpdate { order, change })
    }
}

fn stock_from_column(max_quantity: Option<i32>) -> Result<Stock, RepositoryError> {
    match max_quantity {
        None => Ok(Stock::Unlimited),
        Some(max) => u32::try_from(max).map(Stock::Limited).map_err(|_| {
            RepositoryError::DataCorruption(format!("products.max_quantity is negative: {max}"))
        }),
    }
}
