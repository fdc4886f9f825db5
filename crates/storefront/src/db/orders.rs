//! Order writes and the duplicate-guard lookup.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use souq_core::orders::{NewOrder, Order, RecentOrder};
use souq_core::records::{ORDER_COLUMNS, OrderRow, RecentOrderRow};
use souq_core::{OrderId, OrderStatus, ProductId, RequesterFingerprint};

use super::RepositoryError;

/// Repository for storefront order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders for `product_id` from `fingerprint` created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(
        &self,
        product_id: ProductId,
        fingerprint: &RequesterFingerprint,
        since: DateTime<Utc>,
    ) -> Result<Vec<RecentOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecentOrderRow>(
            r"
            SELECT product_id, ip_address, created_at
            FROM orders
            WHERE product_id = $1 AND ip_address = $2 AND created_at >= $3
            ORDER BY created_at DESC
            ",
        )
        .bind(product_id)
        .bind(fingerprint.as_str())
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Persist a priced order with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row cannot be read back.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let checkout = &order.checkout;
        let destination = &checkout.destination;
        let selections = &checkout.selections;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (
                id, product_id, product_name, customer_name, customer_phone,
                wilaya, commune, full_address, ship_to_home, size, color, custom_options,
                quantity, unit_price, shipping_cost, total_price, status, ip_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(OrderId::generate())
        .bind(order.product_id)
        .bind(&order.product_name)
        .bind(&checkout.customer_name)
        .bind(checkout.phone.as_str())
        .bind(&destination.wilaya)
        .bind(destination.commune())
        .bind(destination.full_address())
        .bind(destination.ship_to_home())
        .bind(selections.size())
        .bind(selections.color())
        .bind(Json(&selections.custom))
        .bind(i32::try_from(checkout.quantity).map_err(|_| {
            RepositoryError::Conflict(format!("quantity {} is too large", checkout.quantity))
        })?)
        .bind(order.unit_price)
        .bind(order.shipping_cost)
        .bind(order.total_price)
        .bind(OrderStatus::Pending)
        .bind(order.fingerprint.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(Order::try_from(row)?)
    }
}
