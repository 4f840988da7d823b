//! Order repository for the store read model.

use rust_decimal::Decimal;
use sqlx::PgPool;

use zendesk_bridge_core::{Email, OrderId};

use super::RepositoryError;
use crate::models::{AddressKind, CustomerSnapshot, OrderAddressRecord, OrderItemRecord, OrderRecord};

/// Read-only access to order headers, items, addresses, and payments.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The customer identity snapshot from the most recent order for the
    /// given email (exact match). This is the guest-checkout fallback when
    /// no registered account exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_customer_snapshot(
        &self,
        email: &Email,
    ) -> Result<Option<CustomerSnapshot>, RepositoryError> {
        let snapshot = sqlx::query_as::<_, CustomerSnapshot>(
            r"
            SELECT customer_email AS email,
                   customer_firstname AS firstname,
                   customer_lastname AS lastname,
                   customer_group_id AS group_id
            FROM sales_order
            WHERE customer_email = $1
            ORDER BY entity_id DESC
            LIMIT 1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(snapshot)
    }

    /// Sum of invoiced subtotals across every order matching the email.
    ///
    /// The match is deliberately loose (`ILIKE`, case-insensitive) where
    /// order listing is exact; the two behaviors are kept distinct. An
    /// empty or all-NULL aggregate yields zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lifetime_sales(&self, email: &Email) -> Result<Decimal, RepositoryError> {
        let sum = sqlx::query_scalar::<_, Option<Decimal>>(
            r"
            SELECT SUM(subtotal_invoiced)
            FROM sales_order
            WHERE customer_email ILIKE $1
            ",
        )
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(sum.unwrap_or_default())
    }

    /// The most recent orders for the email (exact match), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_for_email(
        &self,
        email: &Email,
        limit: i64,
    ) -> Result<Vec<OrderRecord>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRecord>(
            r"
            SELECT entity_id AS id, increment_id, store_id, created_at, status,
                   shipping_description, subtotal, shipping_amount, discount_amount,
                   tax_amount, grand_total, total_paid, total_refunded, total_due
            FROM sales_order
            WHERE customer_email = $1
            ORDER BY entity_id DESC
            LIMIT $2
            ",
        )
        .bind(email.as_str())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Visible line items for an order, in row order.
    ///
    /// Child rows of composite products carry `parent_item_id` and are
    /// excluded; the parent row already represents the purchase.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItemRecord>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItemRecord>(
            r"
            SELECT name, sku, original_price, price, qty_ordered, qty_invoiced,
                   qty_shipped, qty_refunded, qty_canceled, qty_backordered,
                   tax_amount, tax_percent, discount_amount, row_total
            FROM sales_order_item
            WHERE order_id = $1 AND parent_item_id IS NULL
            ORDER BY item_id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// An order's billing or shipping address, if it has one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn address_for_order(
        &self,
        order_id: OrderId,
        kind: AddressKind,
    ) -> Result<Option<OrderAddressRecord>, RepositoryError> {
        let address = sqlx::query_as::<_, OrderAddressRecord>(
            r"
            SELECT firstname, lastname, company, street, city, region,
                   postcode, country_id, telephone
            FROM sales_order_address
            WHERE parent_id = $1 AND address_type = $2
            ",
        )
        .bind(order_id)
        .bind(kind.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    /// The display title of the payment method used on an order.
    ///
    /// The store records it inside the payment row's
    /// `additional_information` JSON under `method_title`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn payment_title_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<String>, RepositoryError> {
        let title = sqlx::query_scalar::<_, Option<String>>(
            r"
            SELECT additional_information ->> 'method_title'
            FROM sales_order_payment
            WHERE parent_id = $1
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(title.flatten())
    }
}
