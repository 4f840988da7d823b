//! Customer order report aggregation.
//!
//! Given an email address, this service assembles the consolidated view the
//! support platform renders next to a ticket: who the customer is, what
//! they have spent over their lifetime, and their most recent orders with
//! line items.
//!
//! Missing data never fails a report. A customer without an account falls
//! back to the identity snapshot on their most recent order (guest
//! checkout); unresolvable labels and empty descriptions come back as `-`;
//! absent money values count as zero. Only a failing database read
//! propagates as an error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;

use zendesk_bridge_core::{CurrencyCode, Email, GroupId, format_store_datetime};

use crate::db::{
    CustomerRepository, GroupRepository, OrderRepository, RepositoryError, StoreRepository,
};
use crate::models::{
    AddressKind, CustomerRecord, CustomerSnapshot, OrderAddressRecord, OrderItemRecord, OrderRecord,
};

/// Placeholder for display fields with no resolvable value.
const PLACEHOLDER: &str = "-";

/// The consolidated response document.
///
/// Field order is fixed; repeated reports over unchanged data serialize to
/// byte-identical JSON. Identity fields are omitted entirely when the email
/// has neither an account nor any order.
#[derive(Debug, Serialize)]
pub struct CustomerReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub group: String,
    pub lifetime_sales: String,
    pub orders: Vec<OrderSummary>,
}

/// One order in the report, money fields pre-formatted.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub increment_id: String,
    pub created_at: String,
    pub status: Option<String>,
    pub store_name: String,
    pub billing_address: String,
    pub shipping_address: String,
    pub subtotal: String,
    pub shipping_amount: String,
    pub discount_amount: String,
    pub tax_amount: String,
    pub grand_total: String,
    pub total_paid: String,
    pub total_refunded: String,
    pub total_due: String,
    pub payment_method: String,
    pub shipping_method: String,
    pub items: Vec<LineItem>,
}

/// One visible line item; quantities stay numeric, money is formatted.
#[derive(Debug, Serialize)]
pub struct LineItem {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub status: String,
    pub original_price: String,
    pub price: String,
    pub qty_ordered: f64,
    pub subtotal: String,
    pub tax_amount: String,
    pub tax_percent: f64,
    pub discount: String,
    pub total: String,
}

/// Customer identity resolved from whichever source the store has.
///
/// The two sources are mutually exclusive: an account row wins, and only
/// when none exists does the most recent order's snapshot apply.
#[derive(Debug, Default)]
struct CustomerIdentity {
    email: Option<String>,
    firstname: Option<String>,
    lastname: Option<String>,
    created_at: Option<DateTime<Utc>>,
    group_id: Option<GroupId>,
}

impl CustomerIdentity {
    fn from_account(account: CustomerRecord) -> Self {
        Self {
            email: Some(account.email),
            firstname: account.firstname,
            lastname: account.lastname,
            created_at: Some(account.created_at),
            group_id: account.group_id,
        }
    }

    fn from_order_snapshot(snapshot: CustomerSnapshot) -> Self {
        Self {
            email: snapshot.email,
            firstname: snapshot.firstname,
            lastname: snapshot.lastname,
            created_at: None,
            group_id: snapshot.group_id,
        }
    }
}

/// Aggregates customer identity and order history into a [`CustomerReport`].
pub struct ReportService<'a> {
    pool: &'a PgPool,
    currency: CurrencyCode,
    order_limit: i64,
}

impl<'a> ReportService<'a> {
    /// Create a new report service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, currency: CurrencyCode, order_limit: i64) -> Self {
        Self {
            pool,
            currency,
            order_limit,
        }
    }

    /// Build the report for one email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only when a database read fails; missing
    /// data degrades to defaults instead.
    pub async fn customer_report(&self, email: &Email) -> Result<CustomerReport, RepositoryError> {
        let customers = CustomerRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);
        let groups = GroupRepository::new(self.pool);
        let stores = StoreRepository::new(self.pool);

        let identity = match customers.find_by_email(email).await? {
            Some(account) => CustomerIdentity::from_account(account),
            None => orders
                .latest_customer_snapshot(email)
                .await?
                .map(CustomerIdentity::from_order_snapshot)
                .unwrap_or_default(),
        };

        let group = match identity.group_id {
            Some(id) => groups
                .code_by_id(id)
                .await?
                .unwrap_or_else(|| PLACEHOLDER.to_owned()),
            None => PLACEHOLDER.to_owned(),
        };

        let lifetime_sales = orders.lifetime_sales(email).await?;

        let recent = orders.recent_for_email(email, self.order_limit).await?;
        let mut order_summaries = Vec::with_capacity(recent.len());
        for order in recent {
            order_summaries.push(self.order_summary(&orders, &stores, order).await?);
        }

        Ok(assemble_report(
            identity,
            group,
            lifetime_sales,
            order_summaries,
            self.currency,
        ))
    }

    async fn order_summary(
        &self,
        orders: &OrderRepository<'_>,
        stores: &StoreRepository<'_>,
        order: OrderRecord,
    ) -> Result<OrderSummary, RepositoryError> {
        let billing = orders.address_for_order(order.id, AddressKind::Billing).await?;
        let shipping = orders.address_for_order(order.id, AddressKind::Shipping).await?;
        let store_name = stores.website_name(order.store_id).await?;
        let payment_title = orders.payment_title_for_order(order.id).await?;
        let items = orders.items_for_order(order.id).await?;

        Ok(shape_order(
            &order,
            billing,
            shipping,
            store_name,
            payment_title,
            &items,
            self.currency,
        ))
    }
}

fn assemble_report(
    identity: CustomerIdentity,
    group: String,
    lifetime_sales: Decimal,
    orders: Vec<OrderSummary>,
    currency: CurrencyCode,
) -> CustomerReport {
    CustomerReport {
        email: identity.email,
        firstname: identity.firstname,
        lastname: identity.lastname,
        created_at: identity.created_at.map(format_store_datetime),
        group,
        lifetime_sales: currency.format_amount(lifetime_sales),
        orders,
    }
}

fn shape_order(
    order: &OrderRecord,
    billing: Option<OrderAddressRecord>,
    shipping: Option<OrderAddressRecord>,
    store_name: Option<String>,
    payment_title: Option<String>,
    items: &[OrderItemRecord],
    currency: CurrencyCode,
) -> OrderSummary {
    let money = |value: Option<Decimal>| currency.format_amount(value.unwrap_or_default());

    OrderSummary {
        increment_id: order.increment_id.clone(),
        created_at: format_store_datetime(order.created_at),
        status: order.status.clone(),
        store_name: store_name.unwrap_or_else(|| PLACEHOLDER.to_owned()),
        billing_address: billing.map_or_else(|| PLACEHOLDER.to_owned(), |a| a.render()),
        shipping_address: shipping.map_or_else(|| PLACEHOLDER.to_owned(), |a| a.render()),
        subtotal: money(order.subtotal),
        shipping_amount: money(order.shipping_amount),
        discount_amount: money(order.discount_amount),
        tax_amount: money(order.tax_amount),
        grand_total: money(order.grand_total),
        total_paid: money(order.total_paid),
        total_refunded: money(order.total_refunded),
        total_due: money(order.total_due),
        payment_method: non_empty_or_placeholder(payment_title),
        shipping_method: non_empty_or_placeholder(order.shipping_description.clone()),
        items: items
            .iter()
            .map(|item| shape_line_item(item, currency))
            .collect(),
    }
}

fn non_empty_or_placeholder(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

fn shape_line_item(item: &OrderItemRecord, currency: CurrencyCode) -> LineItem {
    let price = item.price.unwrap_or_default();
    let qty_ordered = item.qty_ordered.unwrap_or_default();
    let discount = item.discount_amount.unwrap_or_default();

    // Recomputed from quantity, price, and discount; the stored row totals
    // are not used for these two fields.
    let subtotal = qty_ordered * price;
    let total = item.row_total.unwrap_or_default() - discount;

    LineItem {
        name: item.name.clone(),
        sku: item.sku.clone(),
        status: item.status().to_string(),
        original_price: currency.format_amount(item.original_price.unwrap_or_default()),
        price: currency.format_amount(price),
        qty_ordered: qty_ordered.to_f64().unwrap_or_default(),
        subtotal: currency.format_amount(subtotal),
        tax_amount: currency.format_amount(item.tax_amount.unwrap_or_default()),
        tax_percent: item.tax_percent.unwrap_or_default().to_f64().unwrap_or_default(),
        discount: currency.format_amount(discount),
        total: currency.format_amount(total),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::dec;

    use zendesk_bridge_core::{OrderId, StoreId};

    use super::*;

    fn order_record() -> OrderRecord {
        OrderRecord {
            id: OrderId::new(11),
            increment_id: "100000011".to_owned(),
            store_id: StoreId::new(1),
            created_at: Utc.with_ymd_and_hms(2024, 4, 2, 15, 4, 5).unwrap(),
            status: Some("processing".to_owned()),
            shipping_description: Some("Flat Rate - Fixed".to_owned()),
            subtotal: Some(dec!(20.00)),
            shipping_amount: Some(dec!(5.00)),
            discount_amount: Some(dec!(1.00)),
            tax_amount: Some(dec!(1.60)),
            grand_total: Some(dec!(25.60)),
            total_paid: Some(dec!(25.60)),
            total_refunded: None,
            total_due: Some(dec!(0)),
        }
    }

    #[test]
    fn test_line_item_recomputes_subtotal_and_total() {
        let item = OrderItemRecord {
            name: Some("Widget".to_owned()),
            sku: Some("WID-1".to_owned()),
            price: Some(dec!(10.00)),
            qty_ordered: Some(dec!(2)),
            discount_amount: Some(dec!(1.00)),
            row_total: Some(dec!(20.00)),
            ..OrderItemRecord::default()
        };

        let line = shape_line_item(&item, CurrencyCode::USD);
        assert_eq!(line.subtotal, "$20.00");
        assert_eq!(line.total, "$19.00");
        assert!((line.qty_ordered - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_item_defaults_when_columns_null() {
        let line = shape_line_item(&OrderItemRecord::default(), CurrencyCode::USD);
        assert_eq!(line.subtotal, "$0.00");
        assert_eq!(line.total, "$0.00");
        assert_eq!(line.status, "Ordered");
        assert!(line.qty_ordered.abs() < f64::EPSILON);
        assert!(line.tax_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_item_tax_percent_numeric() {
        let item = OrderItemRecord {
            tax_percent: Some(dec!(8.25)),
            ..OrderItemRecord::default()
        };
        let line = shape_line_item(&item, CurrencyCode::USD);
        assert!((line.tax_percent - 8.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shape_order_defaults() {
        let mut record = order_record();
        record.shipping_description = Some(String::new());

        let summary = shape_order(&record, None, None, None, None, &[], CurrencyCode::USD);
        assert_eq!(summary.billing_address, "-");
        assert_eq!(summary.shipping_address, "-");
        assert_eq!(summary.store_name, "-");
        assert_eq!(summary.payment_method, "-");
        assert_eq!(summary.shipping_method, "-");
        assert_eq!(summary.total_refunded, "$0.00");
    }

    #[test]
    fn test_shape_order_resolved_fields() {
        let record = order_record();
        let billing = OrderAddressRecord {
            firstname: Some("Jane".into()),
            lastname: Some("Doe".into()),
            city: Some("Springfield".into()),
            ..OrderAddressRecord::default()
        };

        let summary = shape_order(
            &record,
            Some(billing),
            None,
            Some("Main Website".to_owned()),
            Some("Credit Card".to_owned()),
            &[],
            CurrencyCode::USD,
        );

        assert_eq!(summary.increment_id, "100000011");
        assert_eq!(summary.created_at, "Apr 2, 2024 3:04:05 PM");
        assert_eq!(summary.store_name, "Main Website");
        assert_eq!(summary.billing_address, "Jane Doe\nSpringfield");
        assert_eq!(summary.payment_method, "Credit Card");
        assert_eq!(summary.shipping_method, "Flat Rate - Fixed");
        assert_eq!(summary.grand_total, "$25.60");
    }

    #[test]
    fn test_guest_fallback_populates_identity_from_snapshot() {
        let snapshot = CustomerSnapshot {
            email: Some("guest@example.com".to_owned()),
            firstname: Some("Guest".to_owned()),
            lastname: Some("Buyer".to_owned()),
            group_id: None,
        };

        let report = assemble_report(
            CustomerIdentity::from_order_snapshot(snapshot),
            PLACEHOLDER.to_owned(),
            dec!(42.00),
            Vec::new(),
            CurrencyCode::USD,
        );

        assert_eq!(report.email.as_deref(), Some("guest@example.com"));
        assert_eq!(report.firstname.as_deref(), Some("Guest"));
        // Guest snapshots carry no registration date.
        assert!(report.created_at.is_none());
        assert_eq!(report.group, "-");
        assert_eq!(report.lifetime_sales, "$42.00");
    }

    #[test]
    fn test_unknown_email_yields_defaults_only() {
        let report = assemble_report(
            CustomerIdentity::default(),
            PLACEHOLDER.to_owned(),
            Decimal::ZERO,
            Vec::new(),
            CurrencyCode::USD,
        );

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            "{\"group\":\"-\",\"lifetime_sales\":\"$0.00\",\"orders\":[]}"
        );
    }

    #[test]
    fn test_registered_identity_field_order_and_idempotence() {
        let account = CustomerRecord {
            id: zendesk_bridge_core::CustomerId::new(7),
            email: "jane@example.com".to_owned(),
            firstname: Some("Jane".to_owned()),
            lastname: Some("Doe".to_owned()),
            created_at: Utc.with_ymd_and_hms(2023, 1, 9, 11, 59, 59).unwrap(),
            group_id: Some(GroupId::new(1)),
        };

        let build = || {
            assemble_report(
                CustomerIdentity::from_account(account.clone()),
                "General".to_owned(),
                dec!(10.50),
                Vec::new(),
                CurrencyCode::USD,
            )
        };

        let first = serde_json::to_string(&build()).unwrap();
        let second = serde_json::to_string(&build()).unwrap();
        assert_eq!(first, second);

        assert_eq!(
            first,
            "{\"email\":\"jane@example.com\",\"firstname\":\"Jane\",\"lastname\":\"Doe\",\
             \"created_at\":\"Jan 9, 2023 11:59:59 AM\",\"group\":\"General\",\
             \"lifetime_sales\":\"$10.50\",\"orders\":[]}"
        );
    }

    #[test]
    fn test_group_id_never_serialized() {
        let account = CustomerRecord {
            id: zendesk_bridge_core::CustomerId::new(7),
            email: "jane@example.com".to_owned(),
            firstname: None,
            lastname: None,
            created_at: Utc.with_ymd_and_hms(2023, 1, 9, 11, 59, 59).unwrap(),
            group_id: Some(GroupId::new(3)),
        };

        let report = assemble_report(
            CustomerIdentity::from_account(account),
            "Wholesale".to_owned(),
            Decimal::ZERO,
            Vec::new(),
            CurrencyCode::USD,
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("group_id"));
        assert!(json.contains("\"group\":\"Wholesale\""));
    }
}
