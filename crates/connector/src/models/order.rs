//! Order, line-item, and address rows from the store read model.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use zendesk_bridge_core::{OrderId, StoreId};

/// An order header row.
///
/// Money columns are nullable in the source schema; absent values are
/// treated as zero when the order is shaped for the response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRecord {
    pub id: OrderId,
    pub increment_id: String,
    pub store_id: StoreId,
    pub created_at: DateTime<Utc>,
    pub status: Option<String>,
    pub shipping_description: Option<String>,
    pub subtotal: Option<Decimal>,
    pub shipping_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub grand_total: Option<Decimal>,
    pub total_paid: Option<Decimal>,
    pub total_refunded: Option<Decimal>,
    pub total_due: Option<Decimal>,
}

/// A line item on an order.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct OrderItemRecord {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub original_price: Option<Decimal>,
    pub price: Option<Decimal>,
    pub qty_ordered: Option<Decimal>,
    pub qty_invoiced: Option<Decimal>,
    pub qty_shipped: Option<Decimal>,
    pub qty_refunded: Option<Decimal>,
    pub qty_canceled: Option<Decimal>,
    pub qty_backordered: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub tax_percent: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub row_total: Option<Decimal>,
}

impl OrderItemRecord {
    /// The processing status of this line, derived from its quantity
    /// columns. The store never persists a per-line status; it is computed
    /// from how much of the ordered quantity has been canceled, refunded,
    /// shipped, or invoiced.
    #[must_use]
    pub fn status(&self) -> ItemStatus {
        let ordered = self.qty_ordered.unwrap_or_default();
        if ordered <= Decimal::ZERO {
            return ItemStatus::Ordered;
        }

        let invoiced = self.qty_invoiced.unwrap_or_default();
        let shipped = self.qty_shipped.unwrap_or_default();
        let refunded = self.qty_refunded.unwrap_or_default();
        let canceled = self.qty_canceled.unwrap_or_default();
        let backordered = self.qty_backordered.unwrap_or_default();

        if canceled >= ordered {
            ItemStatus::Canceled
        } else if refunded >= ordered {
            ItemStatus::Refunded
        } else if shipped >= ordered {
            ItemStatus::Shipped
        } else if invoiced >= ordered {
            ItemStatus::Invoiced
        } else if backordered > Decimal::ZERO {
            ItemStatus::Backordered
        } else if invoiced + shipped + refunded + canceled > Decimal::ZERO {
            ItemStatus::Partial
        } else {
            ItemStatus::Ordered
        }
    }
}

/// Display status of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Ordered,
    Invoiced,
    Shipped,
    Backordered,
    Canceled,
    Refunded,
    Partial,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ordered => "Ordered",
            Self::Invoiced => "Invoiced",
            Self::Shipped => "Shipped",
            Self::Backordered => "Backordered",
            Self::Canceled => "Canceled",
            Self::Refunded => "Refunded",
            Self::Partial => "Partial",
        };
        f.write_str(label)
    }
}

/// Which of an order's addresses to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Billing,
    Shipping,
}

impl AddressKind {
    /// The `address_type` discriminator value in the source schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Shipping => "shipping",
        }
    }
}

/// A billing or shipping address attached to an order.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct OrderAddressRecord {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub company: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country_id: Option<String>,
    pub telephone: Option<String>,
}

impl OrderAddressRecord {
    /// Render the address as display text, one component per line:
    /// name, company, street, `City, Region Postcode`, country, telephone.
    /// Missing components are skipped.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        let name = join_nonempty(&[self.firstname.as_deref(), self.lastname.as_deref()], " ");
        if !name.is_empty() {
            lines.push(name);
        }

        push_nonempty(&mut lines, self.company.as_deref());
        push_nonempty(&mut lines, self.street.as_deref());

        let region_postcode =
            join_nonempty(&[self.region.as_deref(), self.postcode.as_deref()], " ");
        let locality = join_nonempty(
            &[self.city.as_deref(), Some(region_postcode.as_str())],
            ", ",
        );
        if !locality.is_empty() {
            lines.push(locality);
        }

        push_nonempty(&mut lines, self.country_id.as_deref());

        if let Some(telephone) = self.telephone.as_deref().map(str::trim)
            && !telephone.is_empty()
        {
            lines.push(format!("T: {telephone}"));
        }

        lines.join("\n")
    }
}

fn push_nonempty(lines: &mut Vec<String>, part: Option<&str>) {
    if let Some(part) = part.map(str::trim)
        && !part.is_empty()
    {
        lines.push(part.to_owned());
    }
}

fn join_nonempty(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .filter_map(|p| *p)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn item(qtys: [&str; 6]) -> OrderItemRecord {
        let parse = |s: &str| -> Option<Decimal> { s.parse().ok() };
        OrderItemRecord {
            qty_ordered: parse(qtys[0]),
            qty_invoiced: parse(qtys[1]),
            qty_shipped: parse(qtys[2]),
            qty_refunded: parse(qtys[3]),
            qty_canceled: parse(qtys[4]),
            qty_backordered: parse(qtys[5]),
            ..OrderItemRecord::default()
        }
    }

    #[test]
    fn test_item_status_ordered() {
        assert_eq!(item(["2", "0", "0", "0", "0", "0"]).status(), ItemStatus::Ordered);
    }

    #[test]
    fn test_item_status_fully_processed() {
        assert_eq!(item(["2", "2", "2", "0", "0", "0"]).status(), ItemStatus::Shipped);
        assert_eq!(item(["2", "2", "0", "0", "0", "0"]).status(), ItemStatus::Invoiced);
        assert_eq!(item(["2", "2", "0", "2", "0", "0"]).status(), ItemStatus::Refunded);
        assert_eq!(item(["2", "0", "0", "0", "2", "0"]).status(), ItemStatus::Canceled);
    }

    #[test]
    fn test_item_status_cancel_wins_over_refund() {
        assert_eq!(item(["2", "0", "0", "2", "2", "0"]).status(), ItemStatus::Canceled);
    }

    #[test]
    fn test_item_status_backordered() {
        assert_eq!(item(["3", "0", "0", "0", "0", "1"]).status(), ItemStatus::Backordered);
    }

    #[test]
    fn test_item_status_partial() {
        assert_eq!(item(["3", "1", "0", "0", "0", "0"]).status(), ItemStatus::Partial);
        assert_eq!(item(["3", "0", "2", "0", "0", "0"]).status(), ItemStatus::Partial);
    }

    #[test]
    fn test_item_status_null_quantities() {
        assert_eq!(item(["", "", "", "", "", ""]).status(), ItemStatus::Ordered);
    }

    #[test]
    fn test_item_status_display() {
        assert_eq!(ItemStatus::Backordered.to_string(), "Backordered");
    }

    #[test]
    fn test_item_status_decimal_quantities() {
        let record = OrderItemRecord {
            qty_ordered: Some(dec!(1.5)),
            qty_shipped: Some(dec!(1.5)),
            qty_invoiced: Some(dec!(1.5)),
            ..OrderItemRecord::default()
        };
        assert_eq!(record.status(), ItemStatus::Shipped);
    }

    #[test]
    fn test_render_full_address() {
        let address = OrderAddressRecord {
            firstname: Some("Jane".into()),
            lastname: Some("Doe".into()),
            company: Some("Acme Ltd".into()),
            street: Some("1 Main St".into()),
            city: Some("Springfield".into()),
            region: Some("IL".into()),
            postcode: Some("62701".into()),
            country_id: Some("US".into()),
            telephone: Some("555-0100".into()),
        };
        assert_eq!(
            address.render(),
            "Jane Doe\nAcme Ltd\n1 Main St\nSpringfield, IL 62701\nUS\nT: 555-0100"
        );
    }

    #[test]
    fn test_render_skips_missing_components() {
        let address = OrderAddressRecord {
            firstname: Some("Jane".into()),
            city: Some("Springfield".into()),
            postcode: Some("62701".into()),
            ..OrderAddressRecord::default()
        };
        assert_eq!(address.render(), "Jane\nSpringfield, 62701");
    }

    #[test]
    fn test_render_empty_address() {
        assert_eq!(OrderAddressRecord::default().render(), "");
    }

    #[test]
    fn test_address_kind_discriminator() {
        assert_eq!(AddressKind::Billing.as_str(), "billing");
        assert_eq!(AddressKind::Shipping.as_str(), "shipping");
    }
}
