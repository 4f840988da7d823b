//! Business services for the connector.

pub mod report;

pub use report::{CustomerReport, LineItem, OrderSummary, ReportService};
