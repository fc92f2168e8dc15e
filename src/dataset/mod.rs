//! Order table loading
//!
//! The dashboard works off a single denormalized CSV where each row is one
//! payment installment of one order item. The table is loaded once at
//! startup, parsed into typed records and kept in memory; every request
//! recomputes its aggregates from this immutable snapshot.

mod error;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use error::DatasetError;

/// Timestamp format used by all five timestamp columns.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the order table.
///
/// An `order_id` may appear on multiple rows, once per item or payment
/// installment. Order-level counts must therefore deduplicate on
/// `order_id`, while payment sums stay row-level.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub customer_city: String,
    pub payment_type: String,
    pub payment_value: f64,
    pub product_category: String,
    pub purchased_at: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub delivered_to_carrier_at: Option<NaiveDateTime>,
    /// Missing when the order never reached the customer.
    pub delivered_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
    /// Purchase year, used for yearly category breakdowns.
    pub year: i32,
}

impl OrderRecord {
    /// Calendar date of customer delivery, if the order was delivered.
    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivered_at.map(|t| t.date())
    }
}

/// Raw CSV row. Timestamps stay as text here so that parse failures can
/// report the offending column and line.
#[derive(Debug, Deserialize)]
struct RawRecord {
    order_id: String,
    customer_id: String,
    customer_city: String,
    payment_type: String,
    payment_value: f64,
    #[serde(rename = "product_category_name_english")]
    product_category: String,
    order_purchase_timestamp: String,
    order_approved_at: String,
    order_delivered_carrier_date: String,
    order_delivered_customer_date: String,
    order_estimated_delivery_date: String,
    year: i32,
}

fn parse_timestamp(
    column: &'static str,
    value: &str,
    line: u64,
) -> Result<NaiveDateTime, DatasetError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| {
        DatasetError::InvalidTimestamp {
            column,
            value: value.to_string(),
            line,
        }
    })
}

/// Empty cells mean the event never happened (e.g. undelivered orders).
fn parse_optional_timestamp(
    column: &'static str,
    value: &str,
    line: u64,
) -> Result<Option<NaiveDateTime>, DatasetError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(column, value, line).map(Some)
}

/// The loaded order table, sorted ascending by delivery date with
/// undelivered rows at the end.
#[derive(Debug, Clone)]
pub struct Dataset {
    orders: Vec<OrderRecord>,
}

impl Dataset {
    /// Load the table from the first candidate path that exists.
    ///
    /// The candidate list is tried in order; only existence selects a
    /// path, so a file that exists but fails to parse is a hard error
    /// rather than a reason to fall through.
    pub fn load(candidates: &[PathBuf]) -> Result<Self, DatasetError> {
        let path = candidates
            .iter()
            .find(|p| p.exists())
            .ok_or_else(|| DatasetError::NotFound {
                candidates: candidates.to_vec(),
            })?;
        info!("Loading order table from {}", path.display());
        Self::from_path(path)
    }

    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        Self::from_reader(File::open(path)?)
    }

    /// Build a dataset from already-typed records, applying the same
    /// delivery-date ordering as a file load.
    pub fn from_records(mut orders: Vec<OrderRecord>) -> Self {
        orders.sort_by(|a, b| match (a.delivered_at, b.delivered_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Self { orders }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut orders = Vec::new();

        for result in csv_reader.deserialize() {
            let raw: RawRecord = result?;
            // Header is line 1, first record line 2.
            let line = orders.len() as u64 + 2;
            orders.push(OrderRecord {
                order_id: raw.order_id,
                customer_id: raw.customer_id,
                customer_city: raw.customer_city,
                payment_type: raw.payment_type,
                payment_value: raw.payment_value,
                product_category: raw.product_category,
                purchased_at: parse_timestamp(
                    "order_purchase_timestamp",
                    &raw.order_purchase_timestamp,
                    line,
                )?,
                approved_at: parse_optional_timestamp(
                    "order_approved_at",
                    &raw.order_approved_at,
                    line,
                )?,
                delivered_to_carrier_at: parse_optional_timestamp(
                    "order_delivered_carrier_date",
                    &raw.order_delivered_carrier_date,
                    line,
                )?,
                delivered_at: parse_optional_timestamp(
                    "order_delivered_customer_date",
                    &raw.order_delivered_customer_date,
                    line,
                )?,
                estimated_delivery_at: parse_optional_timestamp(
                    "order_estimated_delivery_date",
                    &raw.order_estimated_delivery_date,
                    line,
                )?,
                year: raw.year,
            });
        }

        Ok(Self::from_records(orders))
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Earliest and latest customer delivery dates, bounding the
    /// dashboard's date picker. `None` when no row was ever delivered.
    pub fn delivery_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.orders.iter().filter_map(|o| o.delivery_date());
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some((min, max))
    }
}
