//! Daily order and revenue series

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::DateRange;
use crate::dataset::OrderRecord;

/// One day's bucket of the revenue series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    /// Distinct orders delivered that day, not installment rows.
    pub order_count: u64,
    /// Row-level payment sum, so every installment counts.
    pub revenue: f64,
}

/// Bucket filtered rows into one-day buckets over the requested range.
///
/// Every day of the range appears in the output, zero-filled when no
/// order was delivered that day; the chart axis stays continuous.
pub fn daily_orders(orders: &[OrderRecord], range: DateRange) -> Vec<DailyOrders> {
    let mut buckets: BTreeMap<NaiveDate, (HashSet<&str>, f64)> = BTreeMap::new();

    for order in orders {
        let Some(date) = order.delivery_date() else {
            continue;
        };
        if !range.contains(date) {
            continue;
        }
        let bucket = buckets.entry(date).or_default();
        bucket.0.insert(order.order_id.as_str());
        bucket.1 += order.payment_value;
    }

    range
        .days()
        .map(|date| match buckets.get(&date) {
            Some((ids, revenue)) => DailyOrders {
                date,
                order_count: ids.len() as u64,
                revenue: *revenue,
            },
            None => DailyOrders {
                date,
                order_count: 0,
                revenue: 0.0,
            },
        })
        .collect()
}

/// Headline order total: sum of per-day distinct-order counts. Buckets
/// never overlap, so this equals the distinct count over the whole range.
pub fn total_orders(daily: &[DailyOrders]) -> u64 {
    daily.iter().map(|d| d.order_count).sum()
}

pub fn total_revenue(daily: &[DailyOrders]) -> f64 {
    daily.iter().map(|d| d.revenue).sum()
}
