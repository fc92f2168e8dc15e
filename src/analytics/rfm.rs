//! RFM customer segmentation
//!
//! Scores every customer in the filtered table on recency (days since
//! their last delivered order, relative to the newest delivery in the
//! table), frequency (distinct orders) and monetary (summed payments).

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::OrderRecord;

/// Chart labels use a truncated customer id.
const LABEL_LEN: usize = 5;

/// One customer's RFM scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRfm {
    pub customer_id: String,
    /// First characters of the id, for compact chart labeling.
    pub label: String,
    pub recency_days: i64,
    pub frequency: u64,
    pub monetary: f64,
}

/// Mean RFM scores across all customers, for the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmAverages {
    pub recency_days: f64,
    pub frequency: f64,
    pub monetary: f64,
}

/// Compute RFM scores per distinct customer, ordered by customer id.
pub fn rfm_by_customer(orders: &[OrderRecord]) -> Vec<CustomerRfm> {
    let Some(latest) = orders.iter().filter_map(|o| o.delivery_date()).max() else {
        return Vec::new();
    };

    struct Group<'a> {
        last_delivery: NaiveDate,
        order_ids: HashSet<&'a str>,
        monetary: f64,
    }

    let mut groups: BTreeMap<&str, Group> = BTreeMap::new();
    for order in orders {
        let Some(date) = order.delivery_date() else {
            continue;
        };
        let group = groups
            .entry(order.customer_id.as_str())
            .or_insert_with(|| Group {
                last_delivery: date,
                order_ids: HashSet::new(),
                monetary: 0.0,
            });
        group.last_delivery = group.last_delivery.max(date);
        group.order_ids.insert(order.order_id.as_str());
        group.monetary += order.payment_value;
    }

    groups
        .into_iter()
        .map(|(customer_id, group)| CustomerRfm {
            customer_id: customer_id.to_string(),
            label: customer_id.chars().take(LABEL_LEN).collect(),
            recency_days: latest.signed_duration_since(group.last_delivery).num_days(),
            frequency: group.order_ids.len() as u64,
            monetary: group.monetary,
        })
        .collect()
}

/// Customers with the smallest recency first (most recently active).
pub fn best_by_recency(rfm: &[CustomerRfm], n: usize) -> Vec<CustomerRfm> {
    sorted_take(rfm, n, |a, b| {
        a.recency_days
            .cmp(&b.recency_days)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    })
}

/// Customers with the most distinct orders first.
pub fn best_by_frequency(rfm: &[CustomerRfm], n: usize) -> Vec<CustomerRfm> {
    sorted_take(rfm, n, |a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    })
}

/// Customers with the largest total spend first.
pub fn best_by_monetary(rfm: &[CustomerRfm], n: usize) -> Vec<CustomerRfm> {
    sorted_take(rfm, n, |a, b| {
        b.monetary
            .partial_cmp(&a.monetary)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    })
}

fn sorted_take(
    rfm: &[CustomerRfm],
    n: usize,
    compare: impl Fn(&CustomerRfm, &CustomerRfm) -> Ordering,
) -> Vec<CustomerRfm> {
    let mut rows = rfm.to_vec();
    rows.sort_by(compare);
    rows.truncate(n);
    rows
}

/// Mean scores, `None` for an empty table.
pub fn averages(rfm: &[CustomerRfm]) -> Option<RfmAverages> {
    if rfm.is_empty() {
        return None;
    }
    let n = rfm.len() as f64;
    Some(RfmAverages {
        recency_days: rfm.iter().map(|r| r.recency_days as f64).sum::<f64>() / n,
        frequency: rfm.iter().map(|r| r.frequency as f64).sum::<f64>() / n,
        monetary: rfm.iter().map(|r| r.monetary).sum::<f64>() / n,
    })
}
