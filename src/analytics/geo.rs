//! Customer geography and payment-mix aggregations

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::dataset::OrderRecord;

/// Distinct customers per city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCustomers {
    pub city: String,
    pub customer_count: u64,
}

/// Distinct customers per payment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentTypeCustomers {
    pub payment_type: String,
    pub customer_count: u64,
}

/// Combined per-city activity. Counts here are row counts by design:
/// a customer or order with several installment rows weighs once per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityActivity {
    pub city: String,
    pub count_users: u64,
    pub count_orders: u64,
    pub total_revenue: f64,
}

fn distinct_customers_by<'a>(
    orders: &'a [OrderRecord],
    key: impl Fn(&'a OrderRecord) -> &'a str,
) -> Vec<(String, u64)> {
    let mut groups: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for order in orders {
        groups
            .entry(key(order))
            .or_default()
            .insert(order.customer_id.as_str());
    }

    let mut rows: Vec<(String, u64)> = groups
        .into_iter()
        .map(|(group, customers)| (group.to_string(), customers.len() as u64))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Distinct-customer counts per city, largest first.
pub fn customers_by_city(orders: &[OrderRecord]) -> Vec<CityCustomers> {
    distinct_customers_by(orders, |o| o.customer_city.as_str())
        .into_iter()
        .map(|(city, customer_count)| CityCustomers {
            city,
            customer_count,
        })
        .collect()
}

/// Distinct-customer counts per payment type, largest first.
pub fn customers_by_payment_type(orders: &[OrderRecord]) -> Vec<PaymentTypeCustomers> {
    distinct_customers_by(orders, |o| o.payment_type.as_str())
        .into_iter()
        .map(|(payment_type, customer_count)| PaymentTypeCustomers {
            payment_type,
            customer_count,
        })
        .collect()
}

/// Per-city row counts and revenue, most orders first. Top-N trimming is
/// left to the caller.
pub fn city_activity(orders: &[OrderRecord]) -> Vec<CityActivity> {
    let mut groups: BTreeMap<&str, (u64, u64, f64)> = BTreeMap::new();

    for order in orders {
        let group = groups.entry(order.customer_city.as_str()).or_default();
        group.0 += 1;
        group.1 += 1;
        group.2 += order.payment_value;
    }

    let mut rows: Vec<CityActivity> = groups
        .into_iter()
        .map(|(city, (count_users, count_orders, total_revenue))| CityActivity {
            city: city.to_string(),
            count_users,
            count_orders,
            total_revenue,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count_orders
            .cmp(&a.count_orders)
            .then_with(|| a.city.cmp(&b.city))
    });
    rows
}
