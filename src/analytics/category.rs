//! Product category aggregations

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::dataset::OrderRecord;

/// Revenue and order volume for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub category: String,
    /// Distinct orders touching the category.
    pub order_count: u64,
    pub revenue: f64,
}

/// Revenue for one category within one purchase year.
///
/// `count_orders` is a row count, unlike the flat variant's distinct
/// count. The divergence is inherited from the source analysis and kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyCategorySales {
    pub year: i32,
    pub category: String,
    pub count_orders: u64,
    pub total_revenue: f64,
}

/// Group by category, sorted by revenue descending. Ties break on the
/// category name so the ordering is deterministic.
pub fn sales_by_category(orders: &[OrderRecord]) -> Vec<CategorySales> {
    let mut groups: HashMap<&str, (HashSet<&str>, f64)> = HashMap::new();

    for order in orders {
        let group = groups.entry(order.product_category.as_str()).or_default();
        group.0.insert(order.order_id.as_str());
        group.1 += order.payment_value;
    }

    let mut rows: Vec<CategorySales> = groups
        .into_iter()
        .map(|(category, (ids, revenue))| CategorySales {
            category: category.to_string(),
            order_count: ids.len() as u64,
            revenue,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Group by (year, category) and keep each year's top `per_year`
/// categories by revenue. Output is ordered by year ascending, then
/// revenue descending within the year.
pub fn top_categories_by_year(orders: &[OrderRecord], per_year: usize) -> Vec<YearlyCategorySales> {
    let mut groups: BTreeMap<(i32, &str), (u64, f64)> = BTreeMap::new();

    for order in orders {
        let group = groups
            .entry((order.year, order.product_category.as_str()))
            .or_default();
        group.0 += 1;
        group.1 += order.payment_value;
    }

    let mut by_year: BTreeMap<i32, Vec<YearlyCategorySales>> = BTreeMap::new();
    for ((year, category), (count_orders, total_revenue)) in groups {
        by_year.entry(year).or_default().push(YearlyCategorySales {
            year,
            category: category.to_string(),
            count_orders,
            total_revenue,
        });
    }

    let mut rows = Vec::new();
    for (_, mut year_rows) in by_year {
        year_rows.sort_by(|a, b| {
            b.total_revenue
                .partial_cmp(&a.total_revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        year_rows.truncate(per_year);
        rows.extend(year_rows);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::order_in_category;

    #[test]
    fn flat_variant_sorts_by_revenue_descending() {
        let orders = vec![
            order_in_category("o1", "toys", 10.0, 2018),
            order_in_category("o2", "electronics", 50.0, 2018),
            order_in_category("o3", "garden", 25.0, 2018),
        ];

        let rows = sales_by_category(&orders);

        let names: Vec<_> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, ["electronics", "garden", "toys"]);
    }

    #[test]
    fn flat_variant_counts_distinct_orders() {
        // o1 is split into two installments; still one order.
        let orders = vec![
            order_in_category("o1", "toys", 10.0, 2018),
            order_in_category("o1", "toys", 20.0, 2018),
            order_in_category("o2", "toys", 5.0, 2018),
        ];

        let rows = sales_by_category(&orders);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_count, 2);
        assert_eq!(rows[0].revenue, 35.0);
    }

    #[test]
    fn flat_variant_revenue_sums_to_total() {
        let orders = vec![
            order_in_category("o1", "toys", 10.0, 2018),
            order_in_category("o2", "electronics", 50.0, 2018),
            order_in_category("o3", "garden", 25.0, 2018),
            order_in_category("o4", "toys", 4.5, 2018),
        ];

        let rows = sales_by_category(&orders);

        let total: f64 = rows.iter().map(|r| r.revenue).sum();
        let expected: f64 = orders.iter().map(|o| o.payment_value).sum();
        assert_eq!(total, expected);
    }

    #[test]
    fn revenue_ties_break_on_category_name() {
        let orders = vec![
            order_in_category("o1", "zeta", 10.0, 2018),
            order_in_category("o2", "alpha", 10.0, 2018),
        ];

        let rows = sales_by_category(&orders);

        assert_eq!(rows[0].category, "alpha");
        assert_eq!(rows[1].category, "zeta");
    }

    #[test]
    fn yearly_variant_counts_rows_not_distinct_orders() {
        let orders = vec![
            order_in_category("o1", "toys", 10.0, 2018),
            order_in_category("o1", "toys", 20.0, 2018),
        ];

        let rows = top_categories_by_year(&orders, 5);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count_orders, 2);
        assert_eq!(rows[0].total_revenue, 30.0);
    }

    #[test]
    fn yearly_variant_takes_top_n_per_year_independently() {
        let orders = vec![
            order_in_category("o1", "toys", 10.0, 2017),
            order_in_category("o2", "garden", 30.0, 2017),
            order_in_category("o3", "electronics", 20.0, 2017),
            order_in_category("o4", "toys", 99.0, 2018),
            order_in_category("o5", "garden", 1.0, 2018),
        ];

        let rows = top_categories_by_year(&orders, 2);

        let keyed: Vec<_> = rows
            .iter()
            .map(|r| (r.year, r.category.as_str()))
            .collect();
        assert_eq!(
            keyed,
            [
                (2017, "garden"),
                (2017, "electronics"),
                (2018, "toys"),
                (2018, "garden"),
            ]
        );
    }

    #[test]
    fn yearly_variant_returns_fewer_rows_when_categories_run_out() {
        let orders = vec![order_in_category("o1", "toys", 10.0, 2018)];
        let rows = top_categories_by_year(&orders, 5);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_tables() {
        assert!(sales_by_category(&[]).is_empty());
        assert!(top_categories_by_year(&[], 5).is_empty());
    }
}
