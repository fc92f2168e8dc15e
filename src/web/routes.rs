//! HTTP routes
//!
//! Every aggregate endpoint recomputes its tables from the immutable
//! dataset on each request; the date range comes from the query string
//! and defaults to the dataset's full delivery span.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::analytics::category::{self, YearlyCategorySales};
use crate::analytics::daily::{self, DailyOrders};
use crate::analytics::geo::{self, CityActivity};
use crate::analytics::rfm;
use crate::analytics::{filter_by_delivery_date, DateRange};
use crate::charts::{self, BarPanel, Figure};
use crate::dataset::{Dataset, OrderRecord};

/// Panel size for the best/worst and customer-insight charts.
const TOP_GROUPS: usize = 5;
/// Categories kept per year in the yearly breakdown.
const TOP_CATEGORIES_PER_YEAR: usize = 5;
/// Rows kept in the city activity table.
const TOP_CITIES: usize = 10;

/// Serve the main dashboard page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Resolve the requested range against the dataset's delivery span:
/// missing bounds default to the span, out-of-span bounds are clamped
/// into it. `None` when nothing in the dataset was ever delivered.
fn resolve_range(dataset: &Dataset, query: &RangeQuery) -> Option<DateRange> {
    let (min, max) = dataset.delivery_span()?;
    let start = query.start.unwrap_or(min).clamp(min, max);
    let end = query.end.unwrap_or(max).clamp(min, max);
    Some(DateRange::new(start, end))
}

fn filtered_rows(dataset: &Dataset, query: &RangeQuery) -> (Option<DateRange>, Vec<OrderRecord>) {
    match resolve_range(dataset, query) {
        Some(range) => (Some(range), filter_by_delivery_date(dataset.orders(), range)),
        None => (None, Vec::new()),
    }
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub rows: usize,
}

/// API: dataset bounds for the date picker
pub async fn api_meta(State(state): State<Arc<AppState>>) -> Json<MetaResponse> {
    let span = state.dataset.delivery_span();
    Json(MetaResponse {
        min_date: span.map(|(min, _)| min),
        max_date: span.map(|(_, max)| max),
        rows: state.dataset.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_orders: u64,
    pub total_revenue: String,
    pub averages: Option<RfmAveragesView>,
}

/// Mean RFM scores with the monetary mean formatted as currency,
/// rounded the way the summary cards display them.
#[derive(Debug, Serialize)]
pub struct RfmAveragesView {
    pub recency_days: f64,
    pub frequency: f64,
    pub monetary: String,
}

fn build_summary(state: &AppState, query: &RangeQuery) -> SummaryResponse {
    let (range, rows) = filtered_rows(&state.dataset, query);

    let (total_orders, total_revenue) = match range {
        Some(range) => {
            let series = daily::daily_orders(&rows, range);
            (daily::total_orders(&series), daily::total_revenue(&series))
        }
        None => (0, 0.0),
    };

    let averages = rfm::averages(&rfm::rfm_by_customer(&rows)).map(|avg| RfmAveragesView {
        recency_days: (avg.recency_days * 10.0).round() / 10.0,
        frequency: (avg.frequency * 100.0).round() / 100.0,
        monetary: state.monetary_style.format(avg.monetary),
    });

    SummaryResponse {
        total_orders,
        total_revenue: state.revenue_style.format(total_revenue),
        averages,
    }
}

/// API: headline metrics for the summary cards
pub async fn api_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<SummaryResponse> {
    Json(build_summary(&state, &query))
}

/// API: gap-filled daily order/revenue series
pub async fn api_daily(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<DailyOrders>> {
    let (range, rows) = filtered_rows(&state.dataset, &query);
    Json(match range {
        Some(range) => daily::daily_orders(&rows, range),
        None => Vec::new(),
    })
}

/// API: daily order-count line chart
pub async fn api_chart_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<Figure> {
    let (range, rows) = filtered_rows(&state.dataset, &query);
    let figure = match range {
        Some(_) if rows.is_empty() => Figure::NoData,
        Some(range) => {
            let points: Vec<(NaiveDate, f64)> = daily::daily_orders(&rows, range)
                .into_iter()
                .map(|d| (d.date, d.order_count as f64))
                .collect();
            charts::time_series("Daily Orders", &points)
        }
        None => Figure::NoData,
    };
    Json(figure)
}

/// Which field of the category table sizes the bars.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMetric {
    Orders,
    Revenue,
}

fn default_metric() -> CategoryMetric {
    CategoryMetric::Revenue
}

#[derive(Debug, Deserialize)]
pub struct CategoryChartQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default = "default_metric")]
    pub metric: CategoryMetric,
}

/// API: best vs worst categories, paired panels
///
/// Both panels rank by revenue (top five and bottom five); `metric`
/// only selects which column sizes the bars, matching the two coupled
/// charts on the dashboard.
pub async fn api_chart_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryChartQuery>,
) -> Json<Figure> {
    let range_query = RangeQuery {
        start: query.start,
        end: query.end,
    };
    let (_, rows) = filtered_rows(&state.dataset, &range_query);
    let table = category::sales_by_category(&rows);

    let best: Vec<_> = table.iter().take(TOP_GROUPS).cloned().collect();
    // Bottom five by revenue, smallest first.
    let worst: Vec<_> = table.iter().rev().take(TOP_GROUPS).cloned().collect();

    let (axis, value): (&str, fn(&category::CategorySales) -> f64) = match query.metric {
        CategoryMetric::Orders => ("Number of Orders", |r| r.order_count as f64),
        CategoryMetric::Revenue => ("Revenue", |r| r.revenue),
    };

    let left = BarPanel::from_rows(&best, "Best Performing Categories", axis, |r| r.category.clone(), value);
    let right = BarPanel::from_rows(&worst, "Worst Performing Categories", axis, |r| r.category.clone(), value);
    Json(charts::paired_bar_chart(left, right))
}

/// API: customer insight, cities vs payment types
pub async fn api_chart_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<Figure> {
    let (_, rows) = filtered_rows(&state.dataset, &query);

    let mut cities = geo::customers_by_city(&rows);
    cities.truncate(TOP_GROUPS);
    let mut payment_types = geo::customers_by_payment_type(&rows);
    payment_types.truncate(TOP_GROUPS);

    let left = BarPanel::from_rows(
        &cities,
        "Number of Customers by City",
        "Customers",
        |r| r.city.clone(),
        |r| r.customer_count as f64,
    );
    let right = BarPanel::from_rows(
        &payment_types,
        "Number of Customers by Payment Type",
        "Customers",
        |r| r.payment_type.clone(),
        |r| r.customer_count as f64,
    );
    Json(charts::paired_bar_chart(left, right))
}

/// API: best customers by each RFM metric, three panels
pub async fn api_chart_rfm(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<Figure> {
    let (_, rows) = filtered_rows(&state.dataset, &query);
    let table = rfm::rfm_by_customer(&rows);

    let panels = vec![
        BarPanel::from_rows(
            &rfm::best_by_recency(&table, TOP_GROUPS),
            "By Recency (days)",
            "customer_id",
            |r| r.label.clone(),
            |r| r.recency_days as f64,
        ),
        BarPanel::from_rows(
            &rfm::best_by_frequency(&table, TOP_GROUPS),
            "By Frequency",
            "customer_id",
            |r| r.label.clone(),
            |r| r.frequency as f64,
        ),
        BarPanel::from_rows(
            &rfm::best_by_monetary(&table, TOP_GROUPS),
            "By Monetary",
            "customer_id",
            |r| r.label.clone(),
            |r| r.monetary,
        ),
    ];
    Json(charts::panel_row(panels))
}

/// API: top categories per purchase year
pub async fn api_categories_yearly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<YearlyCategorySales>> {
    let (_, rows) = filtered_rows(&state.dataset, &query);
    Json(category::top_categories_by_year(&rows, TOP_CATEGORIES_PER_YEAR))
}

/// API: per-city order/user/revenue table
pub async fn api_cities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Json<Vec<CityActivity>> {
    let (_, rows) = filtered_rows(&state.dataset, &query);
    let mut table = geo::city_activity(&rows);
    table.truncate(TOP_CITIES);
    Json(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::order;
    use crate::config::CurrencyConfig;
    use crate::currency::CurrencyStyle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(orders: Vec<OrderRecord>) -> Dataset {
        Dataset::from_records(orders)
    }

    fn state(orders: Vec<OrderRecord>) -> AppState {
        let usd = CurrencyConfig {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            locale: "en_US".to_string(),
        };
        let aud = CurrencyConfig {
            code: "AUD".to_string(),
            symbol: "A$".to_string(),
            locale: "es_CO".to_string(),
        };
        AppState {
            dataset: Arc::new(dataset(orders)),
            revenue_style: CurrencyStyle::from_config(&usd).unwrap(),
            monetary_style: CurrencyStyle::from_config(&aud).unwrap(),
        }
    }

    #[test]
    fn range_defaults_to_the_delivery_span() {
        let data = dataset(vec![
            order("o1", "c1", 10.0, Some("2018-01-05 09:00:00")),
            order("o2", "c2", 20.0, Some("2018-03-10 09:00:00")),
        ]);

        let range = resolve_range(&data, &RangeQuery::default()).unwrap();

        assert_eq!(range.start, date(2018, 1, 5));
        assert_eq!(range.end, date(2018, 3, 10));
    }

    #[test]
    fn out_of_span_bounds_are_clamped() {
        let data = dataset(vec![
            order("o1", "c1", 10.0, Some("2018-01-05 09:00:00")),
            order("o2", "c2", 20.0, Some("2018-03-10 09:00:00")),
        ]);
        let query = RangeQuery {
            start: Some(date(2017, 1, 1)),
            end: Some(date(2019, 1, 1)),
        };

        let range = resolve_range(&data, &query).unwrap();

        assert_eq!(range.start, date(2018, 1, 5));
        assert_eq!(range.end, date(2018, 3, 10));
    }

    #[test]
    fn no_delivered_rows_means_no_range() {
        let data = dataset(vec![order("o1", "c1", 10.0, None)]);
        assert!(resolve_range(&data, &RangeQuery::default()).is_none());
    }

    #[test]
    fn summary_totals_count_orders_once_and_sum_installments() {
        let state = state(vec![
            order("o1", "c1", 10.0, Some("2018-01-05 09:00:00")),
            order("o1", "c1", 20.0, Some("2018-01-05 09:00:00")),
            order("o2", "c2", 5.0, Some("2018-01-05 15:00:00")),
        ]);

        let summary = build_summary(&state, &RangeQuery::default());

        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_revenue, "$35.00");
        let averages = summary.averages.unwrap();
        assert_eq!(averages.recency_days, 0.0);
        assert_eq!(averages.frequency, 1.0);
        assert_eq!(averages.monetary, "A$17,50");
    }

    #[test]
    fn summary_on_empty_dataset_has_zero_totals_and_no_averages() {
        let state = state(vec![order("o1", "c1", 10.0, None)]);

        let summary = build_summary(&state, &RangeQuery::default());

        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.total_revenue, "$0.00");
        assert!(summary.averages.is_none());
    }

    #[test]
    fn summary_respects_a_narrowed_range() {
        let state = state(vec![
            order("o1", "c1", 10.0, Some("2018-01-05 09:00:00")),
            order("o2", "c2", 20.0, Some("2018-02-05 09:00:00")),
        ]);
        let query = RangeQuery {
            start: Some(date(2018, 2, 1)),
            end: Some(date(2018, 2, 28)),
        };

        let summary = build_summary(&state, &query);

        assert_eq!(summary.total_orders, 1);
        assert_eq!(summary.total_revenue, "$20.00");
    }
}
