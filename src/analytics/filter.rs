//! Date-range filtering on delivery date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::OrderRecord;

/// Closed date interval selected by the dashboard's date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Days in the range, inclusive of both ends.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Keep rows whose customer delivery date falls inside `range`.
///
/// Rows that were never delivered have no delivery date and are dropped
/// here, which removes them from every downstream aggregate.
pub fn filter_by_delivery_date(orders: &[OrderRecord], range: DateRange) -> Vec<OrderRecord> {
    orders
        .iter()
        .filter(|order| {
            order
                .delivery_date()
                .is_some_and(|date| range.contains(date))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::order;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keeps_rows_inside_the_closed_interval() {
        let orders = vec![
            order("o1", "c1", 10.0, Some("2018-01-01 00:00:00")),
            order("o2", "c2", 10.0, Some("2018-01-05 23:59:59")),
            order("o3", "c3", 10.0, Some("2018-01-10 12:00:00")),
        ];
        let range = DateRange::new(date(2018, 1, 1), date(2018, 1, 5));

        let filtered = filter_by_delivery_date(&orders, range);

        let ids: Vec<_> = filtered.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, ["o1", "o2"]);
        assert!(filtered
            .iter()
            .all(|o| range.contains(o.delivery_date().unwrap())));
    }

    #[test]
    fn excludes_undelivered_rows() {
        let orders = vec![
            order("o1", "c1", 10.0, None),
            order("o2", "c2", 10.0, Some("2018-01-03 12:00:00")),
        ];
        let range = DateRange::new(date(2018, 1, 1), date(2018, 1, 31));

        let filtered = filter_by_delivery_date(&orders, range);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].order_id, "o2");
    }

    #[test]
    fn single_day_range_matches_only_that_day() {
        let orders = vec![
            order("o1", "c1", 10.0, Some("2018-01-03 00:00:00")),
            order("o2", "c2", 10.0, Some("2018-01-04 00:00:00")),
        ];
        let range = DateRange::new(date(2018, 1, 3), date(2018, 1, 3));

        let filtered = filter_by_delivery_date(&orders, range);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].order_id, "o1");
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let range = DateRange::new(date(2018, 2, 1), date(2018, 1, 1));
        assert_eq!(range.start, date(2018, 1, 1));
        assert_eq!(range.end, date(2018, 2, 1));
    }

    #[test]
    fn range_outside_the_data_yields_nothing() {
        let orders = vec![order("o1", "c1", 10.0, Some("2018-01-03 12:00:00"))];
        let range = DateRange::new(date(2019, 1, 1), date(2019, 12, 31));

        assert!(filter_by_delivery_date(&orders, range).is_empty());
    }

    #[test]
    fn days_iterates_the_closed_interval() {
        let range = DateRange::new(date(2018, 1, 30), date(2018, 2, 2));
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            [
                date(2018, 1, 30),
                date(2018, 1, 31),
                date(2018, 2, 1),
                date(2018, 2, 2),
            ]
        );
    }
}
