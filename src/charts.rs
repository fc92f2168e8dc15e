//! Chart figure model
//!
//! Figures are plain serializable descriptions rendered client-side by
//! the dashboard page; no aggregation happens here. Every constructor
//! guards the empty case so a date range that filters out every row
//! produces an explicit no-data figure instead of a blank chart.

use chrono::NaiveDate;
use serde::Serialize;

/// One bar chart: a bar per input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPanel {
    pub title: String,
    pub axis_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Mirrored panels render with a reversed value axis and labels on
    /// the opposite side, for the symmetric side-by-side layout.
    pub mirrored: bool,
}

impl BarPanel {
    /// Build a panel from aggregated rows, one bar per row. The caller
    /// picks which field labels the bar and which field sizes it.
    pub fn from_rows<T>(
        rows: &[T],
        title: &str,
        axis_label: &str,
        label: impl Fn(&T) -> String,
        value: impl Fn(&T) -> f64,
    ) -> Self {
        Self {
            title: title.to_string(),
            axis_label: axis_label.to_string(),
            labels: rows.iter().map(&label).collect(),
            values: rows.iter().map(&value).collect(),
            mirrored: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A renderable figure, tagged for the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    /// The selected range matched no rows.
    NoData,
    PairedBars { panels: [BarPanel; 2] },
    PanelRow { panels: Vec<BarPanel> },
    TimeSeries {
        title: String,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    },
}

/// Two panels side by side, the right one mirrored.
pub fn paired_bar_chart(left: BarPanel, right: BarPanel) -> Figure {
    if left.is_empty() && right.is_empty() {
        return Figure::NoData;
    }
    Figure::PairedBars {
        panels: [left, right.mirrored()],
    }
}

/// A row of panels (the RFM triple).
pub fn panel_row(panels: Vec<BarPanel>) -> Figure {
    if panels.iter().all(BarPanel::is_empty) {
        return Figure::NoData;
    }
    Figure::PanelRow { panels }
}

/// A date-indexed line. The points arrive pre-bucketed and gap-filled,
/// so a series with no data at all is the only no-data case.
pub fn time_series(title: &str, points: &[(NaiveDate, f64)]) -> Figure {
    if points.is_empty() {
        return Figure::NoData;
    }
    Figure::TimeSeries {
        title: title.to_string(),
        dates: points.iter().map(|(d, _)| *d).collect(),
        values: points.iter().map(|(_, v)| *v).collect(),
    }
}
