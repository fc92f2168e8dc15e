//! Aggregations over the filtered order table
//!
//! Each submodule is a pure transformation: filtered rows in, a small
//! derived table out. Nothing here holds state and nothing is cached;
//! the web layer re-runs the whole set on every date-range change.

pub mod category;
pub mod daily;
pub mod filter;
pub mod geo;
pub mod rfm;

pub use filter::{filter_by_delivery_date, DateRange};
