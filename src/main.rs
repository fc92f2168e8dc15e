//! Shopdash - an e-commerce analytics dashboard
//!
//! Loads a denormalized order table once at startup and serves:
//! - Revenue and order-count series over a user-picked date range
//! - Best/worst product categories and customer geography
//! - RFM customer segmentation

mod analytics;
mod charts;
mod config;
mod currency;
mod dataset;
mod web;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before any other initialization)
    let _ = dotenvy::dotenv();

    // Initialize logging based on LOG_FORMAT env var
    // Use LOG_FORMAT=gcp for structured GCP Cloud Logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "gcp" {
        tracing_subscriber::registry()
            .with(tracing_subscriber::filter::LevelFilter::INFO)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .init();
    }

    info!("Starting Shopdash...");

    // Load configuration
    let config = config::Config::load()?;
    info!("Configuration loaded");

    // Load the order table once; everything downstream is recomputed
    // per request from this immutable snapshot
    let dataset = Arc::new(dataset::Dataset::load(&config.dataset.candidates())?);
    match dataset.delivery_span() {
        Some((min, max)) => info!(
            "Order table loaded: {} rows, deliveries {} to {}",
            dataset.len(),
            min,
            max
        ),
        None => info!(
            "Order table loaded: {} rows, no delivered orders",
            dataset.len()
        ),
    }

    // Start web server (blocking)
    web::start_server(&config, dataset).await?;

    Ok(())
}
