//! Web server module

mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::currency::CurrencyStyle;
use crate::dataset::Dataset;

pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub revenue_style: CurrencyStyle,
    pub monetary_style: CurrencyStyle,
}

pub async fn start_server(config: &Config, dataset: Arc<Dataset>) -> Result<()> {
    let state = Arc::new(AppState {
        dataset,
        revenue_style: CurrencyStyle::from_config(&config.display.revenue)?,
        monetary_style: CurrencyStyle::from_config(&config.display.monetary)?,
    });

    let app = Router::new()
        // Dashboard page
        .route("/", get(routes::index))
        // Aggregate APIs, all taking an optional ?start=..&end=.. range
        .route("/api/meta", get(routes::api_meta))
        .route("/api/summary", get(routes::api_summary))
        .route("/api/daily", get(routes::api_daily))
        .route("/api/charts/orders", get(routes::api_chart_orders))
        .route("/api/charts/categories", get(routes::api_chart_categories))
        .route("/api/charts/customers", get(routes::api_chart_customers))
        .route("/api/charts/rfm", get(routes::api_chart_rfm))
        .route("/api/categories/yearly", get(routes::api_categories_yearly))
        .route("/api/cities", get(routes::api_cities))
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    info!("Web server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
