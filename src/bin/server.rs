//! Analytics server - feeds the dashboard frontend precomputed tables
//!
//! Run: cargo run --release --bin server
//! Test: curl -X POST http://localhost:3050/drawdowns -H "Content-Type: application/json" \
//!   -d '{"points":[{"timestamp":"2020-01-01T00:00:00Z","close":100.0},{"timestamp":"2020-01-02T00:00:00Z","close":90.0}]}'
//!
//! The caller resolves the price history (provider, cache, lookback) and
//! posts the raw series; every endpoint normalizes it and answers with one
//! table. `/report` bundles everything for a symbol in one call.

use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use compass_analytics::{
    best_days_scenarios, build_report, forward_return_table, frequency_table, normalize,
    rolling_win_rates, scan_drawdowns, worst_episodes, BestDaysScenario, DrawdownEpisode,
    ForwardReturnTable, FrequencyBucket, MarketReport, PriceSeries, RawPoint, ReportParams,
    RollingWindowResult, BEST_DAY_SCENARIOS, WIN_RATE_HORIZONS,
};

#[derive(Deserialize)]
struct SeriesRequest {
    points: Vec<RawPoint>,
}

#[derive(Deserialize)]
struct WorstRequest {
    points: Vec<RawPoint>,
    #[serde(default = "default_top")]
    n: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest {
    symbol: String,
    points: Vec<RawPoint>,
    as_of: Option<NaiveDate>,
    top: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BestDaysRequest {
    daily_returns: Vec<f64>,
    initial_value: f64,
    k_list: Option<Vec<usize>>,
}

fn default_top() -> usize {
    15
}

type Rejection = (StatusCode, String);

fn normalized(points: &[RawPoint]) -> Result<PriceSeries, Rejection> {
    normalize(points).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

async fn drawdowns(Json(req): Json<SeriesRequest>) -> Result<Json<Vec<DrawdownEpisode>>, Rejection> {
    Ok(Json(scan_drawdowns(&normalized(&req.points)?)))
}

async fn worst(Json(req): Json<WorstRequest>) -> Result<Json<Vec<DrawdownEpisode>>, Rejection> {
    let episodes = scan_drawdowns(&normalized(&req.points)?);
    Ok(Json(worst_episodes(&episodes, req.n)))
}

async fn forward(Json(req): Json<WorstRequest>) -> Result<Json<ForwardReturnTable>, Rejection> {
    let series = normalized(&req.points)?;
    forward_return_table(&series, req.n)
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

async fn frequency(Json(req): Json<SeriesRequest>) -> Result<Json<Vec<FrequencyBucket>>, Rejection> {
    let series = normalized(&req.points)?;
    let episodes = scan_drawdowns(&series);
    Ok(Json(frequency_table(&episodes, series.span_years())))
}

async fn win_rates(
    Json(req): Json<SeriesRequest>,
) -> Result<Json<Vec<RollingWindowResult>>, Rejection> {
    let series = normalized(&req.points)?;
    Ok(Json(rolling_win_rates(&series, &WIN_RATE_HORIZONS)))
}

async fn best_days(Json(req): Json<BestDaysRequest>) -> Json<Vec<BestDaysScenario>> {
    let ks = req.k_list.unwrap_or_else(|| BEST_DAY_SCENARIOS.to_vec());
    Json(best_days_scenarios(
        &req.daily_returns,
        req.initial_value,
        &ks,
    ))
}

// Batch endpoint - the whole dashboard payload for one symbol in one call
async fn report(Json(req): Json<ReportRequest>) -> Result<Json<MarketReport>, Rejection> {
    let series = normalized(&req.points)?;
    let mut params = ReportParams::default();
    if let Some(top) = req.top {
        params.worst_count = top;
    }
    let today = req.as_of.unwrap_or_else(|| series.last_date());
    Ok(Json(build_report(&req.symbol, &series, &params, today)))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = Router::new()
        .route("/drawdowns", post(drawdowns))
        .route("/worst", post(worst))
        .route("/forward", post(forward))
        .route("/frequency", post(frequency))
        .route("/win_rates", post(win_rates))
        .route("/best_days", post(best_days))
        // Batch - everything for one symbol
        .route("/report", post(report));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3050));
    tracing::info!("analytics server running on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
