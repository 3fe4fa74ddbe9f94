use axum::{
    extract::{Query, State},
    http::Method,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::AppError,
    models::{BarChartSpec, RankedEntry, SumStats},
    services::{loader::PreparedDataset, mbti::normalize, mbti::ranker},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/mbti/dataset", post(describe_dataset))
        .route("/mbti/rankings", post(country_rankings))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    country: String,
}

#[derive(Debug, Serialize)]
pub struct ColumnMatch {
    column: String,
    code: String,
}

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    country_column: String,
    mbti_columns: Vec<ColumnMatch>,
    row_count: usize,
    countries: Vec<String>,
    type_sums: SumStats,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    country: String,
    rows: Vec<RankedEntry>,
    chart: BarChartSpec,
}

/// Dataset description: detected columns, selectable countries, and sum
/// diagnostics. The request body is the CSV itself; an empty body means
/// "use the default file".
#[axum::debug_handler]
async fn describe_dataset(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DatasetSummary>, AppError> {
    let start = std::time::Instant::now();
    let prepared = load_dataset(&state, body)?;

    let summary = DatasetSummary {
        country_column: prepared.country_column.clone(),
        mbti_columns: prepared
            .mbti_columns
            .iter()
            .map(|m| ColumnMatch { column: m.column.clone(), code: m.code.to_string() })
            .collect(),
        row_count: prepared.data.height(),
        countries: prepared.countries()?,
        type_sums: prepared.type_sum_stats()?,
    };

    tracing::info!(
        "dataset described: {} rows, {} MBTI columns, took {:?}",
        summary.row_count,
        summary.mbti_columns.len(),
        start.elapsed()
    );
    Ok(Json(summary))
}

/// Top-10 ranking for one country, as table rows plus a bar-chart payload.
#[axum::debug_handler]
async fn country_rankings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RankingParams>,
    body: Bytes,
) -> Result<Json<RankingResponse>, AppError> {
    let start = std::time::Instant::now();
    tracing::info!("ranking request for country: {}", params.country);

    let prepared = load_dataset(&state, body)?;

    let row = prepared
        .find_country_row(&params.country)?
        .ok_or_else(|| AppError::RowNotFound(params.country.clone()))?;

    let values = prepared.row_values(row)?;
    let percents = normalize::to_percent(&values);
    let rows = ranker::top_rankings(&prepared.mbti_columns, &percents);
    let chart = BarChartSpec::from_entries(&rows);

    tracing::info!(
        "ranked {} types for {} in {:?}",
        rows.len(),
        params.country,
        start.elapsed()
    );

    Ok(Json(RankingResponse { country: params.country, rows, chart }))
}

fn load_dataset(state: &AppState, body: Bytes) -> Result<Arc<PreparedDataset>, AppError> {
    if body.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "uploaded CSV is {} bytes, exceeding the {} byte limit",
            body.len(),
            state.config.max_file_size
        )));
    }
    let upload = (!body.is_empty()).then_some(body);
    state.datasets.load(upload.as_ref())
}
