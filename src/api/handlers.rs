use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::AppState;
use super::error::{ApiError, ApiResult};
use crate::core::{ConversionResult, SyntheticSeries};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRatesResponse {
    pub dates: Vec<String>,
    pub rates: Vec<f64>,
    pub from: String,
    pub to: String,
}

impl From<SyntheticSeries> for HistoricalRatesResponse {
    fn from(series: SyntheticSeries) -> Self {
        HistoricalRatesResponse {
            dates: series.dates(),
            rates: series.rates(),
            from: series.from,
            to: series.to,
        }
    }
}

/// `GET /api/exchange-rate/{from}/{to}/{amount}`
pub async fn exchange_rate(
    State(state): State<Arc<AppState>>,
    params: Result<Path<(String, String, String)>, PathRejection>,
) -> ApiResult<Json<ConversionResult>> {
    let Path((from, to, amount)) = params?;
    let result = state.service.convert(&from, &to, &amount).await?;
    Ok(Json(result))
}

/// `GET /api/historical-rates/{from}/{to}`
///
/// Synthetic series around the live rate, see [`crate::core::history`].
pub async fn historical_rates(
    State(state): State<Arc<AppState>>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<HistoricalRatesResponse>> {
    let Path((from, to)) = params?;
    let series = state.service.historical_series(&from, &to).await?;
    Ok(Json(series.into()))
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
