//! Rate conversion service

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::conversion::{ConversionResult, parse_amount};
use super::currency::{CurrencyRateProvider, RateTable};
use super::error::RateError;
use super::history::SyntheticSeries;

/// Answers conversion and history requests with one provider lookup each.
///
/// Holds no state between requests: no cache, no retries.
#[derive(Clone)]
pub struct RateConversionService {
    provider: Arc<dyn CurrencyRateProvider>,
}

impl RateConversionService {
    pub fn new(provider: Arc<dyn CurrencyRateProvider>) -> Self {
        RateConversionService { provider }
    }

    #[instrument(name = "Convert", skip(self))]
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<ConversionResult, RateError> {
        let table = self.fetch(from).await?;
        let rate = table.rate(to).ok_or(RateError::InvalidCurrency)?;
        let amount = parse_amount(amount)?;

        let result = ConversionResult::new(from, to, rate, amount)?;
        debug!(rate, converted = result.converted_amount, "Converted amount");
        Ok(result)
    }

    pub async fn historical_series(
        &self,
        from: &str,
        to: &str,
    ) -> Result<SyntheticSeries, RateError> {
        self.historical_series_on(from, to, Utc::now().date_naive())
            .await
    }

    /// Same as [`Self::historical_series`] with an explicit current date.
    #[instrument(name = "HistoricalSeries", skip(self))]
    pub async fn historical_series_on(
        &self,
        from: &str,
        to: &str,
        today: NaiveDate,
    ) -> Result<SyntheticSeries, RateError> {
        let table = self.fetch(from).await?;
        let rate = table.rate(to).ok_or(RateError::InvalidCurrency)?;

        let series = SyntheticSeries::generate(from, to, rate, today);
        if series.is_empty() {
            return Err(RateError::upstream("No historical data available"));
        }
        Ok(series)
    }

    async fn fetch(&self, base: &str) -> Result<RateTable, RateError> {
        self.provider.latest_rates(base).await.inspect_err(|e| {
            if let RateError::UpstreamUnavailable(reason) = e {
                warn!(%base, %reason, "Rate provider unavailable");
            }
        })
    }
}
