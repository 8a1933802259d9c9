//! Currency rate abstractions

use async_trait::async_trait;
use std::collections::HashMap;

use super::error::RateError;

/// Conversion rates from one base currency to every currency the provider knows.
///
/// Fetched fresh for each request and never shared between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        RateTable {
            base: base.to_string(),
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rate for one unit of the base currency in `to`, if the provider quoted it.
    pub fn rate(&self, to: &str) -> Option<f64> {
        self.rates.get(to).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Fetch the latest rate table for `base`.
    ///
    /// Implementations make exactly one outbound call and report every
    /// transport or protocol failure as [`RateError::UpstreamUnavailable`].
    async fn latest_rates(&self, base: &str) -> Result<RateTable, RateError>;
}
