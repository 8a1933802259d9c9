use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::currency::{CurrencyRateProvider, RateTable};
use crate::core::error::RateError;

const FETCH_FAILED: &str = "Failed to fetch exchange rate";

/// Client for the `{base_url}/{api_key}/latest/{base_currency}` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    conversion_rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xrate/1.0")
            .timeout(timeout)
            .build()?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    fn latest_url(&self, api_key: &str, base: &str) -> Result<Url, RateError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RateError::upstream(format!("Invalid provider URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RateError::upstream("Invalid provider URL"))?
            .pop_if_empty()
            .push(api_key)
            .push("latest")
            .push(base);
        Ok(url)
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateApiFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<RateTable, RateError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RateError::upstream("Exchange rate API key is not configured"))?;

        let url = self.latest_url(api_key, base)?;
        debug!("Requesting rates from {}/***/latest/{}", self.base_url, base);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RateError::upstream(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Rate provider returned an error status");
            return Err(RateError::upstream(FETCH_FAILED));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RateError::upstream(e.without_url().to_string()))?;

        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "Unparseable rate response");
            RateError::upstream(format!("Failed to parse exchange rate response for {base}"))
        })?;

        let rates = data.conversion_rates.ok_or_else(|| {
            debug!(error_type = ?data.error_type, "Rate response without conversion rates");
            RateError::upstream(FETCH_FAILED)
        })?;

        debug!(count = rates.len(), "Received rate table");
        Ok(RateTable::new(base, rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "test-key";

    fn provider(mock_server: &MockServer) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(
            &mock_server.uri(),
            Some(KEY.to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn mount(mock_server: &MockServer, base: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/{KEY}/latest/{base}")))
            .respond_with(template)
            .expect(1)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": {
                "USD": 1,
                "EUR": 0.92,
                "INR": 83.12
            }
        }"#;
        mount(
            &mock_server,
            "USD",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let table = provider(&mock_server).latest_rates("USD").await.unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.len(), 3);
        assert_eq!(table.rate("USD"), Some(1.0));
        assert_eq!(table.rate("EUR"), Some(0.92));
        assert_eq!(table.rate("INR"), Some(83.12));
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v6/{KEY}/latest/EUR")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"conversion_rates": {"USD": 1.08}}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = ExchangeRateApiProvider::new(
            &format!("{}/v6/", mock_server.uri()),
            Some(KEY.to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let table = provider.latest_rates("EUR").await.unwrap();
        assert_eq!(table.rate("USD"), Some(1.08));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "ZZZ",
            ResponseTemplate::new(404)
                .set_body_string(r#"{"result": "error", "error-type": "unsupported-code"}"#),
        )
        .await;

        let result = provider(&mock_server).latest_rates("ZZZ").await;
        assert_eq!(result, Err(RateError::upstream(FETCH_FAILED)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "USD", ResponseTemplate::new(500)).await;

        let err = provider(&mock_server).latest_rates("USD").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), FETCH_FAILED);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "USD",
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        )
        .await;

        let err = provider(&mock_server).latest_rates("USD").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Failed to parse exchange rate response for USD")
        );
    }

    #[tokio::test]
    async fn test_missing_conversion_rates() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "USD",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"result": "error", "error-type": "invalid-key"}"#),
        )
        .await;

        let result = provider(&mock_server).latest_rates("USD").await;
        assert_eq!(result, Err(RateError::upstream(FETCH_FAILED)));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider =
            ExchangeRateApiProvider::new(&mock_server.uri(), None, Duration::from_secs(5))
                .unwrap();
        let result = provider.latest_rates("USD").await;
        assert_eq!(
            result,
            Err(RateError::upstream("Exchange rate API key is not configured"))
        );
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on the discard port
        let provider = ExchangeRateApiProvider::new(
            "http://127.0.0.1:9",
            Some(KEY.to_string()),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = provider.latest_rates("USD").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(!err.to_string().contains(KEY));
    }
}
