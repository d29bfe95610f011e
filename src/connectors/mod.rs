// @file: rate_ingestion/src/connectors/mod.rs
// @description: Factory for building a provider by name with an injected HTTP transport.
// @author: LAS.

pub mod coingecko;
pub mod http;

use std::sync::Arc;
use crate::core::error::ConnectorError;
use crate::core::interfaces::{ExchangeProvider, HttpClient};
use crate::utils::config::ConnectorConfig;
use self::coingecko::CoinGeckoProvider;


//
// FACTORY FUNCTION
//

pub fn build_provider(
    name: &str,
    config: &ConnectorConfig,
    client: Arc<dyn HttpClient>,
) -> Result<Box<dyn ExchangeProvider>, ConnectorError> {
    match name.trim().to_lowercase().as_str() {
        coingecko::PROVIDER_NAME => Ok(Box::new(CoinGeckoProvider::new(config, client)?)),
        // New providers plug in here without touching the host side
        other => Err(ConnectorError::UnknownProvider(other.to_string())),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::http::FixtureHttpClient;

    #[test]
    fn builds_known_provider_case_insensitively() {
        let client: Arc<dyn HttpClient> = Arc::new(FixtureHttpClient::new());
        let provider = build_provider(" CoinGecko ", &ConnectorConfig::default(), client).unwrap();
        assert_eq!(provider.name(), "coingecko");
    }

    #[test]
    fn rejects_unknown_provider() {
        let client: Arc<dyn HttpClient> = Arc::new(FixtureHttpClient::new());
        match build_provider("binance", &ConnectorConfig::default(), client) {
            Err(ConnectorError::UnknownProvider(name)) => assert_eq!(name, "binance"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("binance should not be a known provider"),
        }
    }
}
