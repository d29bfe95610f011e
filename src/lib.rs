// @file: rate_ingestion/src/lib.rs
// @description: Exposes the connector modules for the host runtime and integration tests.
// @author: LAS.

pub mod connectors;
pub mod core;
pub mod utils;

pub use crate::connectors::build_provider;
pub use crate::connectors::coingecko::CoinGeckoProvider;
pub use crate::connectors::http::{FixtureHttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use crate::core::error::{ConnectorError, HttpError};
pub use crate::core::interfaces::{ExchangeProvider, HttpClient, StatisticsService};
pub use crate::core::models::{EmittedRecord, ExchangeRateRecord, PollReport, PollResult, SourceIdentity, SymbolKey};
pub use crate::utils::config::{ConnectorConfig, FailurePolicy};
