// @file: rate_ingestion/src/core/error.rs
// @description: Error taxonomy for transport calls and connector construction.
// @author: LAS.

use thiserror::Error;


//
// TRANSPORT ERRORS
//

/// Failure of a single HTTP round trip. Non-success statuses are not errors here,
/// they come back as an `HttpResponse` and the caller classifies them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}


//
// CONSTRUCTION ERRORS
//

/// Errors raised while building a connector. Polling itself never fails.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("failed to build http client: {0}")]
    HttpClient(String),
}
