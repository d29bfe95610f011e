// @file: rate_ingestion/src/connectors/http.rs
// @description: Request/response envelopes plus the blocking reqwest transport and an offline fixture transport.
// @author: LAS.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use reqwest::blocking::Client;
use url::Url;
use crate::core::error::{ConnectorError, HttpError};
use crate::core::interfaces::HttpClient;


const USER_AGENT: &str = concat!("rate_ingestion/", env!("CARGO_PKG_VERSION"));


//
// ENVELOPES
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: Url, timeout: Duration) -> Self {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());

        Self { url, headers, timeout }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}


//
// PRODUCTION TRANSPORT
//

/// Owned blocking client. Build one per connector and hand it in, it pools connections internally.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, ConnectorError> {
        let client: Client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConnectorError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.client.get(request.url.clone()).timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(e.to_string())
            } else if e.is_connect() {
                HttpError::Connect(e.to_string())
            } else {
                HttpError::Request(e.to_string())
            }
        })?;

        let status: u16 = response.status().as_u16();
        let body: String = response.text().map_err(|e| HttpError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}


//
// OFFLINE FIXTURE TRANSPORT
//

/// Replays recorded responses keyed by the `page` query parameter.
/// Pages without a fixture answer `200 []`. Every request URL is recorded.
#[derive(Debug, Default)]
pub struct FixtureHttpClient {
    pages: BTreeMap<u32, Result<HttpResponse, HttpError>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<Url>>,
}

impl FixtureHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, body: impl Into<String>) -> Self {
        self.pages.insert(page, Ok(HttpResponse::ok_json(body)));
        self
    }

    pub fn with_status(mut self, page: u32, status: u16, body: impl Into<String>) -> Self {
        self.pages.insert(page, Ok(HttpResponse { status, body: body.into() }));
        self
    }

    pub fn with_error(mut self, page: u32, error: HttpError) -> Self {
        self.pages.insert(page, Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<Url> {
        self.requested.lock().map(|urls| urls.clone()).unwrap_or_default()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_urls().iter().filter_map(page_of).collect()
    }
}

impl HttpClient for FixtureHttpClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(request.url.clone());
        }

        match page_of(&request.url).and_then(|page| self.pages.get(&page)) {
            Some(scripted) => scripted.clone(),
            None => Ok(HttpResponse::ok_json("[]")),
        }
    }
}

fn page_of(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(name, _)| name == "page")
        .and_then(|(_, value)| value.parse().ok())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u32) -> HttpRequest {
        let url = Url::parse(&format!("https://example.test/markets?page={}", page)).unwrap();
        HttpRequest::get(url, Duration::from_millis(250))
    }

    #[test]
    fn get_request_asks_for_json_and_keeps_deadline() {
        let req = request(1);
        assert_eq!(req.headers.get("accept").map(String::as_str), Some("application/json"));
        assert_eq!(req.timeout, Duration::from_millis(250));
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(HttpResponse::ok_json("[]").is_success());
        assert!(!HttpResponse { status: 429, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 302, body: String::new() }.is_success());
    }

    #[test]
    fn fixture_client_serves_pages_and_records_calls() {
        let client = FixtureHttpClient::new()
            .with_page(1, r#"[{"symbol":"btc"}]"#)
            .with_status(2, 503, "unavailable")
            .with_error(3, HttpError::Timeout("slow".into()));

        assert_eq!(client.execute(&request(1)).unwrap().body, r#"[{"symbol":"btc"}]"#);
        assert_eq!(client.execute(&request(2)).unwrap().status, 503);
        assert_eq!(client.execute(&request(3)), Err(HttpError::Timeout("slow".into())));
        assert_eq!(client.execute(&request(9)).unwrap().body, "[]");

        assert_eq!(client.calls(), 4);
        assert_eq!(client.requested_pages(), vec![1, 2, 3, 9]);
    }
}
