// @file: rate_ingestion/src/connectors/coingecko/coingecko_rest.rs
// @description: Builds market-listing URLs, fetches one page and decodes it into raw rate rows.
// @author: LAS.

use std::time::Duration;
use log::{debug, warn};
use serde_json::Value;
use url::Url;
use crate::connectors::http::{HttpRequest, HttpResponse};
use crate::core::interfaces::HttpClient;
use crate::core::models::{DecodedPage, FailureReason, PageFailure, PageOutcome, RawRateEntry};


pub const DEFAULT_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";


//
// URL CONSTRUCTION
//

/// Query parameter order is fixed so the same inputs always produce the same URL.
pub fn markets_url(base: &Url, currency: &str, per_page: u32, page: u32) -> Url {
    let mut url: Url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("vs_currency", currency)
        .append_pair("order", "market_cap_desc")
        .append_pair("sparkline", "false")
        .append_pair("per_page", &per_page.to_string())
        .append_pair("page", &page.to_string());
    url
}


//
// FETCH
//

/// One attempt at one page. Transport errors and non-2xx statuses come back as `Failed`.
pub fn fetch_page(
    client: &dyn HttpClient,
    base: &Url,
    currency: &str,
    per_page: u32,
    page: u32,
    timeout: Duration,
) -> PageOutcome {
    let url: Url = markets_url(base, currency, per_page, page);
    debug!("Fetching from: {}", url);

    let response: HttpResponse = match client.execute(&HttpRequest::get(url, timeout)) {
        Ok(resp) => resp,
        Err(e) => {
            return PageOutcome::Failed(PageFailure {
                page,
                reason: FailureReason::Transport(e.to_string()),
            });
        }
    };

    if !response.is_success() {
        return PageOutcome::Failed(PageFailure {
            page,
            reason: FailureReason::Status(response.status),
        });
    }

    PageOutcome::Fetched(decode_rates(&response.body))
}


//
// DECODE
//

/// A body that is not a JSON array is a malformed page with zero rows.
/// Array elements are decoded one by one so a single bad row does not sink the page.
pub fn decode_rates(body: &str) -> DecodedPage {
    let items: Vec<Value> = match serde_json::from_str(body) {
        Ok(items) => items,
        Err(e) => {
            warn!("Malformed page body, treating as empty: {}", e);
            return DecodedPage { malformed: true, ..DecodedPage::default() };
        }
    };

    let mut page: DecodedPage = DecodedPage {
        entries: Vec::with_capacity(items.len()),
        ..DecodedPage::default()
    };

    for item in items {
        match serde_json::from_value::<RawRateEntry>(item) {
            Ok(entry) => page.entries.push(entry),
            Err(e) => {
                debug!("Skipping undecodable entry: {}", e);
                page.undecodable += 1;
            }
        }
    }

    page
}
