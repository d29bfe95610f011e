// @file: rate_ingestion/src/connectors/coingecko/mod.rs
// @description: CoinGecko market-listing provider: walks pages until the last one and emits exchange-rate records.
// @author: LAS.

pub mod coingecko_rest;

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use log::{debug, error, info, warn};
use url::Url;
use crate::core::emitter::RecordEmitter;
use crate::core::error::ConnectorError;
use crate::core::interfaces::{ExchangeProvider, HttpClient};
use crate::core::mapping::map_rate;
use crate::core::models::{EmittedRecord, PageOutcome, PollReport, PollResult};
use crate::core::validation::Validator;
use crate::utils::config::{ConnectorConfig, FailurePolicy};


pub const PROVIDER_NAME: &str = "coingecko";


//
// PROVIDER
//

/// Holds only immutable settings and the injected transport; every poll keeps its own accumulator.
pub struct CoinGeckoProvider {
    client: Arc<dyn HttpClient>,
    base_url: Url,
    currency: String,
    per_page: u32,
    max_pages: u32,
    timeout: Duration,
    policy: FailurePolicy,
    validator: Validator,
    emitter: RecordEmitter,
}

impl CoinGeckoProvider {
    pub fn new(config: &ConnectorConfig, client: Arc<dyn HttpClient>) -> Result<Self, ConnectorError> {
        config.validate()?;

        Ok(Self {
            client,
            base_url: config.markets_url()?,
            currency: config.currency.clone(),
            per_page: config.per_page,
            max_pages: config.max_pages,
            timeout: config.request_timeout(),
            policy: config.failure_policy(),
            validator: Validator::new(config.required_rate_fields()?),
            emitter: RecordEmitter::new(PROVIDER_NAME, config.topic.clone()),
        })
    }

    pub fn topic(&self) -> &str {
        self.emitter.topic()
    }

    pub fn poll(&self) -> Vec<EmittedRecord> {
        self.run().records
    }

    //
    // PAGINATION CONTROLLER
    //

    fn run(&self) -> PollResult {
        let mut records: Vec<EmittedRecord> = Vec::new();
        let mut report: PollReport = PollReport::default();
        let mut page: u32 = 1;

        loop {
            // #1. Page cap
            if self.max_pages > 0 && page > self.max_pages {
                warn!("Stopping after {} pages, listing may be incomplete", self.max_pages);
                report.truncated = true;
                break;
            }

            // #2. Fetch (with retries if configured)
            let decoded = match self.fetch_with_policy(page, &mut report) {
                PageOutcome::Fetched(decoded) => decoded,
                PageOutcome::Failed(failure) => {
                    error!("Page {} failed: {}. Ending poll with {} records", page, failure.reason, records.len());
                    report.failure = Some(failure);
                    break;
                }
            };
            report.pages_fetched += 1;
            if decoded.malformed {
                report.malformed_pages += 1;
            }

            // #3. Validate
            let outcome = self.validator.validate(decoded.entries);
            let dropped: usize = outcome.dropped + decoded.undecodable;
            if dropped > 0 {
                warn!("Page {}: dropped {} invalid entries", page, dropped);
            }
            report.dropped_entries += dropped;

            // #4. Map & emit
            let mapped: usize = outcome.valid.len();
            records.extend(self.emitter.emit(outcome.valid.iter().map(map_rate)));
            debug!("Page {}: {} records", page, mapped);

            // #5. Transition
            if is_last_page(mapped, self.per_page) {
                break;
            }
            page += 1;
        }

        report.records_emitted = records.len();
        info!(
            "Poll complete: {} pages, {} requests, {} records emitted, {} entries dropped",
            report.pages_fetched, report.requests_issued, report.records_emitted, report.dropped_entries
        );

        PollResult { records, report }
    }

    fn fetch_with_policy(&self, page: u32, report: &mut PollReport) -> PageOutcome {
        let attempts: u32 = match self.policy {
            FailurePolicy::Stop => 1,
            FailurePolicy::Retry { attempts, .. } => attempts.max(1),
        };

        let mut attempt: u32 = 1;
        loop {
            report.requests_issued += 1;
            let outcome = coingecko_rest::fetch_page(
                self.client.as_ref(),
                &self.base_url,
                &self.currency,
                self.per_page,
                page,
                self.timeout,
            );

            let backoff: Option<Duration> = match (&outcome, self.policy) {
                (PageOutcome::Failed(failure), FailurePolicy::Retry { backoff, .. }) if attempt < attempts => {
                    warn!("Page {} attempt {}/{} failed: {}", page, attempt, attempts, failure.reason);
                    Some(backoff * attempt)
                }
                _ => None,
            };

            match backoff {
                Some(delay) => {
                    thread::sleep(delay);
                    attempt += 1;
                }
                None => return outcome,
            }
        }
    }
}

impl ExchangeProvider for CoinGeckoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn poll_with_report(&self) -> PollResult {
        self.run()
    }
}


//
// INTERNAL HELPERS
//

// A short page is the provider's last page. A page size of 0 never paginates.
fn is_last_page(mapped: usize, per_page: u32) -> bool {
    per_page == 0 || mapped < per_page as usize
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_page_is_last() {
        assert!(is_last_page(3, 250));
        assert!(is_last_page(0, 250));
        assert!(!is_last_page(250, 250));
    }

    #[test]
    fn zero_page_size_always_terminates() {
        assert!(is_last_page(0, 0));
        assert!(is_last_page(17, 0));
    }
}
