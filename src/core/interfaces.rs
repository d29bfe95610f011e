// @file: rate_ingestion/src/core/interfaces.rs
// @description: Seams of the connector: injected HTTP transport, provider poll contract, statistics collaborator.
// @author: LAS.

use std::time::Duration;
use crate::connectors::http::{HttpRequest, HttpResponse};
use crate::core::error::HttpError;
use crate::core::models::{EmittedRecord, PollResult, Statistic};


//
// TRAIT DEFINITIONS
//

/// Blocking transport. One call is one attempt; retries belong to the caller.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// A data provider polled by the host runtime on its own schedule.
pub trait ExchangeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn poll_with_report(&self) -> PollResult;

    // #1. Host-facing entry point: records only, never an error
    fn fetch(&self) -> Vec<EmittedRecord> {
        self.poll_with_report().records
    }
}

/// Query side of the statistics service consumed by the socket event layer.
/// Not called by the connector; declared so both sides share the model.
pub trait StatisticsService: Send + Sync {
    fn average_failed_txs(&self, duration: Duration) -> Vec<Statistic>;
}


#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStatistics;

    impl StatisticsService for FixedStatistics {
        fn average_failed_txs(&self, duration: Duration) -> Vec<Statistic> {
            (0..duration.as_secs() / 86_400)
                .map(|day| Statistic {
                    name: "avg_failed_txs".to_string(),
                    date: format!("day-{}", day),
                    value: day as f64,
                })
                .collect()
        }
    }

    #[test]
    fn statistics_service_is_object_safe() {
        let service: Box<dyn StatisticsService> = Box::new(FixedStatistics);
        let stats = service.average_failed_txs(Duration::from_secs(3 * 86_400));
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[2].date, "day-2");
    }
}
