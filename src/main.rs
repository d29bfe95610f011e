// @file: rate_ingestion/src/main.rs
// @description: One-shot host stand-in: loads config, runs a single poll, writes records as JSON lines.
// @author: LAS.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;
use log::{error, info};
use rate_ingestion::connectors::coingecko::PROVIDER_NAME;
use rate_ingestion::utils::logging;
use rate_ingestion::{build_provider, ConnectorConfig, HttpClient, ReqwestHttpClient};

fn main() -> ExitCode {
    // #1. Environment & config
    dotenv::dotenv().ok();

    let config: ConnectorConfig = match ConnectorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    info!(">>> Polling {} into topic '{}' <<<", PROVIDER_NAME, config.topic);

    // #2. Provider with an owned transport
    let client: Arc<dyn HttpClient> = match ReqwestHttpClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let provider = match build_provider(PROVIDER_NAME, &config, client) {
        Ok(provider) => provider,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // #3. Single poll; scheduling is the host's job
    let result = provider.poll_with_report();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in &result.records {
        match serde_json::to_string(record) {
            Ok(line) => {
                if writeln!(out, "{}", line).is_err() {
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => error!("Failed to serialize record {}: {}", record.key, e),
        }
    }
    if out.flush().is_err() {
        return ExitCode::FAILURE;
    }

    match result.report.failure {
        Some(failure) => {
            error!("Poll ended early on page {}: {}", failure.page, failure.reason);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
