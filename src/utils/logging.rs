// @file: rate_ingestion/src/utils/logging.rs
// @description: Logger bootstrap for the host binary.
// @author: LAS.

use env_logger::{Builder, Env};

/// `RUST_LOG` wins over `default_level` when set. Safe to call more than once.
pub fn init(default_level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
