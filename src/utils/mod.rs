// @file: rate_ingestion/src/utils/mod.rs
// @description: Configuration and logging helpers.
// @author: LAS.

pub mod config;
pub mod logging;
