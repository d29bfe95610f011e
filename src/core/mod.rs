// @file: rate_ingestion/src/core/mod.rs
// @description: Exports domain logic and data structures.
// @author: LAS.

pub mod emitter;
pub mod error;
pub mod interfaces;
pub mod mapping;
pub mod models;
pub mod schema;
pub mod validation;
