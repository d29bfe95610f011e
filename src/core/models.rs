// @file: rate_ingestion/src/core/models.rs
// @description: Data structures flowing through one poll cycle, from raw provider rows to emitted records.
// @author: LAS.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use crate::core::schema::{Schema, EXCHANGE_RATE_SCHEMA, SYMBOL_KEY_SCHEMA};


//
// PROVIDER WIRE MODEL
//

/// One asset row of the market listing, as the provider sends it.
/// Unknown fields are ignored; the all-time-high and ROI annotations are never declared.
/// Only `symbol` is strict: a mistyped auxiliary field reads as `None` instead of sinking the row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRateEntry {
    #[serde(default, deserialize_with = "lenient_string")] pub id: Option<String>,
    #[serde(default)] pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")] pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")] pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")] pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_rank")] pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")] pub total_volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub high_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub low_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub price_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub price_change_percentage_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub market_cap_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub circulating_supply: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub total_supply: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")] pub max_supply: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")] pub last_updated: Option<String>,
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64).filter(|v| v.is_finite()))
}

// Ranks sometimes arrive as `1.0`; anything that is not a whole non-negative number is dropped.
fn lenient_rank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let rank: Option<f64> = lenient_f64(deserializer)?;
    Ok(rank
        .filter(|r| *r >= 0.0 && r.fract() == 0.0 && *r <= f64::from(u32::MAX))
        .map(|r| r as u32))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

/// A raw entry that passed validation. The symbol is stored already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRate {
    symbol: String,
    entry: RawRateEntry,
}

impl ValidatedRate {
    // Built only by the validator.
    pub(crate) fn new(symbol: String, entry: RawRateEntry) -> Self {
        Self { symbol, entry }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn entry(&self) -> &RawRateEntry {
        &self.entry
    }
}


//
// WIRE SCHEMA VALUES
//

/// Record key: the trimmed, uppercased symbol. Serializes as `{"symbol": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolKey {
    symbol: String,
}

impl SymbolKey {
    pub fn from_symbol(raw: &str) -> Self {
        Self { symbol: raw.trim().to_uppercase() }
    }

    pub fn as_str(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// Record value. The field set is fixed; absent source fields serialize as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRateRecord {
    pub symbol: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub last_updated: Option<String>,
}


//
// SOURCE IDENTITY & EMITTED RECORDS
//

/// Logical origin of emitted data: a constant partition map and an always-empty offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceIdentity {
    pub partition: BTreeMap<String, String>,
    pub offset: BTreeMap<String, String>,
}

impl SourceIdentity {
    pub fn for_provider(provider: &str) -> Self {
        let mut partition: BTreeMap<String, String> = BTreeMap::new();
        partition.insert("id".to_string(), provider.to_string());

        Self { partition, offset: BTreeMap::new() }
    }
}

/// One record ready for hand-off to the host runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedRecord {
    pub source: SourceIdentity,
    pub topic: String,
    pub key_schema: &'static Schema,
    pub key: SymbolKey,
    pub value_schema: &'static Schema,
    pub value: ExchangeRateRecord,
}

impl EmittedRecord {
    pub fn new(source: SourceIdentity, topic: String, key: SymbolKey, value: ExchangeRateRecord) -> Self {
        Self {
            source,
            topic,
            key_schema: &SYMBOL_KEY_SCHEMA,
            key,
            value_schema: &EXCHANGE_RATE_SCHEMA,
            value,
        }
    }
}


//
// PAGE & POLL OUTCOMES
//

/// Rows decoded from one page body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPage {
    pub entries: Vec<RawRateEntry>,
    // Array elements that could not be decoded into a RawRateEntry
    pub undecodable: usize,
    // The body was not a JSON array at all
    pub malformed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    Transport(String),
    Status(u16),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureReason::Transport(msg) => write!(f, "transport error: {}", msg),
            FailureReason::Status(code) => write!(f, "unsuccessful response, status {}", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub page: u32,
    pub reason: FailureReason,
}

/// Result of requesting one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Fetched(DecodedPage),
    Failed(PageFailure),
}

/// Per-poll counters, logged once at the end of every poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollReport {
    pub requests_issued: u32,
    pub pages_fetched: u32,
    pub records_emitted: usize,
    pub dropped_entries: usize,
    pub malformed_pages: u32,
    pub failure: Option<PageFailure>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollResult {
    pub records: Vec<EmittedRecord>,
    pub report: PollReport,
}


//
// COLLABORATOR MODELS
//

/// Aggregated chart point served by the statistics service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub name: String,
    pub date: String,
    pub value: f64,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_key_is_trimmed_and_uppercased() {
        assert_eq!(SymbolKey::from_symbol("  eth ").as_str(), "ETH");
        assert_eq!(SymbolKey::from_symbol("Eth"), SymbolKey::from_symbol(" ETH"));
    }

    #[test]
    fn source_identity_has_constant_partition_and_empty_offset() {
        let source = SourceIdentity::for_provider("coingecko");
        assert_eq!(source.partition.get("id").map(String::as_str), Some("coingecko"));
        assert!(source.offset.is_empty());
    }

    #[test]
    fn raw_entry_ignores_unknown_and_all_time_high_fields() {
        let json = r#"{
            "symbol": "btc",
            "current_price": 64000.5,
            "ath": 69000.0,
            "ath_date": "2021-11-10T14:24:11.849Z",
            "roi": {"times": 1.2, "currency": "usd"},
            "something_new": [1, 2, 3]
        }"#;
        let entry: RawRateEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.symbol.as_deref(), Some("btc"));
        assert_eq!(entry.current_price, Some(64000.5));
        assert_eq!(entry.market_cap, None);
    }

    #[test]
    fn mistyped_auxiliary_fields_read_as_none() {
        let entry: RawRateEntry = serde_json::from_str(
            r#"{"symbol": "btc", "market_cap_rank": 1.0, "current_price": "64000", "name": 7, "total_volume": 12.5}"#,
        )
        .unwrap();
        assert_eq!(entry.market_cap_rank, Some(1));
        assert_eq!(entry.current_price, None);
        assert_eq!(entry.name, None);
        assert_eq!(entry.total_volume, Some(12.5));

        let fractional: RawRateEntry = serde_json::from_str(r#"{"symbol": "eth", "market_cap_rank": 2.5}"#).unwrap();
        assert_eq!(fractional.market_cap_rank, None);
    }

    #[test]
    fn non_string_symbol_still_fails_the_row() {
        assert!(serde_json::from_str::<RawRateEntry>(r#"{"symbol": 42}"#).is_err());
    }

    #[test]
    fn raw_entry_accepts_explicit_nulls() {
        let entry: RawRateEntry =
            serde_json::from_str(r#"{"symbol": "xrp", "max_supply": null, "market_cap_rank": null}"#).unwrap();
        assert_eq!(entry.max_supply, None);
        assert_eq!(entry.market_cap_rank, None);
    }
}
