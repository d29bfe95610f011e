// @file: rate_ingestion/src/core/validation.rs
// @description: Filters raw provider rows down to the ones carrying every required field.
// @author: LAS.

use std::str::FromStr;
use crate::core::models::{RawRateEntry, ValidatedRate};


//
// REQUIRED FIELD ALLOW-LIST
//

/// Numeric fields that can be made mandatory on top of `symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateField {
    CurrentPrice,
    MarketCap,
    MarketCapRank,
    TotalVolume,
    High24h,
    Low24h,
    PriceChange24h,
    PriceChangePercentage24h,
    MarketCapChange24h,
    MarketCapChangePercentage24h,
    CirculatingSupply,
    TotalSupply,
    MaxSupply,
}

impl RateField {
    pub const ALL: [RateField; 13] = [
        RateField::CurrentPrice,
        RateField::MarketCap,
        RateField::MarketCapRank,
        RateField::TotalVolume,
        RateField::High24h,
        RateField::Low24h,
        RateField::PriceChange24h,
        RateField::PriceChangePercentage24h,
        RateField::MarketCapChange24h,
        RateField::MarketCapChangePercentage24h,
        RateField::CirculatingSupply,
        RateField::TotalSupply,
        RateField::MaxSupply,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RateField::CurrentPrice => "current_price",
            RateField::MarketCap => "market_cap",
            RateField::MarketCapRank => "market_cap_rank",
            RateField::TotalVolume => "total_volume",
            RateField::High24h => "high_24h",
            RateField::Low24h => "low_24h",
            RateField::PriceChange24h => "price_change_24h",
            RateField::PriceChangePercentage24h => "price_change_percentage_24h",
            RateField::MarketCapChange24h => "market_cap_change_24h",
            RateField::MarketCapChangePercentage24h => "market_cap_change_percentage_24h",
            RateField::CirculatingSupply => "circulating_supply",
            RateField::TotalSupply => "total_supply",
            RateField::MaxSupply => "max_supply",
        }
    }

    fn is_present(&self, entry: &RawRateEntry) -> bool {
        let value: Option<f64> = match self {
            RateField::CurrentPrice => entry.current_price,
            RateField::MarketCap => entry.market_cap,
            RateField::MarketCapRank => entry.market_cap_rank.map(f64::from),
            RateField::TotalVolume => entry.total_volume,
            RateField::High24h => entry.high_24h,
            RateField::Low24h => entry.low_24h,
            RateField::PriceChange24h => entry.price_change_24h,
            RateField::PriceChangePercentage24h => entry.price_change_percentage_24h,
            RateField::MarketCapChange24h => entry.market_cap_change_24h,
            RateField::MarketCapChangePercentage24h => entry.market_cap_change_percentage_24h,
            RateField::CirculatingSupply => entry.circulating_supply,
            RateField::TotalSupply => entry.total_supply,
            RateField::MaxSupply => entry.max_supply,
        };
        value.map_or(false, f64::is_finite)
    }
}

impl FromStr for RateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: &str = s.trim();
        RateField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| format!("unknown rate field '{}'", wanted))
    }
}


//
// VALIDATOR
//

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub valid: Vec<ValidatedRate>,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    required: Vec<RateField>,
}

impl Validator {
    pub fn new(required: Vec<RateField>) -> Self {
        Self { required }
    }

    /// Checks a single entry. `symbol` must be non-empty after trimming.
    pub fn check(&self, entry: RawRateEntry) -> Option<ValidatedRate> {
        let symbol: String = entry.symbol.as_deref()?.trim().to_string();
        if symbol.is_empty() {
            return None;
        }

        if !self.required.iter().all(|field| field.is_present(&entry)) {
            return None;
        }

        Some(ValidatedRate::new(symbol, entry))
    }

    /// Keeps the valid subsequence in input order and counts the rest.
    pub fn validate(&self, entries: Vec<RawRateEntry>) -> ValidationOutcome {
        let total: usize = entries.len();
        let valid: Vec<ValidatedRate> = entries
            .into_iter()
            .filter_map(|entry| self.check(entry))
            .collect();

        ValidationOutcome { dropped: total - valid.len(), valid }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: Option<&str>) -> RawRateEntry {
        RawRateEntry { symbol: symbol.map(str::to_string), ..Default::default() }
    }

    #[test]
    fn drops_missing_and_blank_symbols() {
        let outcome = Validator::default().validate(vec![
            entry(Some("btc")),
            entry(None),
            entry(Some("   ")),
            entry(Some("")),
            entry(Some(" eth ")),
        ]);

        let symbols: Vec<&str> = outcome.valid.iter().map(|r| r.symbol()).collect();
        assert_eq!(symbols, vec!["btc", "eth"]);
        assert_eq!(outcome.dropped, 3);
    }

    #[test]
    fn required_numeric_fields_are_enforced() {
        let validator = Validator::new(vec![RateField::CurrentPrice, RateField::MarketCapRank]);

        let mut complete = entry(Some("btc"));
        complete.current_price = Some(64000.0);
        complete.market_cap_rank = Some(1);

        let mut no_rank = entry(Some("eth"));
        no_rank.current_price = Some(3100.0);

        let outcome = validator.validate(vec![complete, no_rank, entry(Some("xrp"))]);
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].symbol(), "btc");
        assert_eq!(outcome.dropped, 2);
    }

    #[test]
    fn parses_field_names_from_config() {
        assert_eq!("current_price".parse::<RateField>(), Ok(RateField::CurrentPrice));
        assert_eq!(" max_supply ".parse::<RateField>(), Ok(RateField::MaxSupply));
        assert!("ath".parse::<RateField>().is_err());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let outcome = Validator::default().validate(Vec::new());
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.dropped, 0);
    }
}
