// @file: rate_ingestion/src/core/mapping.rs
// @description: Maps validated provider rows onto the fixed key/value wire schema.
// @author: LAS.

use crate::core::models::{ExchangeRateRecord, SymbolKey, ValidatedRate};


//
// PUBLIC INTERFACE
//

/// Total over validated input: every field is copied explicitly, nothing else is read.
pub fn map_rate(rate: &ValidatedRate) -> (SymbolKey, ExchangeRateRecord) {
    let key: SymbolKey = SymbolKey::from_symbol(rate.symbol());
    let raw = rate.entry();

    let value = ExchangeRateRecord {
        symbol: key.as_str().to_string(),
        id: raw.id.clone(),
        name: raw.name.clone(),
        image: raw.image.clone(),
        current_price: raw.current_price,
        market_cap: raw.market_cap,
        market_cap_rank: raw.market_cap_rank,
        total_volume: raw.total_volume,
        high_24h: raw.high_24h,
        low_24h: raw.low_24h,
        price_change_24h: raw.price_change_24h,
        price_change_percentage_24h: raw.price_change_percentage_24h,
        market_cap_change_24h: raw.market_cap_change_24h,
        market_cap_change_percentage_24h: raw.market_cap_change_percentage_24h,
        circulating_supply: raw.circulating_supply,
        total_supply: raw.total_supply,
        max_supply: raw.max_supply,
        last_updated: raw.last_updated.clone(),
    };

    (key, value)
}
