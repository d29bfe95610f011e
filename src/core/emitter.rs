// @file: rate_ingestion/src/core/emitter.rs
// @description: Tags mapped key/value pairs with the fixed source identity and destination topic.
// @author: LAS.

use crate::core::models::{EmittedRecord, ExchangeRateRecord, SourceIdentity, SymbolKey};

#[derive(Debug, Clone)]
pub struct RecordEmitter {
    source: SourceIdentity,
    topic: String,
}

impl RecordEmitter {
    pub fn new(provider: &str, topic: impl Into<String>) -> Self {
        Self {
            source: SourceIdentity::for_provider(provider),
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Input order is kept as-is.
    pub fn emit<I>(&self, mapped: I) -> Vec<EmittedRecord>
    where
        I: IntoIterator<Item = (SymbolKey, ExchangeRateRecord)>,
    {
        mapped
            .into_iter()
            .map(|(key, value)| EmittedRecord::new(self.source.clone(), self.topic.clone(), key, value))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::map_rate;
    use crate::core::models::RawRateEntry;
    use crate::core::schema::{EXCHANGE_RATE_SCHEMA, SYMBOL_KEY_SCHEMA};
    use crate::core::validation::Validator;

    #[test]
    fn emits_in_input_order_with_fixed_identity() {
        let rows: Vec<RawRateEntry> = ["xrp", "btc", "ada"]
            .iter()
            .map(|s| RawRateEntry { symbol: Some(s.to_string()), ..Default::default() })
            .collect();
        let valid = Validator::default().validate(rows).valid;

        let emitter = RecordEmitter::new("coingecko", "exchange-rates");
        let records = emitter.emit(valid.iter().map(map_rate));

        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["XRP", "BTC", "ADA"]);

        for record in &records {
            assert_eq!(record.topic, "exchange-rates");
            assert_eq!(record.source, SourceIdentity::for_provider("coingecko"));
            assert_eq!(record.key_schema, &SYMBOL_KEY_SCHEMA);
            assert_eq!(record.value_schema, &EXCHANGE_RATE_SCHEMA);
        }
    }

    #[test]
    fn serialized_record_carries_partition_and_empty_offset() {
        let emitter = RecordEmitter::new("coingecko", "rates");
        let valid = Validator::default()
            .validate(vec![RawRateEntry { symbol: Some("btc".into()), ..Default::default() }])
            .valid;
        let records = emitter.emit(valid.iter().map(map_rate));

        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["source"]["partition"]["id"], "coingecko");
        assert_eq!(json["source"]["offset"], serde_json::json!({}));
        assert_eq!(json["key"]["symbol"], "BTC");
        assert_eq!(json["key_schema"]["name"], "SymbolKeyRecord");
        assert_eq!(json["value_schema"]["name"], "TokenExchangeRateRecord");
    }
}
