// @file: rate_ingestion/src/core/schema.rs
// @description: Fixed key/value wire schemas attached to every emitted record.
// @author: LAS.

use serde::Serialize;


//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Double,
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub optional: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const fn required(name: &'static str, field_type: FieldType) -> Field {
    Field { name, field_type, optional: false }
}

const fn optional(name: &'static str, field_type: FieldType) -> Field {
    Field { name, field_type, optional: true }
}


//
// SCHEMAS
//

pub static SYMBOL_KEY_SCHEMA: Schema = Schema {
    name: "SymbolKeyRecord",
    fields: &[required("symbol", FieldType::String)],
};

// Order matches the serialized field order of ExchangeRateRecord.
pub static EXCHANGE_RATE_SCHEMA: Schema = Schema {
    name: "TokenExchangeRateRecord",
    fields: &[
        required("symbol", FieldType::String),
        optional("id", FieldType::String),
        optional("name", FieldType::String),
        optional("image", FieldType::String),
        optional("current_price", FieldType::Double),
        optional("market_cap", FieldType::Double),
        optional("market_cap_rank", FieldType::Int),
        optional("total_volume", FieldType::Double),
        optional("high_24h", FieldType::Double),
        optional("low_24h", FieldType::Double),
        optional("price_change_24h", FieldType::Double),
        optional("price_change_percentage_24h", FieldType::Double),
        optional("market_cap_change_24h", FieldType::Double),
        optional("market_cap_change_percentage_24h", FieldType::Double),
        optional("circulating_supply", FieldType::Double),
        optional("total_supply", FieldType::Double),
        optional("max_supply", FieldType::Double),
        optional("last_updated", FieldType::String),
    ],
};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{RawRateEntry, SymbolKey};
    use crate::core::mapping::map_rate;
    use crate::core::validation::Validator;
    use serde_json::Value;

    fn serialized_keys(value: &Value) -> Vec<String> {
        value.as_object().map(|o| o.keys().cloned().collect()).unwrap_or_default()
    }

    #[test]
    fn key_schema_matches_serialized_key() {
        let json: Value = serde_json::to_value(SymbolKey::from_symbol("btc")).unwrap();
        let names: Vec<&str> = SYMBOL_KEY_SCHEMA.field_names().collect();
        assert_eq!(serialized_keys(&json), names);
    }

    #[test]
    fn value_schema_matches_serialized_record_regardless_of_source_fields() {
        let sparse = RawRateEntry { symbol: Some("btc".into()), ..Default::default() };
        let rich = RawRateEntry {
            symbol: Some("eth".into()),
            current_price: Some(3100.0),
            market_cap_rank: Some(2),
            last_updated: Some("2024-01-01T00:00:00Z".into()),
            ..Default::default()
        };

        let outcome = Validator::default().validate(vec![sparse, rich]);
        let mut expected: Vec<&str> = EXCHANGE_RATE_SCHEMA.field_names().collect();
        expected.sort_unstable();

        for rate in &outcome.valid {
            let (_, record) = map_rate(rate);
            let json: Value = serde_json::to_value(&record).unwrap();
            let mut got: Vec<String> = serialized_keys(&json);
            got.sort_unstable();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn field_lookup_reports_type_and_optionality() {
        let rank = EXCHANGE_RATE_SCHEMA.field("market_cap_rank").unwrap();
        assert_eq!(rank.field_type, FieldType::Int);
        assert!(rank.optional);
        assert!(!EXCHANGE_RATE_SCHEMA.field("symbol").unwrap().optional);
        assert!(EXCHANGE_RATE_SCHEMA.field("ath").is_none());
    }
}
