use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of the transaction-history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionHistoryResponse {
    #[serde(default)]
    pub items: Option<Vec<TransactionRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Decimal,
}

impl TransactionRecord {
    /// The grouping key, if the record has a usable contract name.
    pub fn contract_key(&self) -> Option<&str> {
        self.contract_name.as_deref().filter(|name| !name.is_empty())
    }
}

pub fn parse_transactions(raw: &str) -> Result<Vec<TransactionRecord>> {
    let parsed = serde_json::from_str::<TransactionHistoryResponse>(raw)?;
    Ok(parsed.items.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_camel_case_items() {
        let raw = r#"{
            "items": [
                {"id": 1, "date": "2025-03-15T14:05:00+03:00", "contractName": "PH25031514", "price": 2450.5, "quantity": 120},
                {"id": 2, "date": "2025-03-15T14:06:00+03:00", "contractName": null, "price": 10, "quantity": 5}
            ]
        }"#;

        let records = parse_transactions(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].contract_name.as_deref(), Some("PH25031514"));
        assert_eq!(records[0].price, dec!(2450.5));
        assert_eq!(records[0].quantity, dec!(120));
        assert_eq!(records[1].contract_key(), None);
    }

    #[test]
    fn null_or_missing_items_is_empty() {
        assert!(parse_transactions(r#"{"items": null}"#).unwrap().is_empty());
        assert!(parse_transactions("{}").unwrap().is_empty());
    }

    #[test]
    fn missing_numbers_default_to_zero() {
        let records = parse_transactions(r#"{"items": [{"id": 7, "contractName": "A"}]}"#).unwrap();
        assert_eq!(records[0].price, Decimal::ZERO);
        assert_eq!(records[0].quantity, Decimal::ZERO);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = parse_transactions("<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn empty_contract_name_has_no_key() {
        let record = TransactionRecord {
            id: 1,
            date: None,
            contract_name: Some(String::new()),
            price: dec!(1),
            quantity: dec!(1),
        };
        assert_eq!(record.contract_key(), None);
    }
}
