use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Currency;

/// Normalized transfer record produced by a chain adapter.
///
/// Amounts are in the chain's major unit (ETH, BTC, TRX), timestamps are
/// Unix epoch seconds. Gas fields are only present for account-model chains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub timestamp: u64,
    pub amount: f64,
    pub currency: Currency,
    pub block_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<f64>,
}

impl Transaction {
    pub fn is_incoming_for(&self, address: &str) -> bool {
        self.to_address == address
    }

    pub fn is_outgoing_for(&self, address: &str) -> bool {
        self.from_address == address
    }

    /// Timestamp rendered as RFC 3339 for web and export payloads.
    pub fn timestamp_rfc3339(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

/// Render epoch seconds as an RFC 3339 string, empty on out-of-range values.
pub fn format_timestamp(timestamp: u64) -> String {
    Utc.timestamp_opt(timestamp as i64, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
#
[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    fn sample_transaction() -> Transaction {
        Transaction {
            tx_hash: "0xabc123".to_string(),
            from_address: "0x1234567890abcdef".to_string(),
            to_address: "0xfedcba0987654321".to_string(),
            timestamp: 1640995200,
            amount: 1.5,
            currency: Currency::Eth,
            block_number: 12345,
            gas_price: Some(20.0),
            gas_used: Some(21000.0),
        }
    }

    #[test]
    fn test_transaction_serialization() {
        let transaction = sample_transaction();

        let json = serde_json::to_string(&transaction).expect("Failed to serialize");
        assert!(json.contains("\"block_number\":12345"));
        assert!(json.contains("\"currency\":\"ETH\""));
        assert!(json.contains("\"amount\":1.5"));

        let deserialized: Transaction = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(transaction, deserialized);
    }

    #[test]
    fn test_gas_fields_omitted_when_absent() {
        let mut transaction = sample_transaction();
        transaction.gas_price = None;
        transaction.gas_used = None;

        let json = serde_json::to_string(&transaction).expect("Failed to serialize");
        assert!(!json.contains("gas_price"));
        assert!(!json.contains("gas_used"));
    }

    #[test]
    fn test_direction_helpers() {
        let transaction = sample_transaction();

        assert!(transaction.is_outgoing_for("0x1234567890abcdef"));
        assert!(!transaction.is_incoming_for("0x1234567890abcdef"));
        assert!(transaction.is_incoming_for("0xfedcba0987654321"));
        assert!(!transaction.is_incoming_for("0xsomebodyelse"));
    }

    #[test]
    fn test_timestamp_formatting() {
        let transaction = sample_transaction();
        // 2022-01-01 00:00:00 UTC
        assert!(transaction.timestamp_rfc3339().starts_with("2022-01-01T00:00:00"));
    }
}
