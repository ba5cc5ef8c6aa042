use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::chain::{FetchError, RecordError};
use crate::logging::LogContext;
use crate::models::{Currency, Transaction};

const SUN_PER_TRX: f64 = 1_000_000.0;

/// Adapter for the TronGrid account transaction API.
///
/// Only `Transfer` records are kept; TronGrid interleaves contract
/// invocations and other event types in the same listing.
#[derive(Clone)]
pub struct TronAdapter {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TronResponse {
    #[serde(default)]
    data: Vec<Value>,
}

/// One record of the TronGrid listing. Most fields are optional upstream;
/// `value` stays untyped because the API emits it as either a number or a
/// decimal string.
#[derive(Debug, Deserialize)]
struct TronTx {
    #[serde(rename = "type", default)]
    tx_type: String,
    #[serde(rename = "txID")]
    tx_id: Option<String>,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: Value,
    block_timestamp: Option<u64>,
    #[serde(default)]
    block: u64,
}

impl TronAdapter {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn fetch_transfers(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, FetchError> {
        let context = LogContext::new("tron_adapter", "fetch_transfers").with_address(address);

        let url = format!("{}/v1/accounts/{}/transactions", self.base_url, address);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body: TronResponse = response.json().await?;

        let mut transfers = Vec::new();
        for record in body.data {
            match self.parse_record(record) {
                Ok(Some(transaction)) => transfers.push(transaction),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Failed to parse Tron transaction record: {}", err);
                }
            }
        }

        context.debug(&format!("Fetched {} Tron transfers", transfers.len()));
        Ok(transfers)
    }

    /// Converts one listing record, returning `None` for non-transfer types.
    fn parse_record(&self, record: Value) -> Result<Option<Transaction>, RecordError> {
        let tx: TronTx =
            serde_json::from_value(record).map_err(|err| RecordError::Shape(err.to_string()))?;

        if tx.tx_type != "Transfer" {
            return Ok(None);
        }

        let tx_hash = tx.tx_id.ok_or(RecordError::MissingField("txID"))?;
        let block_timestamp = tx
            .block_timestamp
            .ok_or(RecordError::MissingField("block_timestamp"))?;
        let amount = numeric_value("value", &tx.value)? / SUN_PER_TRX;

        Ok(Some(Transaction {
            tx_hash,
            from_address: tx.from,
            to_address: tx.to,
            timestamp: block_timestamp / 1000,
            amount,
            currency: Currency::Trx,
            block_number: tx.block,
            gas_price: None,
            gas_used: None,
        }))
    }
}

/// Reads a numeric field that may arrive as a JSON number or a string.
/// A missing value counts as zero.
fn numeric_value(field: &'static str, value: &Value) -> Result<f64, RecordError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(number) => number.as_f64().ok_or_else(|| RecordError::InvalidNumber {
            field,
            value: number.to_string(),
        }),
        Value::String(text) => text.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
            field,
            value: text.clone(),
        }),
        other => Err(RecordError::InvalidNumber {
            field,
            value: other.to_string(),
        }),
    }
}
