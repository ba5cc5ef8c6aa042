use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::chain::{FetchError, RecordError};
use crate::logging::LogContext;
use crate::models::{Currency, Transaction};

const WEI_PER_ETH: f64 = 1e18;
const WEI_PER_GWEI: f64 = 1e9;

/// Adapter for an Etherscan-compatible account API.
///
/// Requires an API key; without one the adapter runs in degraded mode and
/// reports every address as having no transfers.
#[derive(Clone)]
pub struct EthereumAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Top-level Etherscan envelope. `result` stays untyped because the API
/// replaces the transaction array with an error string on failure.
#[derive(Debug, Deserialize)]
struct TxListEnvelope {
    status: String,
    message: String,
    result: Value,
}

#[derive(Debug, Deserialize)]
struct EtherscanTx {
    hash: String,
    from: String,
    to: String,
    value: String,
    #[serde(rename = "timeStamp")]
    time_stamp: String,
    #[serde(rename = "blockNumber")]
    block_number: String,
    #[serde(rename = "gasPrice", default)]
    gas_price: Option<String>,
    #[serde(rename = "gasUsed", default)]
    gas_used: Option<String>,
}

impl EthereumAdapter {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub async fn fetch_transfers(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, FetchError> {
        let context = LogContext::new("ethereum_adapter", "fetch_transfers").with_address(address);

        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                context.warn("No Etherscan API key configured, returning no transfers");
                return Ok(Vec::new());
            }
        };

        let url = format!("{}/api", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "asc"),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: TxListEnvelope = response.json().await?;
        if envelope.status != "1" {
            context.warn(&format!("Etherscan API error: {}", envelope.message));
            return Ok(Vec::new());
        }

        let raw_records: Vec<Value> = serde_json::from_value(envelope.result)?;

        let mut transfers = Vec::new();
        for raw in raw_records.into_iter().take(limit) {
            match parse_record(raw) {
                Ok(tx) => transfers.push(tx),
                Err(e) => {
                    log::warn!("Failed to parse Ethereum transaction record: {}", e);
                }
            }
        }

        context.debug(&format!("Fetched {} Ethereum transfers", transfers.len()));
        Ok(transfers)
    }
}

fn parse_record(raw: Value) -> Result<Transaction, RecordError> {
    let record: EtherscanTx =
        serde_json::from_value(raw).map_err(|e| RecordError::Shape(e.to_string()))?;

    let amount = parse_decimal("value", &record.value)? / WEI_PER_ETH;
    let timestamp = parse_integer("timeStamp", &record.time_stamp)?;
    let block_number = parse_integer("blockNumber", &record.block_number)?;

    // Empty strings mean the field was not populated upstream
    let gas_price = match record.gas_price.as_deref() {
        Some(value) if !value.is_empty() => Some(parse_decimal("gasPrice", value)? / WEI_PER_GWEI),
        _ => None,
    };
    let gas_used = match record.gas_used.as_deref() {
        Some(value) if !value.is_empty() => Some(parse_decimal("gasUsed", value)?),
        _ => None,
    };

    Ok(Transaction {
        tx_hash: record.hash,
        from_address: record.from,
        to_address: record.to,
        timestamp,
        amount,
        currency: Currency::Eth,
        block_number,
        gas_price,
        gas_used,
    })
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_integer(field: &'static str, value: &str) -> Result<u64, RecordError> {
    value.parse::<u64>().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
