pub mod bitcoin;
pub mod ethereum;
pub mod tron;

pub use bitcoin::BitcoinAdapter;
pub use ethereum::EthereumAdapter;
pub use tron::TronAdapter;

use reqwest::Client;
use thiserror::Error;

use crate::config::TrackerConfig;
use crate::logging::{MetricsLogger, PerformanceMonitor};
use crate::models::{Currency, Transaction};

/// Transport and protocol failures while talking to an upstream data source.
///
/// "No data" is never an error; adapters report it as an empty batch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP status {status}")]
    Status { status: u16 },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// A single upstream record that could not be mapped to a [`Transaction`].
///
/// Never escapes an adapter: the record is logged and skipped so the rest of
/// the batch survives.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record does not match the expected shape: {0}")]
    Shape(String),

    #[error("invalid numeric value in field {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Shared HTTP client for all adapters, with the configured timeout and a
/// stable user agent.
pub fn build_http_client(timeout_seconds: u64, user_agent: &str) -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .build()
        .expect("Failed to create HTTP client")
}

/// Closed set of chain adapters. One variant per upstream data source; the
/// orchestrator selects a variant from the resolved currency tag.
#[derive(Clone)]
pub enum ChainAdapter {
    Ethereum(EthereumAdapter),
    Bitcoin(BitcoinAdapter),
    Tron(TronAdapter),
}

impl ChainAdapter {
    /// Construct the adapter for a currency, or `None` for currencies
    /// without a transfer source.
    pub fn for_currency(currency: Currency, config: &TrackerConfig, client: Client) -> Option<Self> {
        match currency {
            Currency::Eth => Some(ChainAdapter::Ethereum(EthereumAdapter::new(
                client,
                config.etherscan.base_url.clone(),
                config.etherscan.api_key.clone(),
            ))),
            Currency::Btc => Some(ChainAdapter::Bitcoin(BitcoinAdapter::new(
                client,
                config.bitcoin.base_url.clone(),
            ))),
            Currency::Trx => Some(ChainAdapter::Tron(TronAdapter::new(
                client,
                config.tron.base_url.clone(),
            ))),
            _ => None,
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            ChainAdapter::Ethereum(_) => Currency::Eth,
            ChainAdapter::Bitcoin(_) => Currency::Btc,
            ChainAdapter::Tron(_) => Currency::Trx,
        }
    }

    /// Fetch up to `limit` historical transfers for an address, normalized
    /// into the common transaction shape. Timing and outcome are logged as
    /// fetch metrics.
    pub async fn fetch_transfers(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, FetchError> {
        let monitor = PerformanceMonitor::new("fetch_transfers")
            .with_metadata("chain", serde_json::json!(self.currency().code()))
            .with_metadata("address", serde_json::json!(address));

        let result = match self {
            ChainAdapter::Ethereum(adapter) => adapter.fetch_transfers(address, limit).await,
            ChainAdapter::Bitcoin(adapter) => adapter.fetch_transfers(address, limit).await,
            ChainAdapter::Tron(adapter) => adapter.fetch_transfers(address, limit).await,
        };

        let duration = monitor.finish_with_result(&result);
        let count = result.as_ref().map(|batch| batch.len()).unwrap_or(0);
        MetricsLogger::log_fetch(self.currency().code(), address, count, duration, result.is_ok());

        result
    }
}
