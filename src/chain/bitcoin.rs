use reqwest::Client;
use serde::Deserialize;

use crate::chain::FetchError;
use crate::logging::LogContext;
use crate::models::{Currency, Transaction};

/// Nominal amount attached to every Bitcoin transfer. Input/output values
/// are not decoded from the UTXO data, so amounts carry no real signal.
const PLACEHOLDER_AMOUNT: f64 = 0.001;

/// Adapter for a Blockstream-compatible Esplora API.
///
/// Produces one simplified transfer per confirmed transaction: the queried
/// address as the sender, an empty receiver and a placeholder amount.
#[derive(Clone)]
pub struct BitcoinAdapter {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AddressInfo {
    #[serde(default)]
    chain_stats: ChainStats,
}

#[derive(Debug, Default, Deserialize)]
struct ChainStats {
    #[serde(default)]
    tx_count: u64,
}

#[derive(Debug, Deserialize)]
struct BlockstreamTx {
    #[serde(default)]
    txid: String,
    #[serde(default)]
    status: TxStatus,
}

#[derive(Debug, Default, Deserialize)]
struct TxStatus {
    #[serde(default)]
    block_time: u64,
    #[serde(default)]
    block_height: u64,
}

impl BitcoinAdapter {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn fetch_transfers(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, FetchError> {
        let context = LogContext::new("bitcoin_adapter", "fetch_transfers").with_address(address);

        // First call: address summary, to short-circuit inactive addresses
        let info_url = format!("{}/address/{}", self.base_url, address);
        let response = self.client.get(&info_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let info: AddressInfo = response.json().await?;

        if info.chain_stats.tx_count == 0 {
            context.debug("Address has no confirmed transactions");
            return Ok(Vec::new());
        }

        // Second call: the recent transaction list
        let txs_url = format!("{}/address/{}/txs", self.base_url, address);
        let response = self.client.get(&txs_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let tx_list: Vec<BlockstreamTx> = response.json().await?;

        let transfers: Vec<Transaction> = tx_list
            .into_iter()
            .take(limit)
            // Unconfirmed entries have no block time; they are expected and
            // dropped without a warning
            .filter(|tx| tx.status.block_time != 0 && !tx.txid.is_empty())
            .map(|tx| Transaction {
                tx_hash: tx.txid,
                from_address: address.to_string(),
                to_address: String::new(),
                timestamp: tx.status.block_time,
                amount: PLACEHOLDER_AMOUNT,
                currency: Currency::Btc,
                block_number: tx.status.block_height,
                gas_price: None,
                gas_used: None,
            })
            .collect();

        context.debug(&format!("Fetched {} Bitcoin transfers", transfers.len()));
        Ok(transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_info_deserialization() {
        let info: AddressInfo =
            serde_json::from_str(r#"{"chain_stats":{"tx_count":42}}"#).expect("should parse");
        assert_eq!(info.chain_stats.tx_count, 42);

        // Missing stats default to zero activity
        let empty: AddressInfo = serde_json::from_str("{}").expect("should parse");
        assert_eq!(empty.chain_stats.tx_count, 0);
    }

    #[test]
    fn test_transaction_deserialization_defaults() {
        let tx: BlockstreamTx = serde_json::from_str(r#"{"txid":"abc"}"#).expect("should parse");
        assert_eq!(tx.txid, "abc");
        assert_eq!(tx.status.block_time, 0);
        assert_eq!(tx.status.block_height, 0);
    }
}
