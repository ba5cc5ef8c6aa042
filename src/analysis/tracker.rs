use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::analysis::EndReceiverRanker;
use crate::chain::{build_http_client, ChainAdapter, FetchError};
use crate::config::TrackerConfig;
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};
use crate::models::{AddressClassifier, AnalysisResult, Currency, FlowGraphBuilder, Transaction};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(Currency),

    #[error("No transactions found")]
    NoTransactions,

    #[error("Failed to fetch transactions: {0}")]
    Fetch(#[from] FetchError),
}

/// Orchestrates a full flow analysis: currency detection, transfer fetch,
/// graph construction, end receiver ranking and summary statistics.
///
/// Cloning is cheap; the HTTP client is reference counted and shared across
/// clones, which the batch path relies on.
#[derive(Clone)]
pub struct FlowTracker {
    config: TrackerConfig,
    client: Client,
    ranker: EndReceiverRanker,
}

impl FlowTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let client = build_http_client(config.fetch.timeout_seconds, &config.fetch.user_agent);
        let ranker = EndReceiverRanker::new(config.analysis.max_depth);
        Self {
            config,
            client,
            ranker,
        }
    }

    /// Analyze the transaction flow around one address. When `currency` is
    /// `None` it is detected from the address format.
    pub async fn analyze(
        &self,
        address: &str,
        currency: Option<Currency>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let monitor = PerformanceMonitor::new("analyze_flow")
            .with_metadata("address", serde_json::json!(address));

        let result = self.analyze_inner(address, currency).await;

        let duration = monitor.finish_with_result(&result);
        if let Ok(analysis) = &result {
            MetricsLogger::log_analysis(
                analysis.currency.code(),
                address,
                analysis.total_transactions,
                analysis.end_receivers.len(),
                duration,
            );
        }
        result
    }

    async fn analyze_inner(
        &self,
        address: &str,
        currency: Option<Currency>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let currency = currency.unwrap_or_else(|| AddressClassifier::classify(address));
        let context = LogContext::new("flow_tracker", "analyze")
            .with_address(address)
            .with_currency(currency.code());
        context.info("Starting transaction flow analysis");

        let adapter = ChainAdapter::for_currency(currency, &self.config, self.client.clone())
            .ok_or(AnalysisError::UnsupportedCurrency(currency))?;

        let transactions = adapter
            .fetch_transfers(address, self.config.fetch.max_transactions)
            .await?;
        if transactions.is_empty() {
            context.warn("No transactions found for address");
            return Err(AnalysisError::NoTransactions);
        }

        let graph = FlowGraphBuilder::build(&transactions);
        let end_receivers = self.ranker.rank(&graph, address);
        let (incoming, outgoing, total_volume) = summarize(&transactions, address);

        context.info(&format!(
            "Analysis complete: {} transactions, {} candidate receivers",
            transactions.len(),
            end_receivers.len()
        ));

        Ok(AnalysisResult {
            address: address.to_string(),
            currency,
            total_transactions: transactions.len(),
            incoming_transactions: incoming,
            outgoing_transactions: outgoing,
            total_volume,
            end_receivers,
            graph,
            transactions,
        })
    }

    /// Analyze several addresses with bounded concurrency, preserving
    /// input order. Each address gets its own result; one failure does not
    /// abort the batch.
    pub async fn analyze_many(
        &self,
        addresses: &[String],
    ) -> Vec<(String, Result<AnalysisResult, AnalysisError>)> {
        let concurrency = self.config.analysis.batch_concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = Vec::with_capacity(addresses.len());

        for address in addresses {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("Semaphore closed");
            let tracker = self.clone();
            let address = address.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let result = tracker.analyze(&address, None).await;
                (address, result)
            }));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(entry) => results.push(entry),
                Err(err) => log::error!("Analysis task panicked: {}", err),
            }
        }
        results
    }
}

/// Incoming count, outgoing count and total moved volume for one address.
/// A self transfer counts on both sides.
fn summarize(transactions: &[Transaction], address: &str) -> (usize, usize, f64) {
    let incoming = transactions
        .iter()
        .filter(|tx| tx.is_incoming_for(address))
        .count();
    let outgoing = transactions
        .iter()
        .filter(|tx| tx.is_outgoing_for(address))
        .count();
    let total_volume = transactions.iter().map(|tx| tx.amount).sum();
    (incoming, outgoing, total_volume)
}
