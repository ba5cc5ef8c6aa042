use serde::{Deserialize, Serialize};

use crate::models::{Currency, FlowGraph, Transaction};

/// Terminal address candidate produced by the end receiver search.
///
/// The probability is the product of the per-hop decay along the path that
/// first reached the address, so it always lies in (0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndReceiverCandidate {
    pub address: String,
    pub probability: f64,
}

/// Complete result of one transaction flow analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub address: String,
    pub currency: Currency,
    pub total_transactions: usize,
    pub incoming_transactions: usize,
    pub outgoing_transactions: usize,
    /// Sum of all transfer amounts in the batch, both directions.
    pub total_volume: f64,
    pub end_receivers: Vec<EndReceiverCandidate>,
    pub graph: FlowGraph,
    pub transactions: Vec<Transaction>,
}

impl AnalysisResult {
    /// Best ranked end receiver, if the search produced any.
    pub fn top_receiver(&self) -> Option<&EndReceiverCandidate> {
        self.end_receivers.first()
    }
}
