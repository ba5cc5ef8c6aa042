use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Currency, Transaction};

/// Address vertex in the transaction flow graph.
///
/// `first_seen`/`last_seen` hold the span of timestamps at which the address
/// appeared in the analyzed transfers; repeated sightings extend the range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressNode {
    pub address: String,
    pub currency: Currency,
    pub first_seen: u64,
    pub last_seen: u64,
}

impl AddressNode {
    fn observe(&mut self, timestamp: u64) {
        self.first_seen = self.first_seen.min(timestamp);
        self.last_seen = self.last_seen.max(timestamp);
    }
}

/// Directed arc carrying one transfer between two addresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferEdge {
    pub from_address: String,
    pub to_address: String,
    pub tx_hash: String,
    pub amount: f64,
    pub timestamp: u64,
    pub currency: Currency,
}

/// Directed multigraph of transfers, stored as explicit adjacency lists.
///
/// Parallel edges between the same address pair are kept, one per
/// transaction. Outgoing edges preserve the order transfers were added in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: HashMap<String, AddressNode>,
    adjacency: HashMap<String, Vec<TransferEdge>>,
    edge_count: usize,
}

impl FlowGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, address: &str) -> bool {
        self.nodes.contains_key(address)
    }

    pub fn node(&self, address: &str) -> Option<&AddressNode> {
        self.nodes.get(address)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AddressNode> {
        self.nodes.values()
    }

    /// Outgoing edges of an address, in insertion order. Empty for sinks and
    /// for addresses not present in the graph.
    pub fn out_edges(&self, address: &str) -> &[TransferEdge] {
        self.adjacency.get(address).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = &TransferEdge> {
        self.adjacency.values().flatten()
    }

    fn upsert_node(&mut self, address: &str, currency: Currency, timestamp: u64) {
        self.nodes
            .entry(address.to_string())
            .and_modify(|node| node.observe(timestamp))
            .or_insert_with(|| AddressNode {
                address: address.to_string(),
                currency,
                first_seen: timestamp,
                last_seen: timestamp,
            });
    }

    fn add_edge(&mut self, edge: TransferEdge) {
        self.adjacency
            .entry(edge.from_address.clone())
            .or_default()
            .push(edge);
        self.edge_count += 1;
    }
}

/// Builds a [`FlowGraph`] from an ordered batch of normalized transfers.
pub struct FlowGraphBuilder;

impl FlowGraphBuilder {
    /// Consume the transfer batch in input order, upserting both endpoints
    /// as nodes and appending one directed edge per transaction.
    ///
    /// Records without a transaction hash are skipped with a warning; the
    /// build itself never fails.
    pub fn build(transactions: &[Transaction]) -> FlowGraph {
        let mut graph = FlowGraph::default();

        for tx in transactions {
            if tx.tx_hash.is_empty() {
                log::warn!(
                    "Skipping transfer without a transaction hash (from {})",
                    tx.from_address
                );
                continue;
            }

            graph.upsert_node(&tx.from_address, tx.currency, tx.timestamp);
            graph.upsert_node(&tx.to_address, tx.currency, tx.timestamp);
            graph.add_edge(TransferEdge {
                from_address: tx.from_address.clone(),
                to_address: tx.to_address.clone(),
                tx_hash: tx.tx_hash.clone(),
                amount: tx.amount,
                timestamp: tx.timestamp,
                currency: tx.currency,
            });
        }

        graph
    }
}
