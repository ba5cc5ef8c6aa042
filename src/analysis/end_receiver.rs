use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{EndReceiverCandidate, FlowGraph};

/// Probability multiplier applied on every hop away from the start address.
const HOP_DECAY: f64 = 0.8;

/// Maximum number of ranked candidates returned per traversal.
const MAX_CANDIDATES: usize = 10;

pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Ranks terminal addresses of a flow graph by likelihood of being the
/// final destination of funds.
///
/// The traversal is a depth-first walk from the start address. Each hop
/// multiplies the path probability by [`HOP_DECAY`]; addresses with no
/// outgoing transfers are recorded with the probability of the path that
/// reached them first. A single visited set is shared across the whole
/// walk, so an address reachable over several paths is only expanded once.
#[derive(Debug, Clone)]
pub struct EndReceiverRanker {
    max_depth: u32,
}

impl EndReceiverRanker {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Returns up to [`MAX_CANDIDATES`] terminal addresses, highest
    /// probability first. A start address absent from the graph yields an
    /// empty ranking; a start address with no outgoing transfers is its own
    /// end receiver with probability 1.0.
    pub fn rank(&self, graph: &FlowGraph, start: &str) -> Vec<EndReceiverCandidate> {
        if !graph.contains(start) {
            return Vec::new();
        }

        let mut visited = HashSet::new();
        let mut receivers = Vec::new();
        self.visit(graph, start, 0, 1.0, &mut visited, &mut receivers);

        receivers.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        receivers.truncate(MAX_CANDIDATES);
        receivers
    }

    fn visit(
        &self,
        graph: &FlowGraph,
        node: &str,
        depth: u32,
        path_probability: f64,
        visited: &mut HashSet<String>,
        receivers: &mut Vec<EndReceiverCandidate>,
    ) {
        if depth > self.max_depth || visited.contains(node) {
            return;
        }
        visited.insert(node.to_string());

        let successors = successors_in_order(graph, node);
        if successors.is_empty() {
            receivers.push(EndReceiverCandidate {
                address: node.to_string(),
                probability: path_probability,
            });
            return;
        }

        for successor in successors {
            self.visit(
                graph,
                successor,
                depth + 1,
                path_probability * HOP_DECAY,
                visited,
                receivers,
            );
        }
    }
}

impl Default for EndReceiverRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Distinct successor addresses in first-edge order. Parallel transfers to
/// the same counterparty count as one successor.
fn successors_in_order<'a>(graph: &'a FlowGraph, node: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut successors = Vec::new();
    for edge in graph.out_edges(node) {
        if seen.insert(edge.to_address.as_str()) {
            successors.push(edge.to_address.as_str());
        }
    }
    successors
}
