use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{format_timestamp, AnalysisResult, Currency};

/// Serializable snapshot of a flow graph, shaped for visualization tools.
///
/// Node and edge order is deterministic: nodes sort by id, edges by
/// timestamp then transaction hash, so repeated exports of the same
/// analysis produce identical files.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphExport {
    pub address: String,
    pub currency: Currency,
    pub timestamp: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub currency: Currency,
    pub first_seen: String,
    pub last_seen: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub tx_hash: String,
    pub amount: f64,
    pub timestamp: String,
    pub currency: Currency,
}

impl GraphExport {
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        let mut nodes: Vec<_> = analysis.graph.nodes().collect();
        nodes.sort_by(|a, b| a.address.cmp(&b.address));
        let nodes = nodes
            .into_iter()
            .map(|node| GraphNode {
                id: node.address.clone(),
                currency: node.currency,
                first_seen: format_timestamp(node.first_seen),
                last_seen: format_timestamp(node.last_seen),
            })
            .collect();

        let mut edges: Vec<_> = analysis.graph.edges().collect();
        edges.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.tx_hash.cmp(&b.tx_hash))
        });
        let edges = edges
            .into_iter()
            .map(|edge| GraphEdge {
                source: edge.from_address.clone(),
                target: edge.to_address.clone(),
                tx_hash: edge.tx_hash.clone(),
                amount: edge.amount,
                timestamp: format_timestamp(edge.timestamp),
                currency: edge.currency,
            })
            .collect();

        Self {
            address: analysis.address.clone(),
            currency: analysis.currency,
            timestamp: chrono::Utc::now().to_rfc3339(),
            nodes,
            edges,
        }
    }

    /// Writes the export as pretty printed JSON to
    /// `<dir>/<address>_graph.json`, creating the directory if needed.
    /// Returns the path of the written file.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}_graph.json", self.address));
        let body = serde_json::to_vec_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&path, body)?;
        Ok(path)
    }
}
