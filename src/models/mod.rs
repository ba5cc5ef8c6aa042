pub mod address_classifier;
pub mod analysis;
pub mod currency;
pub mod flow_graph;
pub mod transaction;

pub use address_classifier::AddressClassifier;
pub use analysis::{AnalysisResult, EndReceiverCandidate};
pub use currency::Currency;
pub use flow_graph::{AddressNode, FlowGraph, FlowGraphBuilder, TransferEdge};
pub use transaction::{format_timestamp, Transaction};
