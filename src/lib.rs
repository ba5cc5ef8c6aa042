pub mod analysis;
pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;

pub use analysis::{AnalysisError, EndReceiverRanker, FlowTracker};
pub use chain::{ChainAdapter, FetchError, RecordError};
pub use config::{
    AnalysisConfig, ApiConfig, BitcoinConfig, EtherscanConfig, FetchConfig, LoggingConfig,
    TrackerConfig, TronConfig,
};
pub use error::{ErrorSeverity, Result, TrackerError};
pub use export::{GraphEdge, GraphExport, GraphNode};
pub use logging::{ErrorLogger, LogContext, MetricsLogger, PerformanceMonitor};
pub use models::{
    AddressClassifier, AddressNode, AnalysisResult, Currency, EndReceiverCandidate, FlowGraph,
    FlowGraphBuilder, Transaction, TransferEdge,
};
