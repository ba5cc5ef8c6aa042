pub mod end_receiver;
pub mod tracker;

pub use end_receiver::{EndReceiverRanker, DEFAULT_MAX_DEPTH};
pub use tracker::{AnalysisError, FlowTracker};
