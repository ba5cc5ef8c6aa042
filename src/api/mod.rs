pub mod cli;
pub mod http;

pub use cli::{Cli, CliError, CliHandler, Commands};
pub use http::{
    analyze_address, detect_currency, health_check, transaction_graph, AnalyzeRequest,
    AnalyzeResponse, ApiError, ApiServer, AppState, DetectRequest, DetectResponse, ErrorResponse,
    GraphResponse, HealthResponse, TransactionView,
};
