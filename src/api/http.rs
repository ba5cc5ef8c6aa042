use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::analysis::{AnalysisError, FlowTracker};
use crate::export::{GraphEdge, GraphExport, GraphNode};
use crate::models::{AddressClassifier, AnalysisResult, Currency};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server error: {0}")]
    Server(String),
}

/// Request body shared by the analysis endpoints. The currency override is
/// optional; without it the currency is detected from the address format.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub currency: Option<Currency>,
}

/// Request body for currency detection
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub address: String,
}

/// Response structure for the analyze endpoint
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub address: String,
    pub currency: Currency,
    pub total_transactions: usize,
    pub incoming_transactions: usize,
    pub outgoing_transactions: usize,
    pub total_volume: f64,
    /// Candidate end receivers as `[address, probability]` pairs, highest
    /// probability first
    pub end_receivers: Vec<(String, f64)>,
    pub transactions: Vec<TransactionView>,
}

/// Transaction as rendered over the API, with an RFC 3339 timestamp
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub timestamp: String,
    pub amount: f64,
    pub currency: Currency,
    pub block_number: u64,
}

/// Response structure for the currency detection endpoint
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub address: String,
    pub currency: Currency,
}

/// Response structure for the transaction graph endpoint
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub address: String,
    pub currency: Currency,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Response structure for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl AnalyzeResponse {
    pub fn from_analysis(analysis: AnalysisResult) -> Self {
        let end_receivers = analysis
            .end_receivers
            .into_iter()
            .map(|candidate| (candidate.address, candidate.probability))
            .collect();
        let transactions = analysis
            .transactions
            .into_iter()
            .map(|tx| TransactionView {
                timestamp: tx.timestamp_rfc3339(),
                tx_hash: tx.tx_hash,
                from_address: tx.from_address,
                to_address: tx.to_address,
                amount: tx.amount,
                currency: tx.currency,
                block_number: tx.block_number,
            })
            .collect();

        Self {
            address: analysis.address,
            currency: analysis.currency,
            total_transactions: analysis.total_transactions,
            incoming_transactions: analysis.incoming_transactions,
            outgoing_transactions: analysis.outgoing_transactions,
            total_volume: analysis.total_volume,
            end_receivers,
            transactions,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<FlowTracker>,
}

/// HTTP API server
pub struct ApiServer {
    tracker: Arc<FlowTracker>,
    pub host: String,
    pub port: u16,
}

impl ApiServer {
    /// Create a new API server instance
    pub fn new(tracker: Arc<FlowTracker>, host: &str, port: u16) -> Self {
        Self {
            tracker,
            host: host.to_string(),
            port,
        }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), ApiError> {
        let app_state = AppState {
            tracker: self.tracker.clone(),
        };

        let app = Router::new()
            .route("/api/analyze", post(analyze_address))
            .route("/api/currency-detect", post(detect_currency))
            .route("/api/transaction-graph", post(transaction_graph))
            .route("/api/health", get(health_check))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
            .with_state(app_state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        log::info!("HTTP API server starting on {}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ApiError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// POST /api/analyze - Full transaction flow analysis for one address
pub async fn analyze_address(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let address = request.address.trim();
    if address.is_empty() {
        return Err(invalid_parameter("Address is required"));
    }

    match state.tracker.analyze(address, request.currency).await {
        Ok(analysis) => Ok(Json(AnalyzeResponse::from_analysis(analysis))),
        Err(err) => {
            log::error!("Address analysis failed for {}: {}", address, err);
            Err(analysis_error_response(err))
        }
    }
}

/// POST /api/currency-detect - Detect the currency from an address format
pub async fn detect_currency(
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, (StatusCode, Json<ErrorResponse>)> {
    let address = request.address.trim();
    if address.is_empty() {
        return Err(invalid_parameter("Address is required"));
    }

    let currency = AddressClassifier::classify(address);
    Ok(Json(DetectResponse {
        address: address.to_string(),
        currency,
    }))
}

/// POST /api/transaction-graph - Flow graph data for visualization
pub async fn transaction_graph(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<GraphResponse>, (StatusCode, Json<ErrorResponse>)> {
    let address = request.address.trim();
    if address.is_empty() {
        return Err(invalid_parameter("Address is required"));
    }

    match state.tracker.analyze(address, request.currency).await {
        Ok(analysis) => {
            let GraphExport {
                address,
                currency,
                nodes,
                edges,
                ..
            } = GraphExport::from_analysis(&analysis);
            Ok(Json(GraphResponse {
                address,
                currency,
                nodes,
                edges,
            }))
        }
        Err(err) => {
            log::error!("Transaction graph failed for {}: {}", address, err);
            Err(analysis_error_response(err))
        }
    }
}

/// GET /api/health - Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

fn invalid_parameter(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "invalid_parameter".to_string(),
            message: message.to_string(),
        }),
    )
}

fn analysis_error_response(error: AnalysisError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &error {
        AnalysisError::UnsupportedCurrency(_) => {
            (StatusCode::BAD_REQUEST, "unsupported_currency")
        }
        AnalysisError::NoTransactions => (StatusCode::NOT_FOUND, "no_transactions"),
        AnalysisError::Fetch(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
    };
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: error.to_string(),
        }),
    )
}
