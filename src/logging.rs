use log::{debug, error, info, trace, warn};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Structured logging context for the tracker
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, Value>,
}

impl LogContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_transaction_hash(self, tx_hash: &str) -> Self {
        self.with_metadata("transaction_hash", json!(tx_hash))
    }

    pub fn with_address(self, address: &str) -> Self {
        self.with_metadata("address", json!(address))
    }

    pub fn with_currency(self, currency: &str) -> Self {
        self.with_metadata("currency", json!(currency))
    }

    pub fn with_duration_ms(self, duration_ms: u64) -> Self {
        self.with_metadata("duration_ms", json!(duration_ms))
    }

    fn format_message(&self, level: &str, message: &str) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut log_entry = json!({
            "timestamp": timestamp,
            "level": level,
            "component": self.component,
            "operation": self.operation,
            "message": message,
        });

        // Add metadata
        for (key, value) in &self.metadata {
            log_entry[key] = value.clone();
        }

        log_entry.to_string()
    }

    pub fn info(&self, message: &str) {
        info!("{}", self.format_message("INFO", message));
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", self.format_message("WARN", message));
    }

    pub fn error(&self, message: &str) {
        error!("{}", self.format_message("ERROR", message));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", self.format_message("DEBUG", message));
    }

    pub fn trace(&self, message: &str) {
        trace!("{}", self.format_message("TRACE", message));
    }
}

/// Performance monitoring utilities
pub struct PerformanceMonitor {
    pub start_time: SystemTime,
    operation: String,
    metadata: HashMap<String, Value>,
}

impl PerformanceMonitor {
    pub fn new(operation: &str) -> Self {
        Self {
            start_time: SystemTime::now(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn finish(self) -> u64 {
        let duration = SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut context = LogContext::new("performance", &self.operation).with_duration_ms(duration);

        for (key, value) in self.metadata {
            context = context.with_metadata(&key, value);
        }

        context.info(&format!("Operation completed in {}ms", duration));
        duration
    }

    pub fn finish_with_result<T, E>(self, result: &Result<T, E>) -> u64
    where
        E: std::fmt::Display,
    {
        let duration = SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut context = LogContext::new("performance", &self.operation).with_duration_ms(duration);

        for (key, value) in self.metadata {
            context = context.with_metadata(&key, value);
        }

        match result {
            Ok(_) => {
                context.info(&format!("Operation completed successfully in {}ms", duration));
            }
            Err(e) => {
                context = context.with_metadata("error", json!(e.to_string()));
                context.error(&format!("Operation failed after {}ms: {}", duration, e));
            }
        }

        duration
    }
}

/// Error logging utilities
pub struct ErrorLogger;

impl ErrorLogger {
    pub fn log_error(error: &crate::error::TrackerError, context: Option<LogContext>) {
        let severity = error.severity();
        let is_recoverable = error.is_recoverable();

        let mut log_context = context.unwrap_or_else(|| LogContext::new("error", "unknown"));
        log_context = log_context
            .with_metadata("error_type", json!(format!("{:?}", error)))
            .with_metadata("severity", json!(format!("{:?}", severity)))
            .with_metadata("recoverable", json!(is_recoverable));

        let message = format!("Error occurred: {}", error);

        match severity {
            crate::error::ErrorSeverity::Critical => log_context.error(&message),
            crate::error::ErrorSeverity::High => log_context.error(&message),
            crate::error::ErrorSeverity::Medium => log_context.warn(&message),
            crate::error::ErrorSeverity::Low => log_context.info(&message),
        }
    }
}

/// Application metrics and monitoring
pub struct MetricsLogger;

impl MetricsLogger {
    pub fn log_fetch(chain: &str, address: &str, transfer_count: usize, duration_ms: u64, success: bool) {
        let context = LogContext::new("metrics", "transfer_fetch")
            .with_currency(chain)
            .with_address(address)
            .with_metadata("transfer_count", json!(transfer_count))
            .with_duration_ms(duration_ms)
            .with_metadata("success", json!(success));

        if success {
            context.debug(&format!(
                "Fetched {} {} transfers in {}ms",
                transfer_count, chain, duration_ms
            ));
        } else {
            context.warn(&format!("{} transfer fetch failed after {}ms", chain, duration_ms));
        }
    }

    pub fn log_analysis(
        currency: &str,
        address: &str,
        transaction_count: usize,
        receiver_count: usize,
        duration_ms: u64,
    ) {
        let context = LogContext::new("metrics", "flow_analysis")
            .with_currency(currency)
            .with_address(address)
            .with_metadata("transaction_count", json!(transaction_count))
            .with_metadata("receiver_count", json!(receiver_count))
            .with_duration_ms(duration_ms);

        context.info(&format!(
            "Analyzed {} transactions with {} candidate receivers",
            transaction_count, receiver_count
        ));
    }

    pub fn log_graph_export(address: &str, node_count: usize, edge_count: usize) {
        let context = LogContext::new("metrics", "graph_export")
            .with_address(address)
            .with_metadata("node_count", json!(node_count))
            .with_metadata("edge_count", json!(edge_count));

        context.debug(&format!(
            "Exported graph with {} nodes and {} edges",
            node_count, edge_count
        ));
    }
}

/// Initialize structured logging for the application
pub fn init_logging(default_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize env_logger with custom format; RUST_LOG still wins over
    // the configured default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            use std::io::Write;

            // Try to parse as JSON for structured logs
            if let Ok(json_value) =
                serde_json::from_str::<Value>(record.args().to_string().as_str())
            {
                writeln!(buf, "{}", serde_json::to_string_pretty(&json_value)?)
            } else {
                // Fall back to standard format for non-structured logs
                writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            }
        })
        .init();

    info!("Structured logging initialized");
    Ok(())
}
