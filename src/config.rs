use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub etherscan: EtherscanConfig,
    pub bitcoin: BitcoinConfig,
    pub tron: TronConfig,
    pub fetch: FetchConfig,
    pub analysis: AnalysisConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Etherscan API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtherscanConfig {
    /// Etherscan API key; without one the Ethereum adapter runs degraded
    /// and returns no transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Etherscan API base URL
    pub base_url: String,
}

/// Blockstream Esplora API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitcoinConfig {
    /// Esplora API base URL
    pub base_url: String,
}

/// TronGrid API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TronConfig {
    /// TronGrid API base URL
    pub base_url: String,
}

/// Transfer fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum transactions fetched per address
    pub max_transactions: usize,
    /// User agent sent with upstream API requests
    pub user_agent: String,
}

/// Flow analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum traversal depth when ranking end receivers
    pub max_depth: u32,
    /// Concurrent analyses in batch mode
    pub batch_concurrency: usize,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enable HTTP API server
    pub enabled: bool,
    /// Server host/bind address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            etherscan: EtherscanConfig::default(),
            bitcoin: BitcoinConfig::default(),
            tron: TronConfig::default(),
            fetch: FetchConfig::default(),
            analysis: AnalysisConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.etherscan.io".to_string(),
        }
    }
}

impl Default for BitcoinConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockstream.info/api".to_string(),
        }
    }
}

impl Default for TronConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.trongrid.io".to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_transactions: 1000,
            user_agent: "BlockTracker/1.0".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            batch_concurrency: 4,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from file and environment variables
    /// Environment variables take precedence over file values
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ConfigError::FileNotFound(config_path.clone()))?;
        let config: TrackerConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // Chain API configuration
        if let Ok(api_key) = env::var("ETHERSCAN_API_KEY") {
            self.etherscan.api_key = Some(api_key);
        }
        if let Ok(base_url) = env::var("ETHERSCAN_API_URL") {
            self.etherscan.base_url = base_url;
        }
        if let Ok(base_url) = env::var("BITCOIN_API_URL") {
            self.bitcoin.base_url = base_url;
        }
        if let Ok(base_url) = env::var("TRON_API_URL") {
            self.tron.base_url = base_url;
        }

        // Fetch configuration
        if let Ok(timeout) = env::var("FETCH_TIMEOUT_SECONDS") {
            self.fetch.timeout_seconds =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "FETCH_TIMEOUT_SECONDS".to_string(),
                    value: timeout,
                })?;
        }
        if let Ok(max_transactions) = env::var("MAX_TRANSACTIONS") {
            self.fetch.max_transactions =
                max_transactions
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "MAX_TRANSACTIONS".to_string(),
                        value: max_transactions,
                    })?;
        }

        // Analysis configuration
        if let Ok(max_depth) = env::var("ANALYSIS_MAX_DEPTH") {
            self.analysis.max_depth =
                max_depth.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ANALYSIS_MAX_DEPTH".to_string(),
                    value: max_depth,
                })?;
        }

        // API configuration
        if let Ok(enabled) = env::var("API_ENABLED") {
            self.api.enabled = enabled.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_ENABLED".to_string(),
                value: enabled,
            })?;
        }
        if let Ok(port) = env::var("API_PORT") {
            self.api.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(host) = env::var("API_HOST") {
            self.api.host = host;
        }

        // Logging configuration
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate upstream API URLs
        for base_url in [
            &self.etherscan.base_url,
            &self.bitcoin.base_url,
            &self.tron.base_url,
        ] {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(base_url.clone()));
            }
        }

        // Validate timeout values
        if self.fetch.timeout_seconds == 0 || self.fetch.timeout_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_seconds".to_string(),
                value: self.fetch.timeout_seconds.to_string(),
            });
        }

        // Validate transaction limit
        if self.fetch.max_transactions == 0 || self.fetch.max_transactions > 10_000 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.max_transactions".to_string(),
                value: self.fetch.max_transactions.to_string(),
            });
        }

        // Validate traversal depth
        if self.analysis.max_depth == 0 || self.analysis.max_depth > 100 {
            return Err(ConfigError::InvalidValue {
                key: "analysis.max_depth".to_string(),
                value: self.analysis.max_depth.to_string(),
            });
        }

        // Validate batch concurrency
        if self.analysis.batch_concurrency == 0 || self.analysis.batch_concurrency > 64 {
            return Err(ConfigError::InvalidValue {
                key: "analysis.batch_concurrency".to_string(),
                value: self.analysis.batch_concurrency.to_string(),
            });
        }

        // Validate API port
        if self.api.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "api.port".to_string(),
                value: self.api.port.to_string(),
            });
        }

        // Validate log level
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        // Validate log format
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                value: self.logging.format.clone(),
            });
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::Parsing(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parsing(e.to_string()))?;
        fs::write(path, content).map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Ok(())
    }
}
