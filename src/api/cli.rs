use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::analysis::{AnalysisError, FlowTracker};
use crate::error::TrackerError;
use crate::export::GraphExport;
use crate::logging::{ErrorLogger, MetricsLogger, PerformanceMonitor};
use crate::models::{AddressClassifier, AnalysisResult, Currency};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No address produced a successful analysis")]
    NothingAnalyzed,
}

#[derive(Parser)]
#[command(
    name = "blocktracker",
    version,
    about = "Cryptocurrency transaction flow analyzer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect cryptocurrency type from wallet addresses
    Detect {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Track transactions for addresses
    Track {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Full analysis with end receiver detection
    Analyze {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Generate transaction flow graphs and save them as JSON
    Graph {
        #[arg(required = true)]
        addresses: Vec<String>,
        /// Output directory for graph files
        #[arg(long, default_value = "data")]
        out: PathBuf,
    },
}

/// Executes CLI commands against a flow tracker, printing human readable
/// reports. Per-address failures are reported inline and do not abort the
/// remaining addresses; the command only errors when nothing succeeded.
pub struct CliHandler {
    tracker: FlowTracker,
}

impl CliHandler {
    pub fn new(tracker: FlowTracker) -> Self {
        Self { tracker }
    }

    pub async fn run(&self, command: Commands) -> Result<(), CliError> {
        match command {
            Commands::Detect { addresses } => {
                self.detect(&addresses);
                Ok(())
            }
            Commands::Track { addresses } => self.track(&addresses).await,
            Commands::Analyze { addresses } => self.analyze(&addresses).await,
            Commands::Graph { addresses, out } => self.graph(&addresses, &out).await,
        }
    }

    fn detect(&self, addresses: &[String]) {
        for (index, address) in addresses.iter().enumerate() {
            println!("\nAddress #{}: {}", index + 1, address);
            println!("{}", "-".repeat(50));

            let currency = AddressClassifier::classify(address);
            if currency != Currency::Unknown {
                println!("Detected: {}", currency);
            } else {
                println!("Unknown or unsupported address format");
            }

            if currency.is_supported() {
                println!("Status: Supported for full analysis");
            } else {
                println!("Status: Basic support only");
            }
        }
    }

    async fn track(&self, addresses: &[String]) -> Result<(), CliError> {
        let results = self.tracker.analyze_many(addresses).await;
        let mut successes = 0;

        for (index, (address, result)) in results.into_iter().enumerate() {
            println!("\nAddress #{}: {}", index + 1, address);
            println!("{}", "=".repeat(60));

            let currency = AddressClassifier::classify(&address);
            println!("Currency: {}", currency);

            match result {
                Ok(analysis) => {
                    successes += 1;
                    print_track_summary(&analysis);
                }
                Err(AnalysisError::UnsupportedCurrency(_)) => {
                    println!(
                        "Warning: {} not fully supported for transaction tracking",
                        currency
                    );
                }
                Err(err) => {
                    println!("Error: {}", err);
                    ErrorLogger::log_error(&TrackerError::Analysis(err), None);
                }
            }
        }

        if successes == 0 {
            return Err(CliError::NothingAnalyzed);
        }
        Ok(())
    }

    async fn analyze(&self, addresses: &[String]) -> Result<(), CliError> {
        let results = self.tracker.analyze_many(addresses).await;
        let mut successes = 0;

        for (index, (address, result)) in results.into_iter().enumerate() {
            println!("\n{}", "=".repeat(80));
            println!("COMPREHENSIVE ANALYSIS - Address #{}: {}", index + 1, address);
            println!("{}", "=".repeat(80));

            let currency = AddressClassifier::classify(&address);
            println!("Currency: {}", currency);

            match result {
                Ok(analysis) => {
                    successes += 1;
                    print_analysis_report(&analysis);
                }
                Err(AnalysisError::UnsupportedCurrency(_)) => {
                    println!("Warning: {} not fully supported for analysis", currency);
                }
                Err(err) => {
                    println!("Error: {}", err);
                    ErrorLogger::log_error(&TrackerError::Analysis(err), None);
                }
            }
        }

        if successes == 0 {
            return Err(CliError::NothingAnalyzed);
        }
        Ok(())
    }

    async fn graph(&self, addresses: &[String], out: &Path) -> Result<(), CliError> {
        let results = self.tracker.analyze_many(addresses).await;
        let mut successes = 0;

        for (index, (address, result)) in results.into_iter().enumerate() {
            println!("\nGenerating graph for Address #{}: {}", index + 1, address);

            let analysis = match result {
                Ok(analysis) => analysis,
                Err(err) => {
                    println!("Error: {}", err);
                    ErrorLogger::log_error(&TrackerError::Analysis(err), None);
                    continue;
                }
            };

            let monitor = PerformanceMonitor::new("graph_export");
            let export = GraphExport::from_analysis(&analysis);
            match export.write_to_dir(out) {
                Ok(path) => {
                    monitor.finish();
                    MetricsLogger::log_graph_export(
                        &analysis.address,
                        export.nodes.len(),
                        export.edges.len(),
                    );
                    successes += 1;
                    println!("Graph generated successfully!");
                    println!("  Nodes: {}", export.nodes.len());
                    println!("  Edges: {}", export.edges.len());
                    println!("  Graph saved to: {}", path.display());
                }
                Err(err) => {
                    println!("Error generating graph: {}", err);
                    ErrorLogger::log_error(&TrackerError::Io(err), None);
                }
            }
        }

        if successes == 0 {
            return Err(CliError::NothingAnalyzed);
        }
        Ok(())
    }
}

fn print_track_summary(analysis: &AnalysisResult) {
    println!("\nTransaction Summary:");
    println!("  Total Transactions: {}", analysis.total_transactions);
    println!("  Incoming: {}", analysis.incoming_transactions);
    println!("  Outgoing: {}", analysis.outgoing_transactions);
    println!(
        "  Total Volume: {:.6} {}",
        analysis.total_volume, analysis.currency
    );

    if !analysis.end_receivers.is_empty() {
        println!("\nPotential End Receivers (Top 5):");
        for (rank, candidate) in analysis.end_receivers.iter().take(5).enumerate() {
            println!(
                "  {}. {} (Probability: {:.1}%)",
                rank + 1,
                candidate.address,
                candidate.probability * 100.0
            );
        }
    }

    if !analysis.transactions.is_empty() {
        println!("\nRecent Transactions (Last 10):");
        let start = analysis.transactions.len().saturating_sub(10);
        for (rank, tx) in analysis.transactions[start..].iter().enumerate() {
            println!("  {}. {}", rank + 1, format_display_time(tx.timestamp));
            println!("     From: {}", tx.from_address);
            println!("     To: {}", tx.to_address);
            println!("     Amount: {:.6} {}", tx.amount, tx.currency);
            println!("     Hash: {}", tx.tx_hash);
            println!();
        }
    }
}

fn print_analysis_report(analysis: &AnalysisResult) {
    println!("\n📊 TRANSACTION STATISTICS");
    println!("  Total Transactions: {}", analysis.total_transactions);
    println!("  Incoming Transactions: {}", analysis.incoming_transactions);
    println!("  Outgoing Transactions: {}", analysis.outgoing_transactions);
    println!(
        "  Total Volume: {:.6} {}",
        analysis.total_volume, analysis.currency
    );

    if !analysis.end_receivers.is_empty() {
        println!("\n🎯 END RECEIVER ANALYSIS");
        println!(
            "  Found {} potential end receivers:",
            analysis.end_receivers.len()
        );

        for (rank, candidate) in analysis.end_receivers.iter().enumerate() {
            let percent = candidate.probability * 100.0;
            println!("  {}. {}", rank + 1, candidate.address);
            println!(
                "     Probability: {:.1}% ({} confidence)",
                percent,
                confidence_label(percent)
            );
            println!(
                "     Confidence: [{}] {:.1}%",
                probability_bar(candidate.probability),
                percent
            );
        }
    }

    println!("\n🔄 TRANSACTION FLOW ANALYSIS");
    println!("  Nodes in graph: {}", analysis.graph.node_count());
    println!("  Edges in graph: {}", analysis.graph.edge_count());
}

fn confidence_label(percent: f64) -> &'static str {
    if percent > 70.0 {
        "High"
    } else if percent > 40.0 {
        "Medium"
    } else {
        "Low"
    }
}

fn probability_bar(probability: f64) -> String {
    const BAR_LENGTH: usize = 20;
    let filled = ((probability * BAR_LENGTH as f64) as usize).min(BAR_LENGTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_LENGTH - filled))
}

fn format_display_time(timestamp: u64) -> String {
    Utc.timestamp_opt(timestamp as i64, 0)
        .single()
        .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
