use blocktracker::analysis::FlowTracker;
use blocktracker::api::ApiServer;
use blocktracker::config::TrackerConfig;
use blocktracker::logging;
use clap::Parser;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "blocktracker-server")]
#[command(about = "HTTP API server for cryptocurrency transaction flow analysis")]
#[command(version = "0.1.0")]
struct Args {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Display server banner
    print_server_banner();

    let args = Args::parse();

    // Load configuration
    let config = TrackerConfig::load().unwrap_or_default();

    // Initialize structured logging
    logging::init_logging(&config.logging.level)?;

    // Use CLI args or config values
    let host = if args.host != "127.0.0.1" {
        args.host.clone()
    } else {
        config.api.host.clone()
    };
    let port = if args.port != 8080 {
        args.port
    } else {
        config.api.port
    };

    if !config.api.enabled {
        eprintln!("API server is disabled in configuration (api.enabled = false)");
        std::process::exit(1);
    }

    // Create and start API server
    let tracker = Arc::new(FlowTracker::new(config));
    let server = ApiServer::new(tracker, &host, port);

    log::info!("Starting HTTP API server on {}:{}", host, port);

    if let Err(e) = server.start().await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}

fn print_server_banner() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                🌐 BlockTracker API Server 🌐                 ║");
    println!("║                                                              ║");
    println!("║            HTTP API for transaction flow analysis            ║");
    println!("║                                                              ║");
    println!("║                 Starting HTTP API server...                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}
