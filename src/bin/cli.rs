use blocktracker::analysis::FlowTracker;
use blocktracker::api::{Cli, CliHandler};
use blocktracker::config::TrackerConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger for CLI (less verbose than the server)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Display welcome banner
    print_banner();

    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = TrackerConfig::load().unwrap_or_default();

    // Create CLI handler
    let cli_handler = CliHandler::new(FlowTracker::new(config));

    // Execute the command
    if let Err(e) = cli_handler.run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_banner() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    🔗 BlockTracker CLI 🔗                    ║");
    println!("║                                                              ║");
    println!("║        Cryptocurrency transaction flow analysis tool         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}
