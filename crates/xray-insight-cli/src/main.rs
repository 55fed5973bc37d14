//! XRay Insight CLI entry point

use anyhow::Context;
use clap::Parser;
use tracing::error;

use xray_insight_cli::{
    cli::{Cli, Commands},
    commands::CommandDispatcher,
    config::CliAppConfig,
    XrayApp,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Printing the example config needs no state
    if cli.command == Commands::Config {
        println!("{}", CliAppConfig::example_config());
        return Ok(());
    }

    // Load configuration
    let mut config = load_configuration(&cli)?;
    config.cli.verbose |= cli.verbose;

    // Initialize logging
    setup_logging(config.cli.verbose);

    // Override state directory if specified
    if let Some(data_dir) = &cli.data_dir {
        config.state.state_dir = Some(data_dir.into());
    }

    // Create application, restoring any stored session
    let mut app = XrayApp::new(config).context("Failed to start XRay Insight")?;

    let outcome = match cli.command {
        Commands::Shell => CommandDispatcher::run_shell(&mut app).await,
        command => CommandDispatcher::execute(command, &mut app).await,
    };

    if let Err(e) = outcome {
        if !e.is_notified() {
            error!("Command execution failed: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from an explicit file or the standard layers
fn load_configuration(cli: &Cli) -> anyhow::Result<CliAppConfig> {
    let config = match &cli.config {
        Some(config_path) => CliAppConfig::load_from_file(config_path)
            .with_context(|| format!("Loading configuration from {}", config_path))?,
        None => CliAppConfig::load().context("Loading configuration")?,
    };
    Ok(config)
}
