//! Command handlers for the XRay Insight CLI

use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use xray_insight_core::{Notifier, Route};

use crate::app::XrayApp;
use crate::cli::{Commands, ShellLine};
use crate::config::CliAppConfig;
use crate::error::{CliError, Result};

/// Command dispatcher for handling CLI commands
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Execute a CLI command
    pub async fn execute<N: Notifier>(command: Commands, app: &mut XrayApp<N>) -> Result<()> {
        match command {
            Commands::Login { email, password } => {
                let route = app.login(&email, &password).await?;
                Self::report_route(route);
                Ok(())
            }
            cmd @ Commands::Register { .. } => {
                let form = cmd
                    .registration_form()
                    .ok_or_else(|| CliError::InvalidCommand("register".to_string()))?;
                let route = app.register(&form).await?;
                Self::report_route(route);
                Ok(())
            }
            Commands::Logout => {
                let route = app.logout()?;
                println!("Signed out");
                Self::report_route(route);
                Ok(())
            }
            Commands::Whoami => {
                Self::handle_whoami(app);
                Ok(())
            }
            Commands::Dashboard { search } => {
                Self::handle_dashboard(app, search.as_deref());
                Ok(())
            }
            Commands::Analyze { path } => Self::handle_analyze(app, &path).await,
            Commands::Social { provider, register } => {
                if register {
                    app.social_register(&provider);
                } else {
                    app.social_login(&provider);
                }
                Ok(())
            }
            Commands::Shell => Err(CliError::InvalidCommand(
                "already in interactive mode".to_string(),
            )),
            Commands::Config => {
                println!("{}", CliAppConfig::example_config());
                Ok(())
            }
        }
    }

    fn report_route(route: Route) {
        debug!(path = route.path(), "Navigating");
    }

    fn handle_whoami<N: Notifier>(app: &XrayApp<N>) {
        match app.identity() {
            Some(identity) => {
                println!("Welcome, {}", identity.greeting_name());
                println!("  ID:    {}", identity.id);
                println!("  Email: {}", identity.email);
            }
            None => println!("Not signed in"),
        }
    }

    fn handle_dashboard<N: Notifier>(app: &XrayApp<N>, search: Option<&str>) {
        let (records, summary) = app.dashboard(search);

        if let Some(identity) = app.identity() {
            println!("Welcome, {}", identity.greeting_name());
        }
        println!("Total analyses: {}", summary.total);
        println!(
            "Abnormal: {} ({}%)  Normal: {} ({}%)",
            summary.abnormal,
            summary.abnormal_percent(),
            summary.normal,
            summary.normal_percent()
        );
        println!();

        if records.is_empty() {
            println!("No records match your search");
            return;
        }

        println!("{:<10} {:<12} {:<12} {:>10}", "Patient", "Date", "Diagnosis", "Confidence");
        for record in records {
            println!(
                "{:<10} {:<12} {:<12} {:>9}%",
                record.patient_id,
                record.date,
                record.primary_diagnosis,
                record.percent()
            );
        }
    }

    async fn handle_analyze<N: Notifier>(app: &mut XrayApp<N>, path: &Path) -> Result<()> {
        println!("Analyzing {}...", path.display());
        let report = app.analyze(path).await?;

        println!("Report {}", report.id);
        for finding in &report.findings {
            let marker = if finding.is_elevated() { "!" } else { " " };
            println!("{} {:<14} {:>3}%", marker, finding.label, finding.percent());
        }
        Ok(())
    }

    // ----------------------------------------------------------------------------
    // Interactive Shell
    // ----------------------------------------------------------------------------

    /// Read commands from stdin until `exit` or end of input
    pub async fn run_shell<N: Notifier>(app: &mut XrayApp<N>) -> Result<()> {
        let prompt = app.config().cli.prompt.clone();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("XRay Insight interactive mode. Type `help` for commands, `exit` to quit.");
        loop {
            print!("{}", prompt);
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            match line {
                "" => continue,
                "exit" | "quit" => break,
                _ => {}
            }

            match ShellLine::parse_line(line) {
                Ok(parsed) => {
                    if let Err(e) = Self::execute(parsed.command, app).await {
                        debug!("Shell command failed: {}", e);
                        if !e.is_notified() {
                            eprintln!("{}", e);
                        }
                    }
                }
                Err(e) => {
                    let _ = e.print();
                }
            }
        }

        info!("Leaving interactive mode");
        Ok(())
    }
}
