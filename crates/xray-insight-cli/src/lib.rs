//! XRay Insight CLI library
//!
//! This library provides the pieces of the `xray` command-line client: the
//! layered configuration, the file-backed client storage, the terminal
//! notifier and the command dispatcher with its interactive shell.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notifier;
pub mod state;

pub use app::XrayApp;
pub use cli::{Cli, Commands};
pub use config::CliAppConfig;
pub use error::{CliError, Result};
pub use notifier::ConsoleNotifier;
pub use state::FileStorage;
