//! Command-line interface definitions and parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use xray_insight_core::RegistrationForm;

#[derive(Parser)]
#[command(name = "xray", author, version, about = "XRay Insight demo client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data directory for client storage
    #[arg(short, long)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sign in with an email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        /// Full name
        #[arg(short, long)]
        name: String,
        /// Work email
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Company name
        #[arg(long)]
        company: String,
        /// Agree to the Terms of Service and Privacy Policy
        #[arg(long)]
        agree_terms: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// List past analyses
    Dashboard {
        /// Filter by patient id or diagnosis
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Run the mock analyzer over an X-ray image
    Analyze {
        /// Image file to analyze
        path: PathBuf,
    },
    /// Sign in with a social provider
    Social {
        /// Provider name, e.g. Google or Microsoft
        provider: String,
        /// Use the registration button instead of the login one
        #[arg(long)]
        register: bool,
    },
    /// Start interactive mode with one session kept for the whole run
    Shell,
    /// Print an example configuration file
    Config,
}

impl Commands {
    /// Registration form for a `register` command
    pub fn registration_form(&self) -> Option<RegistrationForm> {
        match self {
            Commands::Register {
                name,
                email,
                password,
                company,
                agree_terms,
            } => Some(RegistrationForm {
                full_name: name.clone(),
                work_email: email.clone(),
                password: password.clone(),
                company_name: company.clone(),
                agree_to_terms: *agree_terms,
            }),
            _ => None,
        }
    }
}

/// One line typed into the interactive shell
#[derive(Parser, Debug)]
#[command(name = "xray", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

impl ShellLine {
    /// Parse a shell line, honoring double quotes around arguments with spaces
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(split_words(line))
    }
}

fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from(["xray", "-d", "/tmp/x", "login", "-e", "a@b.io", "-p", "pw"]).unwrap();
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/x"));
        assert_eq!(
            cli.command,
            Commands::Login {
                email: "a@b.io".to_string(),
                password: "pw".to_string()
            }
        );
    }

    #[test]
    fn test_registration_form() {
        let cli = Cli::try_parse_from([
            "xray", "register", "--name", "Ann Lee", "--email", "ann@acme.io", "--password", "pw",
            "--company", "Acme", "--agree-terms",
        ])
        .unwrap();

        let form = cli.command.registration_form().unwrap();
        assert_eq!(form.full_name, "Ann Lee");
        assert!(form.agree_to_terms);
        assert!(Commands::Logout.registration_form().is_none());
    }

    #[test]
    fn test_shell_line_quotes() {
        let line = ShellLine::parse_line(
            r#"register --name "Ann Lee" --email ann@acme.io --password pw --company Acme"#,
        )
        .unwrap();
        let form = line.command.registration_form().unwrap();
        assert_eq!(form.full_name, "Ann Lee");
        assert!(!form.agree_to_terms);
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("  whoami  "), ["whoami"]);
        assert_eq!(split_words(r#"dashboard -s "" x"#), ["dashboard", "-s", "", "x"]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_shell_rejects_unknown() {
        assert!(ShellLine::parse_line("fly away").is_err());
    }
}
