//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// feedbackd - interview feedback collection service
#[derive(Parser)]
#[command(name = "feedbackd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Write a default config.toml to the working directory
    Init,

    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["feedbackd"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_create_admin_args() {
        let cli = Cli::try_parse_from([
            "feedbackd",
            "create-admin",
            "--email",
            "admin@example.com",
            "--password",
            "hunter2hunter2",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::CreateAdmin {
                email: "admin@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
        );
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["feedbackd", "serve", "--config", "/etc/feedbackd.toml"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/feedbackd.toml")));
    }
}
